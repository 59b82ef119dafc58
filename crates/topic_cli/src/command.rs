use crate::cli::{Command, LatestArgs};
use crate::render::{format_duration, format_span, format_timestamp};
use crate::AnyError;
use log::{info, warn};
use std::io::Write;
use std::path::Path;
use topic_core::db::open_db;
use topic_core::{SqliteEntryStore, TopicError, TopicLog};

/// Runs one command against the log at `db_path`.
pub fn run(
    command: &Command,
    db_path: &Path,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<(), AnyError> {
    info!("event=command_start module=cli command={}", command_name(command));

    match command {
        Command::New { words } => {
            let label = words.join(" ");
            writeln!(stderr, "adding topic \"{label}\"")?;
            with_log(db_path, |log| log.append(label).map(|_| ()))
        }
        Command::Latest(flags) => {
            let span = with_log(db_path, |log| log.recent())?;
            writeln!(stdout, "{}", render_latest(flags, &span))?;
            Ok(())
        }
        Command::Report => {
            writeln!(stderr, "running report")?;
            let spans = with_log(db_path, |log| log.report())?;
            for span in &spans {
                writeln!(stdout, "{}", format_span(span))?;
            }
            Ok(())
        }
        Command::Prompt { duration } => {
            warn!(
                "event=command_unsupported module=cli command=prompt interval_s={}",
                duration.as_secs()
            );
            Err("prompt is not supported yet".into())
        }
        Command::Version => {
            writeln!(stdout, "topic {}", env!("CARGO_PKG_VERSION"))?;
            writeln!(stdout, "topic_core {}", topic_core::core_version())?;
            Ok(())
        }
        Command::Buildinfo => {
            writeln!(stdout, "package: {}", env!("CARGO_PKG_NAME"))?;
            writeln!(stdout, "version: {}", env!("CARGO_PKG_VERSION"))?;
            writeln!(stdout, "core version: {}", topic_core::core_version())?;
            writeln!(
                stdout,
                "target: {}-{}",
                std::env::consts::ARCH,
                std::env::consts::OS
            )?;
            writeln!(
                stdout,
                "build mode: {}",
                if cfg!(debug_assertions) {
                    "debug"
                } else {
                    "release"
                }
            )?;
            Ok(())
        }
    }
}

fn with_log<T>(
    db_path: &Path,
    f: impl FnOnce(&TopicLog<SqliteEntryStore<'_>, topic_core::SystemClock>) -> Result<T, TopicError>,
) -> Result<T, AnyError> {
    let conn = open_db(db_path)?;
    let log = TopicLog::with_system_clock(SqliteEntryStore::new(&conn));
    f(&log).map_err(|err| match err {
        TopicError::NotFound => "no topic set yet".into(),
        other => other.into(),
    })
}

fn render_latest(flags: &LatestArgs, span: &topic_core::TopicSpan) -> String {
    if flags.duration {
        format_duration(span.duration)
    } else if flags.timestamp {
        format_timestamp(span.entry.start)
    } else if flags.topic {
        span.entry.label.clone()
    } else {
        format_span(span)
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::New { .. } => "new",
        Command::Latest(_) => "latest",
        Command::Report => "report",
        Command::Prompt { .. } => "prompt",
        Command::Version => "version",
        Command::Buildinfo => "buildinfo",
    }
}
