//! `topic` command-line entry point.
//!
//! # Responsibility
//! - Parse arguments, resolve configuration and start file logging.
//! - Dispatch to one topic log command and map failures to exit code 1.

mod cli;
mod command;
mod render;

use clap::Parser;
use std::process::ExitCode;
use topic_core::{init_logging, ConfigOverrides, TopicConfig};

type AnyError = Box<dyn std::error::Error + Send + Sync>;

fn main() -> ExitCode {
    let args = cli::Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: cli::Args) -> Result<(), AnyError> {
    let config = TopicConfig::resolve(ConfigOverrides {
        db_path: args.db.clone(),
        log_dir: None,
        log_level: args.verbose.then(|| "debug".to_string()),
    })?;

    // A broken log directory must not block recording a topic.
    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("warning: file logging disabled: {err}");
    }

    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    command::run(
        &args.command,
        &config.db_path,
        &mut stdout.lock(),
        &mut stderr.lock(),
    )
}
