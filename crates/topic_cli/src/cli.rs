use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "topic",
    version = env!("CARGO_PKG_VERSION"),
    about = "Track what you are currently doing"
)]
pub struct Args {
    /// Topic log database (defaults to $TOPIC_DB, then the per-user data dir)
    #[arg(long, value_name = "FILE", global = true)]
    pub db: Option<PathBuf>,

    #[arg(short, long, action, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    #[command(about = "Set a new topic")]
    New {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        words: Vec<String>,
    },

    #[command(about = "Report the most recent topic")]
    Latest(LatestArgs),

    #[command(about = "Print every topic with its duration")]
    Report,

    #[command(about = "Prompt to set a topic")]
    Prompt {
        /// How long to wait between prompts, e.g. 30m, 1h, 90s
        #[arg(long, default_value = "30m", value_parser = parse_duration)]
        duration: std::time::Duration,
    },

    #[command(about = "Print version info")]
    Version,

    #[command(about = "Print build info")]
    Buildinfo,
}

#[derive(ClapArgs, Debug, Clone, Default)]
#[group(multiple = false)]
pub struct LatestArgs {
    /// Print only the elapsed duration
    #[arg(long)]
    pub duration: bool,

    /// Print only the start timestamp (RFC 3339)
    #[arg(long)]
    pub timestamp: bool,

    /// Print only the topic label
    #[arg(long)]
    pub topic: bool,
}

/// Parses `90s`, `30m`, `1h`, or a bare number of seconds.
fn parse_duration(raw: &str) -> Result<std::time::Duration, String> {
    let raw = raw.trim();
    let split = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    let (digits, unit) = raw.split_at(split);
    let value: u64 = digits
        .parse()
        .map_err(|_| format!("invalid duration `{raw}`"))?;
    let seconds = match unit {
        "" | "s" => value,
        "m" => value.saturating_mul(60),
        "h" => value.saturating_mul(3600),
        other => return Err(format!("unknown duration unit `{other}` in `{raw}`")),
    };
    Ok(std::time::Duration::from_secs(seconds))
}
