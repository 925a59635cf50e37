use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand};

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod decode;
pub mod version;
pub mod watch;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode a captured stream of core-to-GUI frames.
    Decode(DecodeArgs),
    /// Connect to a core, log in and print what it sends.
    Watch(WatchArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Decode(args) => decode::run(args, format),
        Command::Watch(args) => watch::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// File holding raw frames as read from the GUI socket.
    pub file: PathBuf,
    /// Protocol version to assume until a CoreProtocol message says otherwise.
    #[arg(long, default_value_t = mlgui_proto::PROTOCOL_VERSION)]
    pub protocol_version: u32,
    /// Stop after N messages.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Core GUI address (e.g. 127.0.0.1:4001).
    pub addr: String,
    /// Login user.
    #[arg(long, short = 'u', default_value = "admin")]
    pub user: String,
    /// Login password.
    #[arg(long, env = "MLGUI_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
    /// Exit after printing N messages.
    #[arg(long)]
    pub count: Option<usize>,
    /// Ask the core for poll mode instead of pushed updates.
    #[arg(long)]
    pub poll: bool,
    /// Connect timeout (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub timeout: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub fn parse_timeout(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "timeout must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid timeout value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "timeout must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        _ => Ok(Duration::from_secs(value)),
    }
}
