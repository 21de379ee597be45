//! CLI argument definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "watchtower")]
#[command(version, about = "Append messages to per-stream log files, with optional email alerts")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (TOML, YAML or JSON) holding a [watchtower] section
    #[arg(short, long, env = "WATCHTOWER_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Host named in notification sender and subject
    #[arg(long, env = "WATCHTOWER_HOST", default_value = "localhost", global = true)]
    pub host: String,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output in JSON format instead of tables
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate the config and create the log directory and stream files
    Init,

    /// Validate the config without touching the filesystem
    Check,

    /// Append a message to a stream
    Log(LogArgs),

    /// Show the most recent entries of a stream
    Tail(TailArgs),

    /// List declared streams and their files
    Streams,
}

#[derive(Args)]
pub struct LogArgs {
    /// Stream name (file <log_directory>/<stream>.log)
    pub stream: String,

    /// Message to write; multiple words are joined with spaces
    #[arg(required = true, trailing_var_arg = true)]
    pub message: Vec<String>,

    /// Email the configured recipients as well
    #[arg(short, long)]
    pub notify: bool,
}

#[derive(Args)]
pub struct TailArgs {
    /// Stream name
    pub stream: String,

    /// Number of entries to show
    #[arg(short = 'n', long, default_value = "10")]
    pub lines: usize,
}
