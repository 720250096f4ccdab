//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::codec::PayloadFormat;

/// statuscast - status update fan-out over Redis pub/sub
#[derive(Parser)]
#[command(
    name = "sc",
    about = "Publish and watch entity status updates",
    version,
    after_help = "Logs are written to: ~/.local/share/statuscast/logs/statuscast.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Publish a status update
    #[command(allow_negative_numbers = true)]
    Publish {
        /// Entity id
        id: i32,

        /// New status code
        code: i32,

        /// Payload encoding (overrides wire.payload-format)
        #[arg(short, long)]
        payload_format: Option<PayloadFormat>,
    },

    /// Subscribe and print status updates until interrupted
    Watch {
        /// Stop after this many events
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Check that the broker is reachable
    Ping,
}

/// Output format for printed events
#[derive(Clone, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}
