//! Command-line interface for signstream
//!
//! Provides argument parsing using clap derive macros.

use crate::settings::Language;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use std::time::Duration;

/// Sign-language gesture classification from hand landmarks
#[derive(Parser, Debug)]
#[command(
    name = "signstream",
    version,
    about = "Sign-language gesture classification from hand landmarks"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Only print sentence results and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose logging (-v: info, -vv: debug, -vvv: trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Parse an analysis interval.
///
/// Bare numbers are milliseconds; anything else goes through `humantime`
/// (`3s`, `1500ms`, `1m`).
fn parse_interval(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if let Ok(ms) = s.parse::<u64>() {
        return Ok(Duration::from_millis(ms));
    }
    humantime::parse_duration(s).map_err(|e| e.to_string())
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify a single frame of hand landmarks from a JSON file
    Classify {
        /// JSON file holding a list of hands or a single hand
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Sign language for labels (ASL, KSL, BSL)
        #[arg(long, short = 'l', value_name = "LANG")]
        language: Option<Language>,

        /// Seed for the fallback tier
        #[arg(long)]
        seed: Option<u64>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the streaming pipeline over a recorded landmark stream
    Replay {
        /// JSON-lines recording, one frame per line
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Playback rate in frames per second (default: from config)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=240))]
        fps: Option<u32>,

        /// Sign language for labels (ASL, KSL, BSL)
        #[arg(long, short = 'l', value_name = "LANG")]
        language: Option<Language>,

        /// Detection sensitivity, 1 to 10
        #[arg(long, short = 's', value_parser = clap::value_parser!(u8).range(1..=10))]
        sensitivity: Option<u8>,

        /// Minimum time between sentence analyses. Examples: 3s, 1500ms, 2000
        #[arg(long, short = 'i', value_name = "DURATION", value_parser = parse_interval)]
        interval: Option<Duration>,

        /// Seed for the fallback tier
        #[arg(long)]
        seed: Option<u64>,

        /// Print results as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Configuration management
    Config {
        /// Action to perform (default: show)
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Configuration actions
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Print the default configuration file path
    Path,
}
