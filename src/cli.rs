use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::models::Interval;
use crate::utils::APP_NAME;

#[derive(Parser)]
#[command(name = APP_NAME)]
#[command(about = "Track which parts of a video were watched", long_about = None)]
pub struct Cli {
    /// Progress store file (overrides the configured one)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Merge intervals and print the resulting coverage
    Merge {
        /// Intervals as START-END, comma or space separated (e.g. 0-5,3-8)
        #[arg(required = true, value_delimiter = ',', value_parser = parse_interval)]
        intervals: Vec<Interval>,

        /// Also print the percentage of this duration (seconds) covered
        #[arg(long)]
        duration: Option<f64>,
    },

    /// Record watched intervals for a user and video
    Update {
        #[arg(long)]
        user: String,

        #[arg(long)]
        video: String,

        /// Video duration in seconds
        #[arg(long)]
        duration: f64,

        /// Print the short progress label
        #[arg(long)]
        compact: bool,

        /// Intervals as START-END, comma or space separated
        #[arg(required = true, value_delimiter = ',', value_parser = parse_interval)]
        intervals: Vec<Interval>,
    },

    /// Show stored progress for a user and video
    Get {
        #[arg(long)]
        user: String,

        #[arg(long)]
        video: String,

        /// Video duration in seconds
        #[arg(long)]
        duration: f64,

        /// Print the short progress label
        #[arg(long)]
        compact: bool,
    },

    /// Apply an update_progress JSON request and print the JSON response
    Apply {
        /// Request file, or '-' for stdin
        file: PathBuf,
    },

    /// Drive a playback session from a JSON event script
    Replay {
        #[arg(long)]
        user: String,

        #[arg(long)]
        video: String,

        /// Video duration in seconds
        #[arg(long)]
        duration: f64,

        /// JSON array of playback events
        file: PathBuf,
    },

    /// Show or change settings
    Config {
        /// Cap reported percentages at 100
        #[arg(long)]
        clamp: Option<bool>,

        /// Decimal places kept in reported percentages
        #[arg(long)]
        decimals: Option<u32>,

        /// Resend coverage from failed flushes with the next flush
        #[arg(long)]
        retain_failed: Option<bool>,

        /// Durable store file to use by default
        #[arg(long)]
        store_path: Option<PathBuf>,
    },
}

/// Parse `START-END` into a validated interval
fn parse_interval(raw: &str) -> Result<Interval, String> {
    let (start, end) = raw
        .trim()
        .split_once('-')
        .ok_or_else(|| format!("expected START-END, got '{}'", raw))?;
    let start: f64 = start
        .trim()
        .parse()
        .map_err(|_| format!("invalid start in '{}'", raw))?;
    let end: f64 = end
        .trim()
        .parse()
        .map_err(|_| format!("invalid end in '{}'", raw))?;

    Interval::new(start, end).map_err(|e| e.to_string())
}
