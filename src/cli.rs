use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Simple, file-backed reminder CLI.
/// Lists live in ~/.remind/ unless a file is passed via --db.
#[derive(Parser)]
#[command(name = "remind", version, about = "Local task reminders with daily/weekly recurrence")]
pub struct Cli {
    /// Path to the reminder list JSON file.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}
