//! # remind - Local Task Reminder CLI
//!
//! A small, file-backed reminder tool with recurring schedules and an
//! optional terminal user interface (TUI).
//!
//! ## Key Features
//!
//! - **Due-window scheduling**: a reminder fires exactly once, within the
//!   first 60 seconds after its due time
//! - **Recurrence**: daily and weekly reminders reschedule themselves
//!   forward after firing; one-shot reminders are marked done
//! - **Multiple Interfaces**: full CLI for scripting + interactive TUI
//!   with a built-in due-check tick
//! - **Multiple Lists**: keep separate reminder lists as local JSON files
//! - **Local File Storage**: plain JSON, atomic writes, no daemon
//!
//! ## Quick Start
//!
//! ```bash
//! # Add a reminder
//! remind add "Pay bills" --time 09:00 --date 2025-01-01 --repeat daily
//!
//! # See what's pending
//! remind list
//!
//! # Poll in a terminal (fires console alerts)
//! remind watch
//!
//! # Or manage everything visually
//! remind ui
//! ```
//!
//! Data is stored locally in `~/.remind/` with each list as a separate
//! JSON file, plus a `settings.json` tracking recently opened lists.

use std::path::{Path, PathBuf};

use clap::Parser;

pub mod cli;
pub mod cmd;
pub mod fields;
pub mod lists;
pub mod notify;
pub mod scheduler;
pub mod settings;
pub mod store;
pub mod task;
pub mod tui {
    pub mod app;
    pub mod run;
    pub mod task_form;
}

use cli::Cli;
use cmd::*;
use lists::{most_recent_list, ReminderList};
use settings::{settings_path, Settings};
use store::TaskStore;

fn main() {
    let cli = Cli::parse();

    // Determine the data directory
    let data_dir = if let Some(db_path) = cli.db.as_ref() {
        db_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf()
    } else {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        let data_dir = PathBuf::from(home).join(".remind");
        if let Err(e) = std::fs::create_dir_all(&data_dir) {
            eprintln!("Failed to create data directory {}: {}", data_dir.display(), e);
            std::process::exit(1);
        }
        data_dir
    };

    let settings_file = settings_path(&data_dir);
    let mut settings = Settings::load(&settings_file);

    // Commands that don't operate on a specific list
    match &cli.command {
        Commands::Lists => {
            cmd_lists(&data_dir, &settings);
            return;
        }
        Commands::NewList { name } => {
            cmd_new_list(&data_dir, name.clone());
            return;
        }
        Commands::Completions { shell } => {
            cmd_completions(*shell);
            return;
        }
        _ => {}
    }

    // Everything else opens a list: --db wins, then the last-opened
    // list, then the most recently modified one, then a fresh default.
    let db_path = resolve_db_path(cli.db, &data_dir, &settings);
    settings.touch_recent(&db_path);
    if let Err(e) = settings.save(&settings_file) {
        eprintln!("Warning: failed to save settings: {e}");
    }

    match cli.command {
        Commands::Ui => {
            cmd_ui(&db_path);
            return;
        }
        Commands::Watch { interval } => {
            cmd_watch(&db_path, interval);
            return;
        }
        _ => {}
    }

    let mut store = TaskStore::load(&db_path);

    match cli.command {
        Commands::Ui | Commands::Watch { .. } => unreachable!("handled above"),
        Commands::Lists | Commands::NewList { .. } | Commands::Completions { .. } => {
            unreachable!("handled above")
        }

        Commands::Add { name, date, time, repeat, desc, priority, category } =>
            cmd_add(&mut store, &db_path, name, date, time, repeat, desc, priority, category),

        Commands::List { all, category, repeat, due } =>
            cmd_list(&store, all, category, repeat, due),

        Commands::View { id } => cmd_view(&store, id),

        Commands::Update { id, name, date, time, repeat, desc, priority, category } =>
            cmd_update(&mut store, &db_path, id, name, date, time, repeat, desc, priority, category),

        Commands::Done { id } => cmd_done(&mut store, &db_path, id),

        Commands::Reopen { id } => cmd_reopen(&mut store, &db_path, id),

        Commands::Delete { id } => cmd_delete(&mut store, &db_path, id),

        Commands::Check { now } => cmd_check(&mut store, &db_path, now),
    }
}

/// Pick the list file to operate on when none was given explicitly.
fn resolve_db_path(cli_db: Option<PathBuf>, data_dir: &Path, settings: &Settings) -> PathBuf {
    if let Some(path) = cli_db {
        return path;
    }
    if let Some(last) = settings.last_opened.as_ref() {
        if last.exists() {
            return last.clone();
        }
    }
    match most_recent_list(data_dir) {
        Ok(Some(list)) => list.file_path,
        _ => {
            let default_list = ReminderList::new("Default", data_dir);
            if let Err(e) = default_list.create_if_not_exists() {
                eprintln!("Failed to create default list: {e}");
                std::process::exit(1);
            }
            default_list.file_path
        }
    }
}
