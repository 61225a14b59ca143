//! Command implementations for the CLI interface.
//!
//! This module contains all the command handlers for the subcommands,
//! from task CRUD to the due-check and watch loop, plus the TUI entry
//! point.

use std::path::Path;
use std::thread;
use std::time::Duration as StdDuration;

use chrono::{Local, NaiveDateTime};
use clap::{CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::fields::*;
use crate::lists::{create_list, discover_lists};
use crate::notify::ConsoleNotifier;
use crate::scheduler::Scheduler;
use crate::settings::Settings;
use crate::store::TaskStore;
use crate::task::{parse_datetime, Task, DATETIME_FMT};
use crate::tui::run::run_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive UI interface.
    Ui,

    /// Add a new reminder.
    Add {
        /// Display name for the reminder.
        name: String,
        /// Due date: YYYY-MM-DD. Defaults to today.
        #[arg(long)]
        date: Option<String>,
        /// Due time: HH:MM.
        #[arg(long)]
        time: String,
        /// Repeat policy: none | daily | weekly.
        #[arg(long, value_enum, default_value_t = Repeat::None)]
        repeat: Repeat,
        /// Optional longer description.
        #[arg(long)]
        desc: Option<String>,
        /// Priority: low | normal | high.
        #[arg(long, value_enum, default_value_t = Priority::Normal)]
        priority: Priority,
        /// Free-form category label.
        #[arg(long)]
        category: Option<String>,
    },

    /// List reminders with optional filters.
    List {
        /// Include completed reminders.
        #[arg(long)]
        all: bool,
        /// Filter by category.
        #[arg(long)]
        category: Option<String>,
        /// Filter by repeat policy.
        #[arg(long, value_enum)]
        repeat: Option<Repeat>,
        /// Due filter: today | overdue | upcoming.
        #[arg(long, value_enum)]
        due: Option<DueFilter>,
    },

    /// View a single reminder by position or name.
    View {
        /// Position (1-based) or name of the reminder.
        id: String,
    },

    /// Update fields of an existing reminder.
    Update {
        /// Position (1-based) or name of the reminder.
        id: String,
        /// New display name.
        #[arg(long)]
        name: Option<String>,
        /// New due date: YYYY-MM-DD.
        #[arg(long)]
        date: Option<String>,
        /// New due time: HH:MM.
        #[arg(long)]
        time: Option<String>,
        /// New repeat policy.
        #[arg(long, value_enum)]
        repeat: Option<Repeat>,
        /// New description.
        #[arg(long)]
        desc: Option<String>,
        /// New priority.
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        /// New category.
        #[arg(long)]
        category: Option<String>,
    },

    /// Mark a reminder as done.
    Done {
        /// Position (1-based) or name of the reminder.
        id: String,
    },

    /// Clear the done flag on a reminder.
    Reopen {
        /// Position (1-based) or name of the reminder.
        id: String,
    },

    /// Delete a reminder.
    Delete {
        /// Position (1-based) or name of the reminder.
        id: String,
    },

    /// Run one due-check pass and fire console notifications.
    Check {
        /// Check against this instant instead of the wall clock
        /// ("YYYY-MM-DD HH:MM" or "YYYY-MM-DD HH:MM:SS").
        #[arg(long)]
        now: Option<String>,
    },

    /// Poll for due reminders in the foreground until interrupted.
    Watch {
        /// Seconds between due-check passes.
        #[arg(long, default_value_t = 30)]
        interval: u64,
    },

    /// Show all reminder lists in the data directory.
    Lists,

    /// Create a new reminder list.
    NewList {
        /// Display name for the list.
        name: String,
    },

    /// Generate shell completions.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn save_or_die(store: &TaskStore, path: &Path) {
    if let Err(e) = store.save(path) {
        eprintln!("Failed to save list: {e}");
        std::process::exit(1);
    }
}

/// Launch the TUI for the given list file.
pub fn cmd_ui(db_path: &Path) {
    if let Err(e) = run_tui(db_path) {
        eprintln!("UI error: {e}");
        std::process::exit(1);
    }
}

/// Add a new reminder to the list.
pub fn cmd_add(
    store: &mut TaskStore,
    db_path: &Path,
    name: String,
    date: Option<String>,
    time: String,
    repeat: Repeat,
    desc: Option<String>,
    priority: Priority,
    category: Option<String>,
) {
    if name.trim().is_empty() {
        eprintln!("Reminder name cannot be empty");
        std::process::exit(1);
    }
    let date = date.unwrap_or_else(|| Local::now().date_naive().format("%Y-%m-%d").to_string());
    let task = match Task::build(
        &name,
        &date,
        &time,
        repeat,
        desc.as_deref().unwrap_or(""),
        priority,
        category.as_deref().unwrap_or(""),
    ) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let due = task.due_str();
    store.tasks.push(task);
    save_or_die(store, db_path);
    println!("Added reminder {} due {}", store.tasks.len(), due);
}

/// List reminders with optional filtering.
pub fn cmd_list(
    store: &TaskStore,
    all: bool,
    category: Option<String>,
    repeat: Option<Repeat>,
    due: Option<DueFilter>,
) {
    let now = Local::now().naive_local();
    let today = now.date();

    let rows: Vec<(usize, &Task)> = store
        .tasks
        .iter()
        .enumerate()
        .filter(|(_, t)| {
            if !all && t.done {
                return false;
            }
            if let Some(ref c) = category {
                if !t.category.eq_ignore_ascii_case(c) {
                    return false;
                }
            }
            if let Some(r) = repeat {
                if t.repeat != r {
                    return false;
                }
            }
            if let Some(df) = due {
                match df {
                    DueFilter::Today => {
                        if t.due.date() != today {
                            return false;
                        }
                    }
                    DueFilter::Overdue => {
                        if t.done || t.due >= now {
                            return false;
                        }
                    }
                    DueFilter::Upcoming => {
                        if t.due <= now {
                            return false;
                        }
                    }
                }
            }
            true
        })
        .collect();

    if rows.is_empty() {
        println!("No reminders.");
        return;
    }
    print_table(&rows, now);
}

/// View a single reminder in detail.
pub fn cmd_view(store: &TaskStore, id: String) {
    let idx = resolve_or_die(store, &id);
    let t = &store.tasks[idx];

    println!("Name:        {}", t.name);
    println!("Due:         {}", t.due_str());
    println!("Repeat:      {}", format_repeat(t.repeat));
    println!("Priority:    {}", format_priority(t.priority));
    println!("Category:    {}", t.category);
    println!("State:       {}", if t.done { "done" } else { "pending" });
    if !t.description.is_empty() {
        println!("Description: {}", t.description);
    }
}

/// Update fields of an existing reminder.
pub fn cmd_update(
    store: &mut TaskStore,
    db_path: &Path,
    id: String,
    name: Option<String>,
    date: Option<String>,
    time: Option<String>,
    repeat: Option<Repeat>,
    desc: Option<String>,
    priority: Option<Priority>,
    category: Option<String>,
) {
    let idx = resolve_or_die(store, &id);

    if date.is_some() || time.is_some() {
        let current = store.tasks[idx].due;
        let date = date.unwrap_or_else(|| current.format("%Y-%m-%d").to_string());
        let time = time.unwrap_or_else(|| current.format("%H:%M").to_string());
        match parse_datetime(&format!("{date} {time}")) {
            Ok(due) => store.tasks[idx].due = due,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
    }

    let t = &mut store.tasks[idx];
    if let Some(n) = name {
        if n.trim().is_empty() {
            eprintln!("Reminder name cannot be empty");
            std::process::exit(1);
        }
        t.name = n.trim().to_string();
    }
    if let Some(r) = repeat {
        t.repeat = r;
    }
    if let Some(d) = desc {
        t.description = d;
    }
    if let Some(p) = priority {
        t.priority = p;
    }
    if let Some(c) = category {
        if !c.trim().is_empty() {
            t.category = c.trim().to_string();
        }
    }

    save_or_die(store, db_path);
    println!("Updated reminder {}", idx + 1);
}

/// Mark a reminder as done.
pub fn cmd_done(store: &mut TaskStore, db_path: &Path, id: String) {
    let idx = resolve_or_die(store, &id);
    store.tasks[idx].done = true;
    save_or_die(store, db_path);
    println!("Marked '{}' done", store.tasks[idx].name);
}

/// Clear the done flag on a reminder.
pub fn cmd_reopen(store: &mut TaskStore, db_path: &Path, id: String) {
    let idx = resolve_or_die(store, &id);
    store.tasks[idx].done = false;
    save_or_die(store, db_path);
    println!("Reopened '{}'", store.tasks[idx].name);
}

/// Delete a reminder from the list.
pub fn cmd_delete(store: &mut TaskStore, db_path: &Path, id: String) {
    let idx = resolve_or_die(store, &id);
    let removed = store.tasks.remove(idx);
    save_or_die(store, db_path);
    println!("Deleted '{}'", removed.name);
}

/// Run one due-check pass, firing console notifications for any task
/// inside its due window, and persist the resulting task state.
pub fn cmd_check(store: &mut TaskStore, db_path: &Path, now: Option<String>) {
    let now = match now {
        Some(ref s) => match parse_check_time(s) {
            Ok(n) => n,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        },
        None => Local::now().naive_local(),
    };

    let mut sched = Scheduler::new(ConsoleNotifier::default());
    sched.check_due_tasks(&mut store.tasks, now);

    if sched.notifier.fired > 0 {
        save_or_die(store, db_path);
        println!(
            "{} reminder{} fired",
            sched.notifier.fired,
            if sched.notifier.fired == 1 { "" } else { "s" }
        );
    } else {
        println!("No reminders due.");
    }
}

/// Poll the list file on an interval, firing console notifications.
///
/// The list is reloaded on every pass so edits made by other commands
/// (or another terminal) are picked up without restarting the watcher.
pub fn cmd_watch(db_path: &Path, interval: u64) {
    let interval = interval.max(1);
    println!(
        "Watching {} every {}s (Ctrl-C to stop)",
        db_path.display(),
        interval
    );

    loop {
        let mut store = TaskStore::load(db_path);
        let mut sched = Scheduler::new(ConsoleNotifier::default());
        sched.check_now(&mut store.tasks);
        if sched.notifier.fired > 0 {
            if let Err(e) = store.save(db_path) {
                eprintln!("Failed to save list: {e}");
            }
        }
        thread::sleep(StdDuration::from_secs(interval));
    }
}

/// Show all reminder lists, marking the last-opened one.
pub fn cmd_lists(data_dir: &Path, settings: &Settings) {
    let lists = match discover_lists(data_dir) {
        Ok(lists) => lists,
        Err(e) => {
            eprintln!("Failed to scan {}: {e}", data_dir.display());
            std::process::exit(1);
        }
    };

    if lists.is_empty() {
        println!("No reminder lists in {}. Create one with: remind new-list <name>", data_dir.display());
        return;
    }

    for list in &lists {
        let count = list.load_store().tasks.len();
        let marker = if settings.last_opened.as_deref() == Some(list.file_path.as_path()) {
            "*"
        } else {
            " "
        };
        println!("{} {:<24} {:>3} task{}", marker, list.display_name, count, if count == 1 { "" } else { "s" });
    }
}

/// Create a new reminder list in the data directory.
pub fn cmd_new_list(data_dir: &Path, name: String) {
    match create_list(&name, data_dir) {
        Ok(list) => println!("Created list '{}' at {}", list.display_name, list.file_path.display()),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

/// Generate shell completions to stdout.
pub fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut std::io::stdout());
}

fn resolve_or_die(store: &TaskStore, id: &str) -> usize {
    match store.resolve(id) {
        Ok(idx) => idx,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

/// Parse a `--now` override, with or without seconds.
fn parse_check_time(s: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s.trim(), DATETIME_FMT))
        .map_err(|_| format!("invalid --now '{}' (expected YYYY-MM-DD HH:MM[:SS])", s.trim()))
}

/// Print reminders in a formatted table with their 1-based positions.
fn print_table(rows: &[(usize, &Task)], now: NaiveDateTime) {
    println!(
        "{:<4} {:<17} {:<8} {:<7} {:<12} {:<8} {}",
        "#", "Due", "Repeat", "Pri", "Category", "State", "Name"
    );
    for (i, t) in rows {
        println!(
            "{:<4} {:<17} {:<8} {:<7} {:<12} {:<8} {}",
            i + 1,
            format_due_relative(t.due, now),
            format_repeat(t.repeat),
            format_priority(t.priority),
            truncate(&t.category, 12),
            if t.done { "done" } else { "pending" },
            t.name
        );
    }
}

/// Format a due timestamp relative to now ("today 09:00", "in 3d", "2d late").
pub fn format_due_relative(due: NaiveDateTime, now: NaiveDateTime) -> String {
    let days = (due.date() - now.date()).num_days();
    let hm = due.format("%H:%M");
    match days {
        0 => format!("today {}", hm),
        1 => format!("tomorrow {}", hm),
        d if d > 1 => format!("in {}d {}", d, hm),
        -1 => format!("yesterday {}", hm),
        d => format!("{}d late {}", -d, hm),
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        parse_datetime(s).unwrap()
    }

    #[test]
    fn test_format_due_relative() {
        let now = at("2025-01-10 12:00");
        assert_eq!(format_due_relative(at("2025-01-10 09:00"), now), "today 09:00");
        assert_eq!(format_due_relative(at("2025-01-11 07:30"), now), "tomorrow 07:30");
        assert_eq!(format_due_relative(at("2025-01-13 07:30"), now), "in 3d 07:30");
        assert_eq!(format_due_relative(at("2025-01-09 20:00"), now), "yesterday 20:00");
        assert_eq!(format_due_relative(at("2025-01-05 08:00"), now), "5d late 08:00");
    }

    #[test]
    fn test_parse_check_time_with_and_without_seconds() {
        assert_eq!(
            parse_check_time("2025-01-01 09:00:30").unwrap().to_string(),
            "2025-01-01 09:00:30"
        );
        assert_eq!(
            parse_check_time("2025-01-01 09:00").unwrap().to_string(),
            "2025-01-01 09:00:00"
        );
        assert!(parse_check_time("half nine").is_err());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 12), "short");
        assert_eq!(truncate("a rather long category", 8), "a rathe…");
    }
}
