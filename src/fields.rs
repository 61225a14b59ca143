//! Enumerations and field types for reminder tasks.
//!
//! This module defines the structured value types attached to a task:
//! the repeat policy driving the scheduler and the informational
//! priority level.

use chrono::Duration;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Repeat policy governing what happens to a task after it fires.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Repeat {
    #[default]
    #[serde(alias = "None")]
    None,
    #[serde(alias = "Daily")]
    Daily,
    #[serde(alias = "Weekly")]
    Weekly,
}

impl Repeat {
    /// The interval between occurrences, or `None` for one-shot tasks.
    pub fn interval(self) -> Option<Duration> {
        match self {
            Repeat::None => None,
            Repeat::Daily => Some(Duration::days(1)),
            Repeat::Weekly => Some(Duration::days(7)),
        }
    }
}

/// Priority classification. Informational only; the scheduler ignores it.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    #[serde(alias = "Low")]
    Low,
    #[default]
    #[serde(alias = "Normal")]
    Normal,
    #[serde(alias = "High")]
    High,
}

/// Filtering options for task lists based on due dates.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DueFilter {
    Today,
    Overdue,
    Upcoming,
}

/// Format a repeat policy for display.
pub fn format_repeat(r: Repeat) -> &'static str {
    match r {
        Repeat::None => "-",
        Repeat::Daily => "Daily",
        Repeat::Weekly => "Weekly",
    }
}

/// Format a priority level for display.
pub fn format_priority(p: Priority) -> &'static str {
    match p {
        Priority::Low => "Low",
        Priority::Normal => "Normal",
        Priority::High => "High",
    }
}
