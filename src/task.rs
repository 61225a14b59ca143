//! Task data structure and related functionality.
//!
//! This module defines the core `Task` struct representing a single
//! schedulable reminder, plus construction helpers that parse the
//! minute-resolution timestamp format used everywhere in the tool.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::fields::{Priority, Repeat};

/// On-disk and user-facing timestamp format, minute resolution.
pub const DATETIME_FMT: &str = "%Y-%m-%d %H:%M";

/// A single schedulable reminder.
///
/// `done` only ever becomes true for one-shot tasks (`repeat == None`);
/// repeating tasks are rescheduled forward instead of being finalised.
/// `priority` and `category` are carried for display and filtering but
/// never consulted by the scheduler.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub name: String,
    #[serde(rename = "datetime", with = "datetime_fmt")]
    pub due: NaiveDateTime,
    #[serde(default)]
    pub repeat: Repeat,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default = "default_category")]
    pub category: String,
}

fn default_category() -> String {
    "General".to_string()
}

impl Task {
    /// Build a task from separate date and time strings, as entered in
    /// the add form or on the command line. Timestamp parsing happens
    /// here, at construction; the scheduler assumes it already succeeded.
    pub fn build(
        name: &str,
        date: &str,
        time: &str,
        repeat: Repeat,
        description: &str,
        priority: Priority,
        category: &str,
    ) -> Result<Self, String> {
        let due = parse_datetime(&format!("{} {}", date.trim(), time.trim()))?;
        Ok(Task {
            name: name.trim().to_string(),
            due,
            repeat,
            description: description.to_string(),
            done: false,
            priority,
            category: if category.trim().is_empty() {
                default_category()
            } else {
                category.trim().to_string()
            },
        })
    }

    /// Render the due timestamp in the canonical format.
    pub fn due_str(&self) -> String {
        self.due.format(DATETIME_FMT).to_string()
    }
}

/// Parse a `"YYYY-MM-DD HH:MM"` timestamp.
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s.trim(), DATETIME_FMT)
        .map_err(|e| format!("invalid timestamp '{}' (expected YYYY-MM-DD HH:MM): {}", s.trim(), e))
}

mod datetime_fmt {
    use chrono::NaiveDateTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    use super::DATETIME_FMT;

    pub fn serialize<S: Serializer>(dt: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&dt.format(DATETIME_FMT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, DATETIME_FMT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_parses_date_and_time() {
        let t = Task::build(
            "Pay bills",
            "2025-01-01",
            "09:00",
            Repeat::Daily,
            "rent and power",
            Priority::High,
            "",
        )
        .unwrap();
        assert_eq!(t.due_str(), "2025-01-01 09:00");
        assert_eq!(t.category, "General");
        assert!(!t.done);
    }

    #[test]
    fn test_build_rejects_malformed_timestamp() {
        let err = Task::build("x", "2025-13-01", "09:00", Repeat::None, "", Priority::Normal, "")
            .unwrap_err();
        assert!(err.contains("invalid timestamp"));
        assert!(Task::build("x", "2025-01-01", "9am", Repeat::None, "", Priority::Normal, "").is_err());
    }

    #[test]
    fn test_serde_flat_record_format() {
        let t = Task::build("Standup", "2025-11-15", "14:30", Repeat::Weekly, "", Priority::Normal, "Work")
            .unwrap();
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["datetime"], "2025-11-15 14:30");
        assert_eq!(json["repeat"], "weekly");
        assert_eq!(json["done"], false);

        let back: Task = serde_json::from_value(json).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn test_deserialize_tolerates_missing_optional_fields() {
        let t: Task =
            serde_json::from_str(r#"{"name":"Call mum","datetime":"2025-11-15 14:30"}"#).unwrap();
        assert_eq!(t.repeat, Repeat::None);
        assert_eq!(t.priority, Priority::Normal);
        assert_eq!(t.category, "General");
        assert_eq!(t.description, "");
        assert!(!t.done);
    }

    #[test]
    fn test_deserialize_accepts_legacy_capitalised_enums() {
        let t: Task = serde_json::from_str(
            r#"{"name":"Gym","datetime":"2025-11-15 07:00","repeat":"Weekly","priority":"High"}"#,
        )
        .unwrap();
        assert_eq!(t.repeat, Repeat::Weekly);
        assert_eq!(t.priority, Priority::High);
    }
}
