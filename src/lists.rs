//! Named reminder lists.
//!
//! Each list is an individual JSON file in the data directory with the
//! naming convention `<list_name>_reminders.json`. This module handles
//! discovery, display-name conversion, and creation of list files.

use std::fs;
use std::path::{Path, PathBuf};

use crate::store::TaskStore;

/// A reminder list with its name and backing file path.
#[derive(Debug, Clone)]
pub struct ReminderList {
    pub name: String,
    pub display_name: String,
    pub file_path: PathBuf,
}

impl ReminderList {
    /// Create a list handle with the given display name.
    pub fn new(display_name: &str, data_dir: &Path) -> Self {
        let name = sanitize_list_name(display_name);
        let file_path = data_dir.join(format!("{}_reminders.json", name));

        ReminderList {
            name,
            display_name: display_name.to_string(),
            file_path,
        }
    }

    /// Reconstruct a list handle from an existing file path.
    pub fn from_file(file_path: PathBuf) -> Option<Self> {
        let file_name = file_path.file_stem()?.to_str()?;
        let name = file_name.strip_suffix("_reminders")?;
        let display_name = name.replace('_', " ");

        Some(ReminderList {
            name: name.to_string(),
            display_name,
            file_path,
        })
    }

    /// Create the backing file for this list if it doesn't exist.
    pub fn create_if_not_exists(&self) -> std::io::Result<()> {
        if !self.file_path.exists() {
            TaskStore::default().save(&self.file_path)?;
        }
        Ok(())
    }

    /// Load the task store for this list.
    pub fn load_store(&self) -> TaskStore {
        TaskStore::load(&self.file_path)
    }
}

/// Convert a display name to a safe list name for file naming:
/// lowercase, alphanumeric runs joined with underscores.
pub fn sanitize_list_name(display_name: &str) -> String {
    display_name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect::<String>()
        .split('_')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Discover all reminder lists in the data directory, sorted by display name.
pub fn discover_lists(data_dir: &Path) -> std::io::Result<Vec<ReminderList>> {
    let mut lists = Vec::new();

    if !data_dir.exists() {
        return Ok(lists);
    }

    for entry in fs::read_dir(data_dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() {
            if let Some(list) = ReminderList::from_file(path) {
                lists.push(list);
            }
        }
    }

    lists.sort_by(|a, b| a.display_name.cmp(&b.display_name));
    Ok(lists)
}

/// Create a new list, erroring if the name is empty or already taken.
pub fn create_list(display_name: &str, data_dir: &Path) -> Result<ReminderList, String> {
    if display_name.trim().is_empty() {
        return Err("List name cannot be empty".to_string());
    }

    let list = ReminderList::new(display_name, data_dir);
    if list.file_path.exists() {
        return Err(format!("List '{}' already exists", display_name));
    }
    list.create_if_not_exists()
        .map_err(|e| format!("Failed to create list file: {e}"))?;

    Ok(list)
}

/// Find the most recently modified list in the data directory.
pub fn most_recent_list(data_dir: &Path) -> std::io::Result<Option<ReminderList>> {
    let lists = discover_lists(data_dir)?;

    let mut most_recent: Option<(ReminderList, std::time::SystemTime)> = None;
    for list in lists {
        if let Ok(modified) = fs::metadata(&list.file_path).and_then(|m| m.modified()) {
            match &most_recent {
                None => most_recent = Some((list, modified)),
                Some((_, current)) => {
                    if modified > *current {
                        most_recent = Some((list, modified));
                    }
                }
            }
        }
    }

    Ok(most_recent.map(|(list, _)| list))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_list_name() {
        assert_eq!(sanitize_list_name("My Errands"), "my_errands");
        assert_eq!(sanitize_list_name("Work-Stuff_2025"), "work_stuff_2025");
        assert_eq!(sanitize_list_name("  Multiple   Spaces  "), "multiple_spaces");
        assert_eq!(sanitize_list_name("Special!@#Chars"), "special_chars");
        assert_eq!(sanitize_list_name(""), "");
    }

    #[test]
    fn test_from_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let list = ReminderList::new("My Errands", dir.path());
        assert!(list.file_path.ends_with("my_errands_reminders.json"));

        let back = ReminderList::from_file(list.file_path.clone()).unwrap();
        assert_eq!(back.name, "my_errands");
        assert_eq!(back.display_name, "my errands");
    }

    #[test]
    fn test_from_file_ignores_other_json() {
        assert!(ReminderList::from_file(PathBuf::from("/tmp/settings.json")).is_none());
    }

    #[test]
    fn test_create_and_discover() {
        let dir = tempfile::tempdir().unwrap();
        create_list("Errands", dir.path()).unwrap();
        create_list("Work", dir.path()).unwrap();
        assert!(create_list("Errands", dir.path()).is_err());
        assert!(create_list("   ", dir.path()).is_err());

        let lists = discover_lists(dir.path()).unwrap();
        let names: Vec<_> = lists.iter().map(|l| l.display_name.as_str()).collect();
        assert_eq!(names, vec!["errands", "work"]);
    }
}
