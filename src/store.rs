//! Task list persistence and lookup.
//!
//! A reminder list is stored on disk as a JSON array of flat task
//! records. Loading is forgiving (missing file means an empty list,
//! corrupt JSON starts fresh with a note on stderr); saving is atomic
//! via a temp file and rename.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use crate::task::Task;

/// In-memory reminder list backing one JSON file.
#[derive(Debug, Default)]
pub struct TaskStore {
    pub tasks: Vec<Task>,
}

impl TaskStore {
    /// Load a store from a JSON file, returning an empty store if the
    /// file doesn't exist or can't be parsed.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return TaskStore::default();
        }
        let mut buf = String::new();
        match File::open(path).and_then(|mut f| f.read_to_string(&mut buf)) {
            Ok(_) => match serde_json::from_str(&buf) {
                Ok(tasks) => TaskStore { tasks },
                Err(e) => {
                    eprintln!("Error parsing {}, starting fresh: {e}", path.display());
                    TaskStore::default()
                }
            },
            Err(e) => {
                eprintln!("Error reading {}, starting fresh: {e}", path.display());
                TaskStore::default()
            }
        }
    }

    /// Save the store using atomic write (temp file + rename).
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let tmp = path.with_extension("json.tmp");
        let mut f = File::create(&tmp)?;
        let data = serde_json::to_string_pretty(&self.tasks)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        f.write_all(data.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, path)?;
        Ok(())
    }

    /// Resolve a task identifier (1-based position or name) to an index.
    ///
    /// Name matching is case-insensitive; an ambiguous name is an error
    /// listing the matching positions so the user can retry by number.
    pub fn resolve(&self, identifier: &str) -> Result<usize, String> {
        if let Ok(pos) = identifier.parse::<usize>() {
            if pos >= 1 && pos <= self.tasks.len() {
                return Ok(pos - 1);
            }
            return Err(format!(
                "no task at position {} (list has {})",
                pos,
                self.tasks.len()
            ));
        }

        let wanted = identifier.to_lowercase();
        let matches: Vec<usize> = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.name.to_lowercase() == wanted)
            .map(|(i, _)| i)
            .collect();

        match matches.len() {
            0 => Err(format!("no task named '{}'", identifier)),
            1 => Ok(matches[0]),
            _ => {
                let mut msg = format!("multiple tasks named '{}':\n", identifier);
                for i in &matches {
                    msg.push_str(&format!("  {}: due {}\n", i + 1, self.tasks[*i].due_str()));
                }
                msg.push_str("Please use the position number instead.");
                Err(msg)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{Priority, Repeat};

    fn sample(name: &str, due: &str) -> Task {
        Task::build(name, &due[..10], &due[11..], Repeat::None, "", Priority::Normal, "").unwrap()
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reminders.json");

        let store = TaskStore {
            tasks: vec![sample("Pay bills", "2025-01-01 09:00"), sample("Gym", "2025-01-02 07:30")],
        };
        store.save(&path).unwrap();

        let loaded = TaskStore::load(&path);
        assert_eq!(loaded.tasks, store.tasks);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStore::load(&dir.path().join("nope.json"));
        assert!(store.tasks.is_empty());
    }

    #[test]
    fn test_load_corrupt_file_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reminders.json");
        fs::write(&path, "{not json").unwrap();

        let store = TaskStore::load(&path);
        assert!(store.tasks.is_empty());
    }

    #[test]
    fn test_resolve_by_position_and_name() {
        let store = TaskStore {
            tasks: vec![sample("Pay bills", "2025-01-01 09:00"), sample("Gym", "2025-01-02 07:30")],
        };
        assert_eq!(store.resolve("1").unwrap(), 0);
        assert_eq!(store.resolve("gym").unwrap(), 1);
        assert!(store.resolve("3").is_err());
        assert!(store.resolve("dentist").is_err());
    }

    #[test]
    fn test_resolve_ambiguous_name_is_an_error() {
        let store = TaskStore {
            tasks: vec![sample("Gym", "2025-01-01 09:00"), sample("gym", "2025-01-02 07:30")],
        };
        let err = store.resolve("Gym").unwrap_err();
        assert!(err.contains("multiple tasks"));
    }
}
