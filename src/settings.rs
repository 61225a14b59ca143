//! Application settings: recent lists and the last-opened list.
//!
//! Settings are an explicitly passed value, loaded once and saved back
//! as a whole. No process-wide state: commands that need the settings
//! take a `Settings` argument and return or save the updated snapshot.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Upper bound on the recent-lists history.
pub const MAX_RECENT: usize = 10;

/// Persistent application settings snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub recent_lists: Vec<PathBuf>,
    #[serde(default)]
    pub last_opened: Option<PathBuf>,
}

impl Settings {
    /// Load settings from a JSON file, falling back to defaults when the
    /// file is missing or unreadable.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Invalid settings file {}, using defaults: {e}", path.display());
                    Settings::default()
                }
            },
            Err(_) => Settings::default(),
        }
    }

    /// Save settings using atomic write (temp file + rename).
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("json.tmp");
        let mut f = File::create(&tmp)?;
        let data = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        f.write_all(data.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, path)?;
        Ok(())
    }

    /// Move or insert a list path at the front of the recent history and
    /// record it as the last-opened list. The history is deduplicated
    /// and bounded at `MAX_RECENT`.
    pub fn touch_recent(&mut self, path: &Path) {
        self.recent_lists.retain(|p| p != path);
        self.recent_lists.insert(0, path.to_path_buf());
        self.recent_lists.truncate(MAX_RECENT);
        self.last_opened = Some(path.to_path_buf());
    }
}

/// Location of the settings file inside the data directory.
pub fn settings_path(data_dir: &Path) -> PathBuf {
    data_dir.join("settings.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let s = Settings::load(&settings_path(dir.path()));
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn test_load_corrupt_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = settings_path(dir.path());
        fs::write(&path, "][").unwrap();
        assert_eq!(Settings::load(&path), Settings::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = settings_path(dir.path());

        let mut s = Settings::default();
        s.touch_recent(&dir.path().join("errands_reminders.json"));
        s.save(&path).unwrap();

        assert_eq!(Settings::load(&path), s);
    }

    #[test]
    fn test_touch_recent_dedups_and_bounds() {
        let mut s = Settings::default();
        for i in 0..12 {
            s.touch_recent(&PathBuf::from(format!("/data/list{i}.json")));
        }
        assert_eq!(s.recent_lists.len(), MAX_RECENT);

        // Re-touching an existing entry moves it to the front without growing.
        let repeat = PathBuf::from("/data/list5.json");
        s.touch_recent(&repeat);
        assert_eq!(s.recent_lists[0], repeat);
        assert_eq!(s.recent_lists.len(), MAX_RECENT);
        assert_eq!(s.last_opened.as_deref(), Some(repeat.as_path()));
    }
}
