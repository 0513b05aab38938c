use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{PocketbookError, Result};
use crate::session::DEFAULT_RESERVE_GOAL;

/// User preferences. Read once at startup, never written by the app.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub user_name: String,
    #[serde(default = "default_reserve_goal")]
    pub reserve_goal: f64,
}

fn default_reserve_goal() -> f64 {
    DEFAULT_RESERVE_GOAL
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            user_name: String::new(),
            reserve_goal: default_reserve_goal(),
        }
    }
}

impl Settings {
    /// Goal the session opens with; a non-finite configured value falls back
    /// to the default.
    pub fn starting_goal(&self) -> f64 {
        if self.reserve_goal.is_finite() {
            self.reserve_goal
        } else {
            DEFAULT_RESERVE_GOAL
        }
    }

    pub fn dashboard_title(&self) -> String {
        let name = self.user_name.trim();
        if name.is_empty() {
            "Finance Dashboard".to_string()
        } else {
            format!("{name}'s Finance Dashboard")
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("pocketbook")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn read_settings(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| PocketbookError::Settings(e.to_string()))
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if !path.exists() {
        return Settings::default();
    }
    match read_settings(&path) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!(path = %path.display(), "ignoring settings file: {e}");
            Settings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_settings_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"user_name": "Alice", "reserve_goal": 1200.5}"#).unwrap();
        let loaded = read_settings(&path).unwrap();
        assert_eq!(loaded.user_name, "Alice");
        assert_eq!(loaded.reserve_goal, 1200.5);
    }

    #[test]
    fn test_defaults_when_missing() {
        let s = Settings::default();
        assert!(s.user_name.is_empty());
        assert_eq!(s.reserve_goal, 5000.0);
        assert_eq!(s.dashboard_title(), "Finance Dashboard");
    }

    #[test]
    fn test_merges_with_defaults() {
        let s: Settings = serde_json::from_str(r#"{"user_name": "Bob"}"#).unwrap();
        assert_eq!(s.reserve_goal, 5000.0);
        assert_eq!(s.dashboard_title(), "Bob's Finance Dashboard");
    }

    #[test]
    fn test_malformed_file_is_settings_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(read_settings(&path), Err(PocketbookError::Settings(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(matches!(read_settings(&path), Err(PocketbookError::Io(_))));
    }

    #[test]
    fn test_starting_goal_guards_non_finite() {
        let s = Settings {
            user_name: String::new(),
            reserve_goal: f64::INFINITY,
        };
        assert_eq!(s.starting_goal(), 5000.0);
        let s = Settings {
            user_name: String::new(),
            reserve_goal: -10.0,
        };
        assert_eq!(s.starting_goal(), -10.0);
    }
}
