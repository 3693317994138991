use std::{fs, path::{Path, PathBuf}};

use directories::ProjectDirs;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use which::which;

use crate::{Result, StudyError, DEFAULT_FOCUS_MINUTES, DEFAULT_SLOT, MAX_FOCUS_MINUTES};

/// Application configuration settings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Directory holding the key/value store
    pub data_dir: PathBuf,

    /// Name of the slot the note collection is stored under
    pub storage_slot: String,

    /// Session length the focus timer starts with
    pub default_focus_minutes: u32,

    /// Editor used for `add --edit`
    pub editor_command: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = ProjectDirs::from("", "", "studynotes")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".studynotes"));

        Self {
            data_dir,
            storage_slot: DEFAULT_SLOT.to_string(),
            default_focus_minutes: DEFAULT_FOCUS_MINUTES,
            editor_command: None,
        }
    }
}

impl Config {
    /// Default location of the configuration file.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "studynotes").map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Loads the configuration from `path`, or from the default location.
    ///
    /// A missing file at the default location yields the defaults; a missing
    /// file that was asked for explicitly is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match Self::default_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            if explicit {
                return Err(StudyError::ConfigError {
                    message: format!("Config file not found: {}", path.display()),
                });
            }
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(&path)?;
        let config: Config = serde_json::from_str(&raw).map_err(|e| StudyError::ConfigError {
            message: format!("Invalid config file {}: {}", path.display(), e),
        })?;
        config.validate()?;

        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.storage_slot.trim().is_empty() {
            return Err(StudyError::ConfigError {
                message: "storage_slot must not be empty".to_string(),
            });
        }
        if self.default_focus_minutes == 0 {
            return Err(StudyError::ConfigError {
                message: "default_focus_minutes must be positive".to_string(),
            });
        }
        if self.default_focus_minutes > MAX_FOCUS_MINUTES {
            return Err(StudyError::ConfigError {
                message: format!(
                    "default_focus_minutes must be at most {}",
                    MAX_FOCUS_MINUTES
                ),
            });
        }
        Ok(())
    }

    // This method provides smart fallbacks when no editor is configured
    pub fn get_editor_command(&self) -> String {
        if let Some(editor) = &self.editor_command {
            return editor.clone();
        }

        if let Ok(editor) = std::env::var("EDITOR") {
            return editor;
        }

        if cfg!(windows) {
            "notepad".to_string()
        } else {
            for editor in &["nano", "vim", "vi"] {
                if which(editor).is_ok() {
                    return editor.to_string();
                }
            }
            "nano".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"default_focus_minutes": 50, "editor_command": "vim"}"#).unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.default_focus_minutes, 50);
        assert_eq!(config.storage_slot, DEFAULT_SLOT);
        assert_eq!(config.get_editor_command(), "vim");
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempdir().unwrap();
        let result = Config::load(Some(&dir.path().join("nope.json")));
        assert!(matches!(result, Err(StudyError::ConfigError { .. })));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"storage_slot": "  "}"#).unwrap();
        assert!(Config::load(Some(&path)).is_err());

        fs::write(&path, r#"{"default_focus_minutes": 500}"#).unwrap();
        assert!(matches!(
            Config::load(Some(&path)),
            Err(StudyError::ConfigError { .. })
        ));

        fs::write(&path, r#"{"default_focus_minutes": 180}"#).unwrap();
        assert_eq!(Config::load(Some(&path)).unwrap().default_focus_minutes, 180);

        fs::write(&path, "not json").unwrap();
        assert!(Config::load(Some(&path)).is_err());
    }
}
