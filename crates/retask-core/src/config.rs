use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetaskConfig {
    /// Create `.jsonl.backup` copies when the command line does not say.
    pub backup: Option<bool>,
}

pub fn config_path(dataset_dir: &Path) -> PathBuf {
    dataset_dir.join(".retask.toml")
}

pub fn resolve_user_home_dir() -> Option<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        let trimmed = home.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    if let Ok(profile) = std::env::var("USERPROFILE") {
        let trimmed = profile.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    None
}

pub fn resolve_retask_home_dir() -> Option<PathBuf> {
    if let Ok(value) = std::env::var("RETASK_HOME") {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    resolve_user_home_dir().map(|home| home.join(".retask"))
}

pub fn global_config_path() -> Option<PathBuf> {
    resolve_retask_home_dir().map(|home| home.join("config.toml"))
}

pub fn read_config(path: &Path) -> Result<RetaskConfig, ConfigError> {
    let text = fs::read_to_string(path)?;
    Ok(toml::from_str::<RetaskConfig>(&text)?)
}

fn load_if_present(path: &Path) -> Option<RetaskConfig> {
    if !path.is_file() {
        return None;
    }
    match read_config(path) {
        Ok(config) => Some(config),
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "ignoring unreadable config");
            None
        }
    }
}

pub fn load_config(dataset_dir: &Path) -> Option<RetaskConfig> {
    load_if_present(&config_path(dataset_dir))
}

pub fn load_global_config() -> Option<RetaskConfig> {
    load_if_present(&global_config_path()?)
}

/// Backup default for a dataset and where it came from:
/// `"project"`, `"global"`, or `"default"` (off).
pub fn resolve_backup_default_with_source(dataset_dir: &Path) -> (bool, &'static str) {
    if let Some(value) = load_config(dataset_dir).and_then(|config| config.backup) {
        return (value, "project");
    }
    if let Some(value) = load_global_config().and_then(|config| config.backup) {
        return (value, "global");
    }
    (false, "default")
}
