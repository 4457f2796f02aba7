use crate::error::{Result, TreeNavError};
use crate::persistence::DEFAULT_PINNED_KEY;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub keybindings: KeybindingConfig,
    pub storage: StorageConfig,
}

/// Key names bound to the five logical actions (see `event::parse_key_name`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeybindingConfig {
    pub move_next: Vec<String>,
    pub move_prev: Vec<String>,
    pub expand: Vec<String>,
    pub collapse: Vec<String>,
    pub activate: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for persisted pins. Falls back to the platform data directory.
    pub directory: Option<PathBuf>,
    pub pinned_key: String,
}

impl Default for KeybindingConfig {
    fn default() -> Self {
        Self {
            move_next: vec!["down".to_string(), "j".to_string()],
            move_prev: vec!["up".to_string(), "k".to_string()],
            expand: vec!["right".to_string(), "l".to_string()],
            collapse: vec!["left".to_string(), "h".to_string()],
            activate: vec!["enter".to_string()],
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            directory: None,
            pinned_key: DEFAULT_PINNED_KEY.to_string(),
        }
    }
}

impl Config {
    /// Load from a JSON file, or defaults when no path is given.
    /// Missing fields in the file take their default values.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| TreeNavError::Config(format!("{}: {}", path.display(), e)))?;
        log::debug!("Config: loaded from {:?}", path);
        Ok(config)
    }

    /// Where pins live: the configured directory, else `<data dir>/tree-navigator`
    pub fn pins_directory(&self) -> Option<PathBuf> {
        self.storage
            .directory
            .clone()
            .or_else(|| dirs::data_dir().map(|dir| dir.join("tree-navigator")))
    }
}
