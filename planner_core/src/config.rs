//! Configuration file support for the planner.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/planner/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub tasks: TasksConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Task listing configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TasksConfig {
    /// Maximum number of tasks shown by `list`
    #[serde(default = "default_list_limit")]
    pub list_limit: usize,
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            list_limit: default_list_limit(),
        }
    }
}

/// Path of the task store inside a data directory
pub fn store_path(data_dir: &Path) -> PathBuf {
    data_dir.join("tasks.json")
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME")
            .expect("HOME environment variable not set");
        PathBuf::from(home).join(".local/share")
    });
    base.join("planner")
}

fn default_list_limit() -> usize {
    50
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Reject values that would make the planner unusable
    pub fn validate(&self) -> Result<()> {
        if self.tasks.list_limit == 0 {
            return Err(Error::Config("tasks.list_limit must be at least 1".into()));
        }
        Ok(())
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME")
                .expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("planner").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.tasks.list_limit, 50);
        assert!(config.data.data_dir.ends_with("planner"));
        assert!(store_path(&config.data.data_dir).ends_with("planner/tasks.json"));
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[data]
data_dir = "/tmp/planner-test"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.data.data_dir, PathBuf::from("/tmp/planner-test"));
        assert_eq!(config.tasks.list_limit, 50); // default
    }

    #[test]
    fn test_save_and_load_from() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.tasks.list_limit = 10;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.tasks.list_limit, 10);
        assert_eq!(loaded.data.data_dir, config.data.data_dir);
    }

    #[test]
    fn test_zero_list_limit_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[tasks]\nlist_limit = 0\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(Error::Config(_))));
    }
}
