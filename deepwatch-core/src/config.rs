//! Configuration parsing and management.

use crate::error::{Result, WatchError};
use crate::strategy::MonitorStrategy;
use deepwatch_types::Value;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Monitoring configuration, as read from `deepwatch.yml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Name of a built-in strategy (`flag` or `count`)
    #[serde(default = "default_strategy")]
    pub strategy: String,

    /// Starting value for every monitor leaf; defaults per strategy
    #[serde(default)]
    pub initial_value: Option<Value>,
}

fn default_strategy() -> String {
    String::from("flag")
}

impl Default for WatchConfig {
    fn default() -> Self {
        WatchConfig {
            strategy: default_strategy(),
            initial_value: None,
        }
    }
}

impl WatchConfig {
    /// Parse a YAML document
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Load from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| WatchError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&text)?;
        debug!(path = %path.display(), strategy = %config.strategy, "loaded config");
        Ok(config)
    }

    /// Load from a YAML file, falling back to defaults if it does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// The strategy this configuration describes
    pub fn monitor_strategy(&self) -> MonitorStrategy {
        MonitorStrategy::named(&self.strategy, self.initial_value.clone())
    }

    /// Initial leaf value, resolved against the strategy default
    pub fn resolved_initial_value(&self) -> Value {
        self.monitor_strategy().initial_value
    }
}
