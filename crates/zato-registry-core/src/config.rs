use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::client::DEFAULT_PATH_TEMPLATE;
use crate::error::{RegistryError, Result};

const CONFIG_FILE: &str = "config.toml";

/// Cluster used when none is configured (or when zero is configured)
pub const DEFAULT_CLUSTER_ID: u64 = 1;

/// Default config template with rich comments
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# zato-connection-registry configuration file
# Location: ~/.zato-registry/config.toml

[remote]
# Cluster the channels are listed from and created on
# Default: 1
cluster_id = 1

# Path of the JSON API; "{}" is replaced by the service name
# Default: "/zato/json/{}"
path_template = "/zato/json/{}"

# HTTP timeout in seconds for every call (0 keeps the client default)
# Default: 0
timeout_secs = 0
"#;

/// Global configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub remote: RemoteConfig,
}

/// Settings for talking to the Zato API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Cluster id injected into every request
    #[serde(default = "default_cluster_id")]
    pub cluster_id: u64,

    /// Path template for API calls
    #[serde(default = "default_path_template")]
    pub path_template: String,

    /// Request timeout in seconds (0 = no override)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_cluster_id() -> u64 {
    DEFAULT_CLUSTER_ID
}

fn default_path_template() -> String {
    DEFAULT_PATH_TEMPLATE.to_string()
}

fn default_timeout_secs() -> u64 {
    0
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            cluster_id: default_cluster_id(),
            path_template: default_path_template(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl RemoteConfig {
    /// Timeout to hand to the HTTP client, `None` when not overridden
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

impl Config {
    /// Load config from base directory
    pub fn load(base_dir: &Path) -> Result<Self> {
        let path = base_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content).map_err(|e| RegistryError::ConfigParse {
            path: path.clone(),
            message: e.to_string(),
        })?;

        Ok(config)
    }

    /// Save config to base directory
    pub fn save(&self, base_dir: &Path) -> Result<()> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        let content = toml::to_string_pretty(self).map_err(|e| RegistryError::ConfigParse {
            path: path.clone(),
            message: e.to_string(),
        })?;

        fs::write(&path, content)?;
        Ok(())
    }

    /// Get config file path
    pub fn path(base_dir: &Path) -> PathBuf {
        base_dir.join(CONFIG_FILE)
    }

    /// Initialize config with default template (rich comments)
    pub fn init(base_dir: &Path) -> Result<PathBuf> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        if !path.exists() {
            fs::write(&path, DEFAULT_CONFIG_TEMPLATE)?;
        }

        Ok(path)
    }

    /// Get a config value by dot-notation key
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "remote.cluster_id" => Some(self.remote.cluster_id.to_string()),
            "remote.path_template" => Some(self.remote.path_template.clone()),
            "remote.timeout_secs" => Some(self.remote.timeout_secs.to_string()),
            _ => None,
        }
    }

    /// Set a config value by dot-notation key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "remote.cluster_id" => {
                self.remote.cluster_id = parse_u64(key, value)?;
                Ok(())
            }
            "remote.path_template" => {
                let template = value.trim();
                if !template.contains("{}") {
                    return Err(RegistryError::InvalidConfigValue {
                        key: key.to_string(),
                        value: value.to_string(),
                    });
                }
                self.remote.path_template = template.to_string();
                Ok(())
            }
            "remote.timeout_secs" => {
                self.remote.timeout_secs = parse_u64(key, value)?;
                Ok(())
            }
            _ => Err(RegistryError::ConfigKeyNotFound {
                key: key.to_string(),
            }),
        }
    }

    /// List all config keys with their current values
    pub fn list(&self) -> Vec<(String, String)> {
        ["remote.cluster_id", "remote.path_template", "remote.timeout_secs"]
            .iter()
            .filter_map(|key| self.get(key).map(|value| (key.to_string(), value)))
            .collect()
    }
}

fn parse_u64(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| RegistryError::InvalidConfigValue {
            key: key.to_string(),
            value: value.to_string(),
        })
}
