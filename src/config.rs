use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config yaml: {0}")]
    Parse(#[from] serde_yaml::Error),
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    /// Environment variable whose filter directives replace `log_level`
    #[serde(default = "default_log_filter_env")]
    pub log_filter_env: String,
    pub api: ApiConfig,
    #[serde(default)]
    pub realtime: RealtimeConfig,
    #[serde(default)]
    pub reprogram: ReprogramConfig,
}

fn default_log_filter_env() -> String {
    "VOLEY_LOG".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Realtime invalidation channel settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RealtimeConfig {
    pub enabled: bool,
    pub base_url: String,
    /// Fixed delay before each reconnect attempt after an abnormal closure
    pub reconnect_delay_ms: u64,
}

impl RealtimeConfig {
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "ws://localhost:8080/ws".to_string(),
            reconnect_delay_ms: 3000,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ReprogramConfig {
    /// How long a simulated proposal stays confirmable
    pub proposal_ttl_secs: u64,
}

impl ReprogramConfig {
    pub fn proposal_ttl(&self) -> Duration {
        Duration::from_secs(self.proposal_ttl_secs)
    }
}

impl Default for ReprogramConfig {
    fn default() -> Self {
        Self {
            proposal_ttl_secs: 300,
        }
    }
}

impl AppConfig {
    /// Load `config/<env>.yaml`
    pub fn load(env: &str) -> Result<Self, ConfigError> {
        Self::from_file(&format!("config/{}.yaml", env))
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }
}
