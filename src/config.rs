use std::path::PathBuf;

use tracing::trace;

/// Storage configuration for the local log store
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./history.db")
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Config {
    /// Operator-assigned configuration version; takes precedence over the
    /// computed content hash when tagging reports
    pub version: Option<String>,

    pub probes: Option<Vec<ProbeConfig>>,

    pub notifications: Option<Vec<NotificationChannelConfig>>,

    /// Central collector to report history to (optional - reporting is
    /// disabled without it)
    pub symon: Option<SymonConfig>,

    /// Storage configuration (optional - defaults to ./history.db)
    pub storage: Option<StorageConfig>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ProbeConfig {
    pub id: String,
    pub name: Option<String>,
    pub url: String,
    #[serde(default = "default_probe_interval")]
    pub interval: u64,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct NotificationChannelConfig {
    pub id: String,
    #[serde(rename = "type")]
    pub channel_type: String,
    /// Channel-specific settings (recipients, webhook URL, ...), opaque to
    /// this core
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SymonConfig {
    /// Base URL of the collector, e.g. "https://symon.example.com"
    pub url: String,
    pub api_key: String,
    pub instance_id: String,
    /// Seconds between report cycles
    #[serde(default = "default_report_interval")]
    pub report_interval: u64,
}

fn default_probe_interval() -> u64 {
    10
}

fn default_report_interval() -> u64 {
    60
}

pub fn read_config_file(path: &str) -> anyhow::Result<Config> {
    let file_content = std::fs::read_to_string(path)?;
    serde_json::from_str(&file_content)
        .map_err(|_| anyhow::anyhow!("Invalid configuration file provided!"))
        .inspect(|config| trace!("loaded config: {config:?}"))
}
