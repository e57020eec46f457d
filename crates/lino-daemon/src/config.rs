// crates/lino-daemon/src/config.rs
//
// Runtime configuration for the Lino daemon.
// Loaded from a TOML file or populated with sensible defaults. Protocol
// parameters live under a `[params]` table; any parameter left out keeps its
// default.

use serde::Deserialize;
use std::fs;

use lino_core::Params;

/// Runtime configuration for the daemon.
#[derive(Debug, Clone, Deserialize)]
pub struct DaemonConfig {
    /// Directory for the RocksDB ledger.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Path to the genesis JSON, applied on first start only.
    #[serde(default = "default_genesis_path")]
    pub genesis_path: String,

    /// Path to the JSON block log to replay.
    #[serde(default = "default_block_log_path")]
    pub block_log_path: String,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// fsync every committed batch.
    #[serde(default)]
    pub sync_writes: bool,

    #[serde(default)]
    pub params: Params,
}

fn default_data_dir() -> String {
    "./lino-data".to_string()
}

fn default_genesis_path() -> String {
    "./genesis.json".to_string()
}

fn default_block_log_path() -> String {
    "./blocks.json".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            genesis_path: default_genesis_path(),
            block_log_path: default_block_log_path(),
            log_level: default_log_level(),
            sync_writes: false,
            params: Params::default(),
        }
    }
}

impl DaemonConfig {
    /// Load configuration from a TOML file at the given path.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: DaemonConfig = toml::from_str(contents)?;
        Ok(config)
    }
}
