use figment::{
    providers::{Env, Format, Json, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::import::DEFAULT_PATTERN;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Directory holding one JSON file per group.
    pub data_dir: PathBuf,
    /// Directory searched for scan exports.
    pub scan_dir: PathBuf,
    /// File name pattern of scan exports.
    pub scan_pattern: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: "hosts".into(),
            scan_dir: ".".into(),
            scan_pattern: DEFAULT_PATTERN.into(),
        }
    }
}

impl Config {
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file("hostsync.toml"))
            .merge(Json::file("hostsync.json"))
            .merge(Env::prefixed("HOSTSYNC_"))
    }

    pub fn load() -> anyhow::Result<Self> {
        let config: Config = Self::figment()
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

        if let Err(e) = glob::Pattern::new(&config.scan_pattern) {
            anyhow::bail!("Invalid scan_pattern {:?}: {}", config.scan_pattern, e);
        }

        Ok(config)
    }
}
