//! Configuration management.

use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::{BitcoinUnit, Error, Result, Settings};

/// Default LND REST endpoint.
pub const DEFAULT_REST_URL: &str = "https://localhost:8080";

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// LND REST endpoint.
    pub rest_url: String,
    /// TLS certificate of the node (PEM).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_cert_path: Option<PathBuf>,
    /// Admin macaroon of the node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macaroon_path: Option<PathBuf>,
    /// Unit amounts are entered in.
    #[serde(default)]
    pub unit: BitcoinUnit,
}

impl Default for Config {
    fn default() -> Self {
        let lnd_dir = directories::BaseDirs::new().map(|dirs| dirs.home_dir().join(".lnd"));

        Self {
            rest_url: DEFAULT_REST_URL.to_string(),
            tls_cert_path: lnd_dir.as_ref().map(|dir| dir.join("tls.cert")),
            macaroon_path: lnd_dir.map(|dir| {
                dir.join("data/chain/bitcoin/mainnet/admin.macaroon")
            }),
            unit: BitcoinUnit::default(),
        }
    }
}

impl Config {
    /// Load configuration from disk or create default.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Self = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to disk.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    /// Settings seeded into the wallet state.
    pub const fn settings(&self) -> Settings {
        Settings { unit: self.unit }
    }

    /// Get configuration file path.
    fn config_path() -> Result<PathBuf> {
        ProjectDirs::from("", "", "lnapp")
            .map(|dirs| dirs.config_dir().join("config.json"))
            .ok_or_else(|| Error::Config("could not determine config directory".into()))
    }
}
