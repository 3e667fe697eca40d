//! Configuration for the Freighter connector

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::network::NetworkType;
use crate::wallet::{MAX_POLL_CHECKS, NETWORK_STORAGE_KEY, WALLET_STORAGE_KEY};
use crate::{Error, Result};

/// Environment variable names
pub mod env_vars {
    pub const NETWORK: &str = "FREIGHTER_NETWORK";
    pub const DETECT_TIMEOUT_MS: &str = "FREIGHTER_DETECT_TIMEOUT_MS";
    pub const POLL_INTERVAL_MS: &str = "FREIGHTER_POLL_INTERVAL_MS";
}

/// Connector settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorConfig {
    /// Network the application expects the wallet to be on
    pub network: NetworkType,
    /// How long to wait for the extension to register (milliseconds)
    pub detect_timeout_ms: u64,
    /// Delay between detection checks (milliseconds)
    pub poll_interval_ms: u64,
    /// Storage key for the connected wallet record
    pub wallet_storage_key: String,
    /// Storage key for the preferred network
    pub network_storage_key: String,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            network: NetworkType::Testnet,
            detect_timeout_ms: 3_000,
            poll_interval_ms: 100,
            wallet_storage_key: WALLET_STORAGE_KEY.to_string(),
            network_storage_key: NETWORK_STORAGE_KEY.to_string(),
        }
    }
}

impl ConnectorConfig {
    /// Defaults overlaid with `FREIGHTER_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides()
    }

    /// Load a JSON config file; missing fields take their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply any `FREIGHTER_*` environment variables on top of `self`
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(value) = lookup(env_vars::NETWORK) {
            tracing::debug!("Using {} for network", env_vars::NETWORK);
            self.network = value.parse()?;
        }
        if let Some(value) = lookup(env_vars::DETECT_TIMEOUT_MS) {
            tracing::debug!("Using {} for detection timeout", env_vars::DETECT_TIMEOUT_MS);
            self.detect_timeout_ms = parse_millis(env_vars::DETECT_TIMEOUT_MS, &value)?;
        }
        if let Some(value) = lookup(env_vars::POLL_INTERVAL_MS) {
            tracing::debug!("Using {} for poll interval", env_vars::POLL_INTERVAL_MS);
            self.poll_interval_ms = parse_millis(env_vars::POLL_INTERVAL_MS, &value)?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(Error::Config("poll_interval_ms must be positive".to_string()));
        }
        let longest_wait_ms = self.poll_interval_ms.saturating_mul(MAX_POLL_CHECKS);
        if self.detect_timeout_ms > longest_wait_ms {
            return Err(Error::Config(format!(
                "detect_timeout_ms {} exceeds {} polls of {}ms ({}ms)",
                self.detect_timeout_ms, MAX_POLL_CHECKS, self.poll_interval_ms, longest_wait_ms
            )));
        }
        if self.wallet_storage_key.is_empty() || self.network_storage_key.is_empty() {
            return Err(Error::Config("storage keys must not be empty".to_string()));
        }
        if self.wallet_storage_key == self.network_storage_key {
            return Err(Error::Config(
                "wallet and network storage keys must differ".to_string(),
            ));
        }
        Ok(())
    }

    pub fn detect_timeout(&self) -> Duration {
        Duration::from_millis(self.detect_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

fn parse_millis(name: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|e| Error::Config(format!("{} must be a number of milliseconds: {}", name, e)))
}
