//! Stellar network identifiers
//!
//! The application speaks `MAINNET` / `TESTNET`, the Freighter extension speaks
//! `PUBLIC` / `TESTNET`, and signing needs the network passphrase. All three
//! vocabularies are tied together here so they cannot drift apart.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::Error;

/// Passphrase of the public Stellar network
pub const MAINNET_PASSPHRASE: &str = "Public Global Stellar Network ; September 2015";
/// Passphrase of the SDF test network
pub const TESTNET_PASSPHRASE: &str = "Test SDF Network ; September 2015";

/// Network token Freighter reports for the public network
pub const PUBLIC_TOKEN: &str = "PUBLIC";
/// Network token Freighter reports for the test network
pub const TESTNET_TOKEN: &str = "TESTNET";

/// Application-level network selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, Default)]
#[serde(rename_all = "UPPERCASE")]
#[ts(export)]
pub enum NetworkType {
    Mainnet,
    #[default]
    Testnet,
}

impl NetworkType {
    pub const ALL: [NetworkType; 2] = [NetworkType::Mainnet, NetworkType::Testnet];

    /// Application label, as persisted and shown to users
    pub fn name(&self) -> &'static str {
        match self {
            NetworkType::Mainnet => "MAINNET",
            NetworkType::Testnet => "TESTNET",
        }
    }

    /// Token the extension uses for this network
    pub fn extension_token(&self) -> &'static str {
        match self {
            NetworkType::Mainnet => PUBLIC_TOKEN,
            NetworkType::Testnet => TESTNET_TOKEN,
        }
    }

    pub fn passphrase(&self) -> &'static str {
        match self {
            NetworkType::Mainnet => MAINNET_PASSPHRASE,
            NetworkType::Testnet => TESTNET_PASSPHRASE,
        }
    }

    /// Inverse of [`NetworkType::extension_token`]
    pub fn from_extension_token(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|network| network.extension_token() == token)
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NetworkType {
    type Err = Error;

    /// Accepts application labels and extension tokens, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|network| network.name() == upper || network.extension_token() == upper)
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "Unknown network '{}'. Expected MAINNET or TESTNET",
                    s
                ))
            })
    }
}

/// Passphrase that scopes signatures to `network`
pub fn get_network_passphrase(network: NetworkType) -> &'static str {
    network.passphrase()
}
