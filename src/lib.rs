//! Freighter wallet connector
//!
//! Thin client-side adapter between a web application and the Freighter
//! browser extension for the Stellar network:
//! - Detect the extension, waiting for it to register
//! - Connect, checking the wallet is unlocked and on the expected network
//! - Forward transaction envelopes to the wallet for signing
//! - Remember the connected wallet in a key-value store
//!
//! The extension, its host page and the store are traits
//! ([`wallet::FreighterApi`], [`wallet::ExtensionHost`],
//! [`wallet::KeyValueStore`]), so the same connector runs against the real
//! browser (`browser`, wasm32 only) or against test doubles.

pub mod config;
pub mod freighter;
pub mod network;
pub mod session;
pub mod wallet;

#[cfg(target_arch = "wasm32")]
pub mod browser;

mod error;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use config::ConnectorConfig;
pub use error::{Error, Result};
pub use freighter::{FreighterConnector, FreighterError};
pub use network::{get_network_passphrase, NetworkType};
pub use session::WalletSession;
pub use wallet::{StoredWalletData, WalletStorage, WalletType};
