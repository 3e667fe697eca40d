//! Wallet utilities
//!
//! Session persistence, the extension contract, and extension detection.
//! Nothing here depends on the connector.

mod detect;
mod extension;
mod storage;

#[cfg(not(target_arch = "wasm32"))]
pub use detect::TokioSleeper;
pub use detect::{
    is_extension_installed, poll_for_extension, wait_for_extension, Sleeper,
    DEFAULT_DETECT_TIMEOUT, MAX_POLL_CHECKS, POLL_INTERVAL,
};
pub use extension::{ExtensionError, ExtensionHost, FreighterApi, NoExtension, SignOptions};
pub use storage::{
    FileStore, KeyValueStore, MemoryStore, StoredWalletData, WalletStorage, WalletType,
    NETWORK_STORAGE_KEY, WALLET_STORAGE_KEY,
};
