//! Session persistence
//!
//! The connected wallet is remembered as a small JSON document under a fixed
//! key in a synchronous key-value store (`window.localStorage` in the browser,
//! a JSON file or memory elsewhere). Reads never fail: a missing store, a
//! missing key or a document that doesn't match [`StoredWalletData`] all read
//! back as "no data".

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use ts_rs::TS;

use crate::config::ConnectorConfig;
use crate::network::NetworkType;
use crate::{Error, Result};

/// Storage key holding the serialized [`StoredWalletData`]
pub const WALLET_STORAGE_KEY: &str = "lumentix_wallet";
/// Storage key holding the preferred [`NetworkType`]
pub const NETWORK_STORAGE_KEY: &str = "lumentix_network";

/// Wallet kinds the application can be connected through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum WalletType {
    Freighter,
}

/// Persisted record of the connected wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[ts(export)]
pub struct StoredWalletData {
    pub wallet_type: WalletType,
    pub public_key: String,
    pub network: NetworkType,
}

/// Synchronous string key-value store
///
/// Mirrors the Web Storage API. Implementations use interior mutability; the
/// store is only ever touched from one thread.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str) -> Result<()>;
}

/// In-memory store, used for tests and headless sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// Store backed by a single JSON object on disk
///
/// A missing file is an empty store. Every write rewrites the whole file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| {
            Error::Storage(format!(
                "Store file {} is not a JSON object of strings: {}",
                self.path.display(),
                e
            ))
        })
    }

    fn persist(&self, items: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(items)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    /// Current items for a read-modify-write, and whether the file was corrupt
    ///
    /// A corrupt document is dropped so the write replaces it.
    fn load_for_write(&self) -> Result<(BTreeMap<String, String>, bool)> {
        match self.load() {
            Ok(items) => Ok((items, false)),
            Err(Error::Storage(reason)) => {
                tracing::warn!("Replacing unreadable store file: {}", reason);
                Ok((BTreeMap::new(), true))
            }
            Err(e) => Err(e),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let (mut items, _) = self.load_for_write()?;
        items.insert(key.to_string(), value.to_string());
        self.persist(&items)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let (mut items, corrupt) = self.load_for_write()?;
        if items.remove(key).is_some() || corrupt {
            self.persist(&items)?;
        }
        Ok(())
    }
}

/// Wallet session persistence over an optional [`KeyValueStore`]
///
/// Without a store (no browser context) every write is a no-op and every
/// read returns `None`.
#[derive(Clone)]
pub struct WalletStorage {
    store: Option<Rc<dyn KeyValueStore>>,
    wallet_key: String,
    network_key: String,
}

impl WalletStorage {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self {
            store: Some(store),
            wallet_key: WALLET_STORAGE_KEY.to_string(),
            network_key: NETWORK_STORAGE_KEY.to_string(),
        }
    }

    /// Storage for an execution context without persistent storage
    pub fn unavailable() -> Self {
        Self {
            store: None,
            wallet_key: WALLET_STORAGE_KEY.to_string(),
            network_key: NETWORK_STORAGE_KEY.to_string(),
        }
    }

    pub fn from_config(store: Option<Rc<dyn KeyValueStore>>, config: &ConnectorConfig) -> Self {
        Self {
            store,
            wallet_key: config.wallet_storage_key.clone(),
            network_key: config.network_storage_key.clone(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.store.is_some()
    }

    /// Persist `data`, replacing whatever was stored before
    pub fn save_wallet_data(&self, data: &StoredWalletData) -> Result<()> {
        let Some(store) = &self.store else {
            tracing::debug!("No persistent storage, wallet data not saved");
            return Ok(());
        };
        let json = serde_json::to_string(data)?;
        store.set_item(&self.wallet_key, &json)
    }

    pub fn get_stored_wallet_data(&self) -> Option<StoredWalletData> {
        let raw = self.read_raw(&self.wallet_key)?;
        match serde_json::from_str(&raw) {
            Ok(data) => Some(data),
            Err(e) => {
                tracing::warn!(key = %self.wallet_key, "Ignoring malformed wallet data: {}", e);
                None
            }
        }
    }

    pub fn clear_wallet_data(&self) -> Result<()> {
        match &self.store {
            Some(store) => store.remove_item(&self.wallet_key),
            None => Ok(()),
        }
    }

    pub fn save_network_preference(&self, network: NetworkType) -> Result<()> {
        let Some(store) = &self.store else {
            return Ok(());
        };
        let json = serde_json::to_string(&network)?;
        store.set_item(&self.network_key, &json)
    }

    pub fn get_stored_network(&self) -> Option<NetworkType> {
        let raw = self.read_raw(&self.network_key)?;
        match serde_json::from_str(&raw) {
            Ok(network) => Some(network),
            Err(e) => {
                tracing::warn!(key = %self.network_key, "Ignoring malformed network preference: {}", e);
                None
            }
        }
    }

    pub fn clear_network_preference(&self) -> Result<()> {
        match &self.store {
            Some(store) => store.remove_item(&self.network_key),
            None => Ok(()),
        }
    }

    fn read_raw(&self, key: &str) -> Option<String> {
        let store = self.store.as_ref()?;
        match store.get_item(key) {
            Ok(Some(raw)) if !raw.is_empty() => Some(raw),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(key, "Storage read failed: {}", e);
                None
            }
        }
    }
}

impl std::fmt::Debug for WalletStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletStorage")
            .field("available", &self.is_available())
            .field("wallet_key", &self.wallet_key)
            .field("network_key", &self.network_key)
            .finish()
    }
}
