//! Browser bindings
//!
//! Wires the connector to the real page: `window.freighter` as the extension,
//! `window.localStorage` as the session store, and `setTimeout` for polling.

mod extension;

pub use extension::{InjectedFreighter, WindowHost, FREIGHTER_GLOBAL};

use async_trait::async_trait;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::JsValue;

use crate::config::ConnectorConfig;
use crate::freighter::FreighterConnector;
use crate::session::WalletSession;
use crate::wallet::{KeyValueStore, Sleeper, WalletStorage};
use crate::{Error, Result};

/// `window.localStorage`
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// `None` outside a window, or when the page is denied storage access
    pub fn from_window() -> Option<Self> {
        let window = web_sys::window()?;
        let storage = window.local_storage().ok()??;
        Some(Self { storage })
    }
}

impl KeyValueStore for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| storage_error("read", &e))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| storage_error("write", &e))
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| storage_error("remove", &e))
    }
}

fn storage_error(action: &str, error: &JsValue) -> Error {
    Error::Storage(format!("localStorage {} failed: {:?}", action, error))
}

/// [`Sleeper`] backed by `setTimeout`
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserSleeper;

#[async_trait(?Send)]
impl Sleeper for BrowserSleeper {
    async fn sleep(&self, duration: Duration) {
        gloo_timers::future::sleep(duration).await;
    }
}

/// Session storage for the current page, unavailable outside a window
pub fn browser_storage(config: &ConnectorConfig) -> WalletStorage {
    let store = LocalStorage::from_window().map(|store| Rc::new(store) as Rc<dyn KeyValueStore>);
    if store.is_none() {
        tracing::debug!("localStorage unavailable, wallet session will not persist");
    }
    WalletStorage::from_config(store, config)
}

pub fn browser_connector(config: &ConnectorConfig) -> FreighterConnector {
    FreighterConnector::with_config(Rc::new(WindowHost), Rc::new(BrowserSleeper), config)
}

pub fn browser_session(config: &ConnectorConfig) -> WalletSession {
    WalletSession::new(browser_connector(config), browser_storage(config))
}
