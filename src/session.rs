//! Wallet session lifecycle
//!
//! A session record is written on every successful connect (replacing the
//! previous one) and removed on disconnect. It never expires on its own.

use crate::freighter::FreighterConnector;
use crate::network::NetworkType;
use crate::wallet::{StoredWalletData, WalletStorage, WalletType};
use crate::Result;

/// Connector plus the storage that remembers what it connected to
#[derive(Debug, Clone)]
pub struct WalletSession {
    connector: FreighterConnector,
    storage: WalletStorage,
}

impl WalletSession {
    pub fn new(connector: FreighterConnector, storage: WalletStorage) -> Self {
        Self { connector, storage }
    }

    pub fn connector(&self) -> &FreighterConnector {
        &self.connector
    }

    pub fn storage(&self) -> &WalletStorage {
        &self.storage
    }

    /// Connect on `network` and remember the resulting wallet
    pub async fn connect(&self, network: NetworkType) -> Result<StoredWalletData> {
        let public_key = self.connector.connect(network).await?;

        let data = StoredWalletData {
            wallet_type: WalletType::Freighter,
            public_key,
            network,
        };
        self.storage.save_wallet_data(&data)?;
        self.storage.save_network_preference(network)?;
        Ok(data)
    }

    /// The remembered wallet, if any
    pub fn restore(&self) -> Option<StoredWalletData> {
        self.storage.get_stored_wallet_data()
    }

    /// The remembered wallet, only if the extension is still on its network
    pub async fn restore_active(&self) -> Option<StoredWalletData> {
        let data = self.restore()?;
        if self.connector.is_network_active(data.network).await {
            Some(data)
        } else {
            tracing::info!(network = %data.network, "Stored session is not on the active network");
            None
        }
    }

    /// Network to offer on the next connect: last used, else `fallback`
    pub fn preferred_network(&self, fallback: NetworkType) -> NetworkType {
        self.storage.get_stored_network().unwrap_or(fallback)
    }

    pub async fn sign_transaction(&self, xdr: &str, network: NetworkType) -> Result<String> {
        Ok(self.connector.sign_transaction(xdr, network).await?)
    }

    /// Forget the connected wallet; the network preference is kept
    pub fn disconnect(&self) -> Result<()> {
        self.storage.clear_wallet_data()
    }
}
