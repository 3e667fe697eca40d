//! Contract of the Freighter browser extension
//!
//! Freighter injects an object into the page exposing an async wallet API.
//! This crate only consumes that API, through [`FreighterApi`], and only
//! finds it through an [`ExtensionHost`], so both can be replaced by test
//! doubles.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use thiserror::Error;

/// Failure reported by the extension itself
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtensionError {
    /// The call failed with a message
    #[error("{0}")]
    Failed(String),

    /// The call failed with something that carried no message
    #[error("unknown extension error")]
    Unknown,
}

impl ExtensionError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    /// Underlying message, when there is one
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            Self::Unknown => None,
        }
    }
}

/// Options passed alongside an envelope to `signTransaction`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignOptions {
    /// Extension-level network token (`PUBLIC` / `TESTNET`)
    pub network: String,
    pub network_passphrase: String,
}

/// Wallet operations exposed by the injected extension object
///
/// Futures are not `Send`: the extension lives on the page's single thread.
#[async_trait(?Send)]
pub trait FreighterApi {
    /// Whether the wallet is connected and unlocked
    async fn is_connected(&self) -> Result<bool, ExtensionError>;

    /// Public key of the active account, possibly empty
    async fn get_public_key(&self) -> Result<String, ExtensionError>;

    /// Network token the wallet is currently set to
    async fn get_network(&self) -> Result<String, ExtensionError>;

    /// Sign a base64 XDR transaction envelope, returning the signed envelope
    async fn sign_transaction(
        &self,
        xdr: &str,
        opts: &SignOptions,
    ) -> Result<String, ExtensionError>;
}

/// Execution context the extension registers itself into
pub trait ExtensionHost {
    /// The injected extension object, if it has been registered
    fn freighter(&self) -> Option<Rc<dyn FreighterApi>>;
}

/// Host for contexts where no extension can ever appear (CLI, server side)
#[derive(Debug, Default, Clone, Copy)]
pub struct NoExtension;

impl ExtensionHost for NoExtension {
    fn freighter(&self) -> Option<Rc<dyn FreighterApi>> {
        None
    }
}
