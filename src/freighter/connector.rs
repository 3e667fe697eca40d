//! Freighter connector
//!
//! Checks run strictly in order: extension present, wallet unlocked, public
//! key available, network matches. Each step relies on the state confirmed by
//! the one before it, so they are never reordered or run concurrently.

use std::rc::Rc;
use std::time::Duration;

use super::FreighterError;
use crate::config::ConnectorConfig;
use crate::network::NetworkType;
use crate::wallet::{
    is_extension_installed, poll_for_extension, ExtensionError, ExtensionHost, FreighterApi,
    SignOptions, Sleeper, DEFAULT_DETECT_TIMEOUT, POLL_INTERVAL,
};

/// Connects the application to the Freighter extension found in a host
#[derive(Clone)]
pub struct FreighterConnector {
    host: Rc<dyn ExtensionHost>,
    sleeper: Rc<dyn Sleeper>,
    detect_timeout: Duration,
    poll_interval: Duration,
}

impl FreighterConnector {
    pub fn new(host: Rc<dyn ExtensionHost>, sleeper: Rc<dyn Sleeper>) -> Self {
        Self {
            host,
            sleeper,
            detect_timeout: DEFAULT_DETECT_TIMEOUT,
            poll_interval: POLL_INTERVAL,
        }
    }

    pub fn with_config(
        host: Rc<dyn ExtensionHost>,
        sleeper: Rc<dyn Sleeper>,
        config: &ConnectorConfig,
    ) -> Self {
        Self {
            host,
            sleeper,
            detect_timeout: config.detect_timeout(),
            poll_interval: config.poll_interval(),
        }
    }

    pub fn with_detect_timeout(mut self, timeout: Duration) -> Self {
        self.detect_timeout = timeout;
        self
    }

    pub fn is_installed(&self) -> bool {
        is_extension_installed(self.host.as_ref())
    }

    /// Connect to the wallet and return its public key
    ///
    /// Waits for the extension to register, then requires the wallet to be
    /// unlocked, to have a public key, and to be on `network`.
    pub async fn connect(&self, network: NetworkType) -> Result<String, FreighterError> {
        let available = poll_for_extension(
            self.host.as_ref(),
            self.sleeper.as_ref(),
            self.detect_timeout,
            self.poll_interval,
        )
        .await;

        let Some(freighter) = available.then(|| self.host.freighter()).flatten() else {
            tracing::warn!("Freighter extension not found");
            return Err(FreighterError::NotInstalled);
        };

        let public_key = Self::verify(freighter.as_ref(), network).await?;
        tracing::info!(network = %network, "Connected to Freighter");
        Ok(public_key)
    }

    async fn verify(
        freighter: &dyn FreighterApi,
        network: NetworkType,
    ) -> Result<String, FreighterError> {
        let connected = freighter
            .is_connected()
            .await
            .map_err(connection_failed)?;
        if !connected {
            return Err(FreighterError::Locked);
        }

        let public_key = freighter
            .get_public_key()
            .await
            .map_err(connection_failed)?;
        if public_key.is_empty() {
            return Err(FreighterError::NoPublicKey);
        }

        let actual = freighter.get_network().await.map_err(connection_failed)?;
        if actual != network.extension_token() {
            tracing::debug!(expected = %network, actual = %actual, "Freighter network mismatch");
            return Err(FreighterError::NetworkMismatch {
                expected: network,
                actual,
            });
        }

        Ok(public_key)
    }

    /// Ask the wallet to sign a transaction envelope for `network`
    ///
    /// The envelope is passed through untouched, and so is the signed
    /// envelope the wallet returns.
    pub async fn sign_transaction(
        &self,
        xdr: &str,
        network: NetworkType,
    ) -> Result<String, FreighterError> {
        let freighter = self.host.freighter().ok_or(FreighterError::NotAvailable)?;

        let opts = SignOptions {
            network: network.extension_token().to_string(),
            network_passphrase: network.passphrase().to_string(),
        };

        let signed = freighter
            .sign_transaction(xdr, &opts)
            .await
            .map_err(|e| FreighterError::SigningFailed(e.message().map(str::to_string)))?;

        tracing::info!(network = %network, "Transaction signed by Freighter");
        Ok(signed)
    }

    /// Whether the wallet is currently on `expected`; `false` on any failure
    pub async fn is_network_active(&self, expected: NetworkType) -> bool {
        let Some(freighter) = self.host.freighter() else {
            return false;
        };

        match freighter.get_network().await {
            Ok(token) => token == expected.extension_token(),
            Err(e) => {
                tracing::debug!("Freighter network check failed: {}", e);
                false
            }
        }
    }
}

fn connection_failed(error: ExtensionError) -> FreighterError {
    FreighterError::ConnectionFailed(error.message().map(str::to_string))
}

impl std::fmt::Debug for FreighterConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FreighterConnector")
            .field("installed", &self.is_installed())
            .field("detect_timeout", &self.detect_timeout)
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{InstantSleeper, MockFreighter, StaticHost, TEST_PUBLIC_KEY, TEST_XDR};

    fn connector_for(freighter: Rc<MockFreighter>) -> FreighterConnector {
        FreighterConnector::new(
            Rc::new(StaticHost::with(freighter)),
            Rc::new(InstantSleeper),
        )
    }

    fn connector_without_extension() -> FreighterConnector {
        FreighterConnector::new(Rc::new(StaticHost::empty()), Rc::new(InstantSleeper))
    }

    #[tokio::test]
    async fn test_connect_returns_public_key() {
        let freighter = Rc::new(MockFreighter::unlocked("PUBLIC"));
        let connector = connector_for(freighter.clone());

        let key = connector.connect(NetworkType::Mainnet).await.unwrap();

        assert_eq!(key, TEST_PUBLIC_KEY);
        assert_eq!(freighter.calls(), vec!["isConnected", "getPublicKey", "getNetwork"]);
    }

    #[tokio::test]
    async fn test_connect_without_extension() {
        let err = connector_without_extension()
            .connect(NetworkType::Testnet)
            .await
            .unwrap_err();
        assert_eq!(err, FreighterError::NotInstalled);
    }

    #[tokio::test]
    async fn test_connect_locked_wallet_stops_before_public_key() {
        let freighter = Rc::new(MockFreighter {
            connected: Ok(false),
            ..MockFreighter::unlocked("TESTNET")
        });
        let connector = connector_for(freighter.clone());

        let err = connector.connect(NetworkType::Testnet).await.unwrap_err();

        assert_eq!(err, FreighterError::Locked);
        assert_eq!(freighter.calls(), vec!["isConnected"]);
    }

    #[tokio::test]
    async fn test_connect_empty_public_key() {
        let freighter = Rc::new(MockFreighter {
            public_key: Ok(String::new()),
            ..MockFreighter::unlocked("TESTNET")
        });
        let connector = connector_for(freighter.clone());

        let err = connector.connect(NetworkType::Testnet).await.unwrap_err();

        assert_eq!(err, FreighterError::NoPublicKey);
        assert_eq!(freighter.calls(), vec!["isConnected", "getPublicKey"]);
    }

    #[tokio::test]
    async fn test_connect_network_mismatch_names_both_networks() {
        let connector = connector_for(Rc::new(MockFreighter::unlocked("TESTNET")));

        let err = connector.connect(NetworkType::Mainnet).await.unwrap_err();

        assert_eq!(
            err,
            FreighterError::NetworkMismatch {
                expected: NetworkType::Mainnet,
                actual: "TESTNET".to_string(),
            }
        );
        let message = err.to_string();
        assert!(message.contains("MAINNET"), "{message}");
        assert!(message.contains("TESTNET"), "{message}");
    }

    #[tokio::test]
    async fn test_connect_unrecognised_network_token_is_a_mismatch() {
        let connector = connector_for(Rc::new(MockFreighter::unlocked("undefined")));

        let err = connector.connect(NetworkType::Testnet).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "Please switch Freighter to TESTNET network. Current network: undefined"
        );
    }

    #[tokio::test]
    async fn test_connect_wraps_extension_failures() {
        let freighter = Rc::new(MockFreighter {
            public_key: Err(ExtensionError::failed("Extension context invalidated")),
            ..MockFreighter::unlocked("TESTNET")
        });
        let err = connector_for(freighter)
            .connect(NetworkType::Testnet)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            FreighterError::ConnectionFailed(Some("Extension context invalidated".to_string()))
        );
        assert_eq!(
            err.to_string(),
            "Freighter connection failed: Extension context invalidated"
        );

        let freighter = Rc::new(MockFreighter {
            network: Err(ExtensionError::Unknown),
            ..MockFreighter::unlocked("TESTNET")
        });
        let err = connector_for(freighter)
            .connect(NetworkType::Testnet)
            .await
            .unwrap_err();
        assert_eq!(err, FreighterError::ConnectionFailed(None));
    }

    #[tokio::test]
    async fn test_sign_transaction_passes_token_and_passphrase() {
        let freighter = Rc::new(MockFreighter::unlocked("PUBLIC"));
        let connector = connector_for(freighter.clone());

        let signed = connector
            .sign_transaction(TEST_XDR, NetworkType::Mainnet)
            .await
            .unwrap();

        assert_eq!(signed, format!("{}-signed", TEST_XDR));
        let requests = freighter.sign_requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, TEST_XDR);
        assert_eq!(
            requests[0].1,
            SignOptions {
                network: "PUBLIC".to_string(),
                network_passphrase: "Public Global Stellar Network ; September 2015".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_sign_transaction_testnet_options() {
        let freighter = Rc::new(MockFreighter::unlocked("TESTNET"));
        connector_for(freighter.clone())
            .sign_transaction(TEST_XDR, NetworkType::Testnet)
            .await
            .unwrap();

        let requests = freighter.sign_requests.borrow();
        assert_eq!(requests[0].1.network, "TESTNET");
        assert_eq!(
            requests[0].1.network_passphrase,
            "Test SDF Network ; September 2015"
        );
    }

    #[tokio::test]
    async fn test_sign_transaction_without_extension() {
        let err = connector_without_extension()
            .sign_transaction(TEST_XDR, NetworkType::Testnet)
            .await
            .unwrap_err();
        assert_eq!(err, FreighterError::NotAvailable);
    }

    #[tokio::test]
    async fn test_sign_transaction_failures() {
        let freighter = Rc::new(MockFreighter {
            signed: Err(ExtensionError::failed("User declined access")),
            ..MockFreighter::unlocked("TESTNET")
        });
        let err = connector_for(freighter)
            .sign_transaction(TEST_XDR, NetworkType::Testnet)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Transaction signing failed: User declined access"
        );

        let freighter = Rc::new(MockFreighter {
            signed: Err(ExtensionError::Unknown),
            ..MockFreighter::unlocked("TESTNET")
        });
        let err = connector_for(freighter)
            .sign_transaction(TEST_XDR, NetworkType::Testnet)
            .await
            .unwrap_err();
        assert_eq!(err, FreighterError::SigningFailed(None));
        assert_eq!(err.to_string(), "Failed to sign transaction");
    }

    #[tokio::test]
    async fn test_is_network_active() {
        let connector = connector_for(Rc::new(MockFreighter::unlocked("PUBLIC")));
        assert!(connector.is_network_active(NetworkType::Mainnet).await);
        assert!(!connector.is_network_active(NetworkType::Testnet).await);

        assert!(
            !connector_without_extension()
                .is_network_active(NetworkType::Testnet)
                .await
        );
    }

    #[tokio::test]
    async fn test_is_network_active_swallows_failures() {
        let freighter = Rc::new(MockFreighter {
            network: Err(ExtensionError::failed("boom")),
            ..MockFreighter::unlocked("TESTNET")
        });
        assert!(
            !connector_for(freighter)
                .is_network_active(NetworkType::Testnet)
                .await
        );
    }

    #[tokio::test]
    async fn test_detect_timeout_override_bounds_lookups() {
        let host = Rc::new(StaticHost::empty());
        let connector = FreighterConnector::new(host.clone(), Rc::new(InstantSleeper))
            .with_detect_timeout(Duration::from_millis(500));

        let err = connector.connect(NetworkType::Testnet).await.unwrap_err();

        assert_eq!(err, FreighterError::NotInstalled);
        // Initial check plus 500ms / 100ms polls
        assert_eq!(host.lookups.get(), 6);
    }

    #[tokio::test]
    async fn test_config_timeout_applies() {
        let config = ConnectorConfig {
            detect_timeout_ms: 0,
            ..ConnectorConfig::default()
        };
        let host = Rc::new(StaticHost::empty());
        let connector =
            FreighterConnector::with_config(host.clone(), Rc::new(InstantSleeper), &config);

        let err = connector.connect(NetworkType::Testnet).await.unwrap_err();

        assert_eq!(err, FreighterError::NotInstalled);
        // Initial check plus the single budgeted poll
        assert_eq!(host.lookups.get(), 2);
    }
}
