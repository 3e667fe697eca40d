//! Errors surfaced by the Freighter connector
//!
//! Each variant is terminal; nothing is retried internally. Callers match on
//! the variant to tell "install / unlock / switch network" apart from an
//! opaque failure.

use thiserror::Error;

use crate::network::NetworkType;

/// Where users can install the extension
pub const FREIGHTER_INSTALL_URL: &str = "https://www.freighter.app/";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FreighterError {
    #[error("Freighter wallet is not installed. Please install it from {}", FREIGHTER_INSTALL_URL)]
    NotInstalled,

    #[error("Please unlock your Freighter wallet and try again")]
    Locked,

    #[error("Failed to retrieve public key from Freighter")]
    NoPublicKey,

    #[error("Please switch Freighter to {expected} network. Current network: {actual}")]
    NetworkMismatch {
        expected: NetworkType,
        /// Token as reported by the extension
        actual: String,
    },

    #[error("{}", connection_failed_message(.0.as_deref()))]
    ConnectionFailed(Option<String>),

    #[error("Freighter wallet is not available")]
    NotAvailable,

    #[error("{}", signing_failed_message(.0.as_deref()))]
    SigningFailed(Option<String>),
}

fn connection_failed_message(cause: Option<&str>) -> String {
    match cause {
        Some(cause) => format!("Freighter connection failed: {}", cause),
        None => "An unknown error occurred while connecting to Freighter".to_string(),
    }
}

fn signing_failed_message(cause: Option<&str>) -> String {
    match cause {
        Some(cause) => format!("Transaction signing failed: {}", cause),
        None => "Failed to sign transaction".to_string(),
    }
}

impl FreighterError {
    /// Whether the user can fix this themselves (install, unlock, switch network)
    pub fn is_user_actionable(&self) -> bool {
        matches!(
            self,
            Self::NotInstalled | Self::Locked | Self::NetworkMismatch { .. } | Self::NotAvailable
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            FreighterError::NotInstalled.to_string(),
            "Freighter wallet is not installed. Please install it from https://www.freighter.app/"
        );
        assert_eq!(
            FreighterError::NetworkMismatch {
                expected: NetworkType::Mainnet,
                actual: "TESTNET".to_string(),
            }
            .to_string(),
            "Please switch Freighter to MAINNET network. Current network: TESTNET"
        );
    }

    #[test]
    fn test_wrapped_messages() {
        assert_eq!(
            FreighterError::ConnectionFailed(Some("port closed".to_string())).to_string(),
            "Freighter connection failed: port closed"
        );
        assert_eq!(
            FreighterError::ConnectionFailed(None).to_string(),
            "An unknown error occurred while connecting to Freighter"
        );
        assert_eq!(
            FreighterError::SigningFailed(Some("User declined".to_string())).to_string(),
            "Transaction signing failed: User declined"
        );
        assert_eq!(
            FreighterError::SigningFailed(None).to_string(),
            "Failed to sign transaction"
        );
    }

    #[test]
    fn test_user_actionable() {
        assert!(FreighterError::Locked.is_user_actionable());
        assert!(!FreighterError::NoPublicKey.is_user_actionable());
        assert!(!FreighterError::ConnectionFailed(None).is_user_actionable());
    }
}
