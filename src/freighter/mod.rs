//! Freighter wallet connector
//!
//! Connects to the extension, checks it is unlocked and on the expected
//! network, and forwards transaction envelopes to it for signing.

mod connector;
mod error;

pub use connector::FreighterConnector;
pub use error::{FreighterError, FREIGHTER_INSTALL_URL};
