//! Test doubles for the extension and its host

use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use crate::wallet::{ExtensionError, ExtensionHost, FreighterApi, SignOptions, Sleeper};

pub const TEST_PUBLIC_KEY: &str = "GCFXHS4GXL6BVUCXBWXGTITROWLVYXQKQLF4YH5O5JT3YZXCYPAFBJZB";
pub const TEST_XDR: &str = "AAAAAgAAAADtest-envelope";

/// Scripted extension that records every call it receives
pub struct MockFreighter {
    pub connected: Result<bool, ExtensionError>,
    pub public_key: Result<String, ExtensionError>,
    pub network: Result<String, ExtensionError>,
    pub signed: Result<String, ExtensionError>,
    pub calls: RefCell<Vec<&'static str>>,
    pub sign_requests: RefCell<Vec<(String, SignOptions)>>,
}

impl MockFreighter {
    /// Unlocked wallet on `network_token` that signs by appending `-signed`
    pub fn unlocked(network_token: &str) -> Self {
        Self {
            connected: Ok(true),
            public_key: Ok(TEST_PUBLIC_KEY.to_string()),
            network: Ok(network_token.to_string()),
            signed: Ok(format!("{}-signed", TEST_XDR)),
            calls: RefCell::new(Vec::new()),
            sign_requests: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.borrow_mut().push(call);
    }
}

#[async_trait(?Send)]
impl FreighterApi for MockFreighter {
    async fn is_connected(&self) -> Result<bool, ExtensionError> {
        self.record("isConnected");
        self.connected.clone()
    }

    async fn get_public_key(&self) -> Result<String, ExtensionError> {
        self.record("getPublicKey");
        self.public_key.clone()
    }

    async fn get_network(&self) -> Result<String, ExtensionError> {
        self.record("getNetwork");
        self.network.clone()
    }

    async fn sign_transaction(
        &self,
        xdr: &str,
        opts: &SignOptions,
    ) -> Result<String, ExtensionError> {
        self.record("signTransaction");
        self.sign_requests
            .borrow_mut()
            .push((xdr.to_string(), opts.clone()));
        self.signed.clone()
    }
}

/// Host that either always or never has the extension registered
pub struct StaticHost {
    freighter: Option<Rc<MockFreighter>>,
    pub lookups: Cell<u32>,
}

impl StaticHost {
    pub fn with(freighter: Rc<MockFreighter>) -> Self {
        Self {
            freighter: Some(freighter),
            lookups: Cell::new(0),
        }
    }

    pub fn empty() -> Self {
        Self {
            freighter: None,
            lookups: Cell::new(0),
        }
    }
}

impl ExtensionHost for StaticHost {
    fn freighter(&self) -> Option<Rc<dyn FreighterApi>> {
        self.lookups.set(self.lookups.get() + 1);
        self.freighter
            .clone()
            .map(|freighter| freighter as Rc<dyn FreighterApi>)
    }
}

/// Sleeper that never waits
pub struct InstantSleeper;

#[async_trait(?Send)]
impl Sleeper for InstantSleeper {
    async fn sleep(&self, _duration: Duration) {}
}
