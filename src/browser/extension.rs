//! `window.freighter`

use async_trait::async_trait;
use js_sys::{Array, Function, Object, Promise, Reflect};
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::wallet::{ExtensionError, ExtensionHost, FreighterApi, SignOptions};

/// Name of the global the extension registers on `window`
pub const FREIGHTER_GLOBAL: &str = "freighter";

/// Looks the extension up on `window` each time it is asked
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowHost;

impl ExtensionHost for WindowHost {
    fn freighter(&self) -> Option<Rc<dyn FreighterApi>> {
        let window = web_sys::window()?;
        let value = Reflect::get(&window, &JsValue::from_str(FREIGHTER_GLOBAL)).ok()?;
        if value.is_undefined() || value.is_null() {
            return None;
        }
        let object = value.dyn_into::<Object>().ok()?;
        Some(Rc::new(InjectedFreighter::new(object)))
    }
}

/// The object Freighter injected into the page
pub struct InjectedFreighter {
    object: Object,
}

impl InjectedFreighter {
    pub fn new(object: Object) -> Self {
        Self { object }
    }

    /// Call `method` on the injected object, awaiting it if it returns a promise
    async fn call(&self, method: &str, args: &[JsValue]) -> Result<JsValue, ExtensionError> {
        let function = Reflect::get(&self.object, &JsValue::from_str(method))
            .map_err(extension_error)?
            .dyn_into::<Function>()
            .map_err(|_| ExtensionError::failed(format!("freighter.{} is not a function", method)))?;

        let result = function
            .apply(&self.object, &args.iter().collect::<Array>())
            .map_err(extension_error)?;

        match result.dyn_into::<Promise>() {
            Ok(promise) => JsFuture::from(promise).await.map_err(extension_error),
            Err(value) => Ok(value),
        }
    }
}

/// Thrown `Error`s keep their message; anything else thrown has none
fn extension_error(value: JsValue) -> ExtensionError {
    match value.dyn_into::<js_sys::Error>() {
        Ok(error) => ExtensionError::Failed(String::from(error.message())),
        Err(_) => ExtensionError::Unknown,
    }
}

fn expect_string(method: &str, value: JsValue) -> Result<String, ExtensionError> {
    value
        .as_string()
        .ok_or_else(|| ExtensionError::failed(format!("freighter.{} returned a non-string value", method)))
}

/// Network token as the page would print it, for values that aren't strings
///
/// A non-string never equals a known token, so the connector reports a
/// network mismatch naming what the extension actually returned.
fn reported_token(value: JsValue) -> String {
    if let Some(token) = value.as_string() {
        return token;
    }
    if value.is_undefined() {
        return "undefined".to_string();
    }
    if value.is_null() {
        return "null".to_string();
    }
    js_sys::JSON::stringify(&value)
        .map(String::from)
        .unwrap_or_else(|_| "unknown".to_string())
}

fn sign_options_object(opts: &SignOptions) -> Result<Object, ExtensionError> {
    let object = Object::new();
    Reflect::set(
        &object,
        &JsValue::from_str("network"),
        &JsValue::from_str(&opts.network),
    )
    .map_err(extension_error)?;
    Reflect::set(
        &object,
        &JsValue::from_str("networkPassphrase"),
        &JsValue::from_str(&opts.network_passphrase),
    )
    .map_err(extension_error)?;
    Ok(object)
}

#[async_trait(?Send)]
impl FreighterApi for InjectedFreighter {
    async fn is_connected(&self) -> Result<bool, ExtensionError> {
        Ok(self.call("isConnected", &[]).await?.is_truthy())
    }

    async fn get_public_key(&self) -> Result<String, ExtensionError> {
        // Anything but a string counts as "no key"
        Ok(self
            .call("getPublicKey", &[])
            .await?
            .as_string()
            .unwrap_or_default())
    }

    async fn get_network(&self) -> Result<String, ExtensionError> {
        Ok(reported_token(self.call("getNetwork", &[]).await?))
    }

    async fn sign_transaction(
        &self,
        xdr: &str,
        opts: &SignOptions,
    ) -> Result<String, ExtensionError> {
        let opts = sign_options_object(opts)?;
        let value = self
            .call("signTransaction", &[JsValue::from_str(xdr), opts.into()])
            .await?;
        expect_string("signTransaction", value)
    }
}
