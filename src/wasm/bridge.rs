//! WindowBridge: publishes the connection on `window[bridgeKey]`
//!
//! ```javascript
//! window.addEventListener('sui-connect:change', () => {
//!   const { status, account, signAndExecute } = window.suiConnect;
//!   if (status === 'connected') await signAndExecute({ transaction: tx });
//! });
//! ```

use js_sys::{Promise, Reflect};
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::{CustomEvent, CustomEventInit};

use super::{call_method, get, js_error, js_message, object, to_js};
use crate::core::bridge::{Bridge, BridgeState, DisconnectHandle};
use crate::core::signer::{SignRequest, Signer};
use crate::core::transaction::Transaction;

pub const CHANGE_EVENT: &str = "sui-connect:change";

pub struct WindowBridge {
    key: String,
}

impl WindowBridge {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn build(&self, state: &BridgeState) -> Result<JsValue, JsValue> {
        let snapshot = state.snapshot();
        let disconnect = state
            .disconnect
            .clone()
            .map(disconnect_fn)
            .unwrap_or(JsValue::NULL);
        let sign = state.signer.clone().map(sign_fn).unwrap_or(JsValue::NULL);
        Ok(object(&[
            ("status", JsValue::from_str(snapshot.status.as_str())),
            ("wallet", to_js(&snapshot.wallet)?),
            ("account", to_js(&snapshot.account)?),
            ("disconnect", disconnect),
            ("signAndExecute", sign),
        ])
        .into())
    }

    fn try_publish(&self, state: &BridgeState) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| js_error("no window"))?;
        let value = self.build(state)?;
        Reflect::set(&window, &JsValue::from_str(&self.key), &value)?;

        let init = CustomEventInit::new();
        init.set_detail(&value);
        let event = CustomEvent::new_with_event_init_dict(CHANGE_EVENT, &init)?;
        window.dispatch_event(&event)?;
        Ok(())
    }
}

impl Bridge for WindowBridge {
    fn publish(&self, state: &BridgeState) {
        if let Err(e) = self.try_publish(state) {
            tracing::warn!(key = %self.key, error = %js_message(&e), "bridge publish failed");
        }
    }
}

fn disconnect_fn(handle: DisconnectHandle) -> JsValue {
    Closure::wrap(Box::new(move || -> Promise {
        let handle = handle.clone();
        future_to_promise(async move {
            handle.disconnect().await;
            Ok(JsValue::UNDEFINED)
        })
    }) as Box<dyn Fn() -> Promise>)
    .into_js_value()
}

/// `signAndExecute({transaction, chain?}) -> Promise<response>`; rejects
/// with the error message on failure.
fn sign_fn(signer: Signer) -> JsValue {
    Closure::wrap(Box::new(move |input: JsValue| -> Promise {
        let signer = signer.clone();
        future_to_promise(async move {
            let request = sign_request(&input).await?;
            let response = signer.sign_and_execute(request).await.map_err(js_error)?;
            to_js(&response)
        })
    }) as Box<dyn Fn(JsValue) -> Promise>)
    .into_js_value()
}

/// Accepts a `Transaction` (anything with `toJSON()`), a JSON string, or a
/// plain object for `transaction`.
async fn sign_request(input: &JsValue) -> Result<SignRequest, JsValue> {
    let tx = get(input, "transaction");
    let transaction = if let Some(raw) = tx.as_string() {
        Transaction::parse(&raw)
    } else if get(&tx, "toJSON").is_function() {
        let json = call_method(&tx, "toJSON", &[]).await?;
        match json.as_string() {
            Some(raw) => Transaction::parse(&raw),
            None => Transaction::from_json(serde_wasm_bindgen::from_value::<Value>(json).map_err(js_error)?),
        }
    } else if tx.is_object() {
        Transaction::from_json(serde_wasm_bindgen::from_value::<Value>(tx).map_err(js_error)?)
    } else {
        return Err(js_error("signAndExecute requires a transaction"));
    };

    let mut request = SignRequest::new(transaction);
    if let Some(chain) = get(input, "chain").as_string() {
        request = request.with_chain(chain);
    }
    Ok(request)
}
