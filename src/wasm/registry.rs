//! StandardRegistry: the app side of the Wallet Standard handshake
//!
//! Wallets announce themselves by dispatching
//! `wallet-standard:register-wallet` with a callback; apps announce
//! themselves with `wallet-standard:app-ready` carrying `{register}`.
//! Both directions feed one page-wide `MemoryRegistry`.

use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CustomEvent, CustomEventInit, Event};

use super::wallet::JsWallet;
use super::{get, js_error, js_message, object};
use crate::core::registry::MemoryRegistry;

const REGISTER_WALLET_EVENT: &str = "wallet-standard:register-wallet";
const APP_READY_EVENT: &str = "wallet-standard:app-ready";

thread_local! {
    static SHARED: RefCell<Option<MemoryRegistry>> = const { RefCell::new(None) };
}

pub struct StandardRegistry;

impl StandardRegistry {
    /// The page-wide registry, installing the window listeners on first use.
    pub fn shared() -> Result<MemoryRegistry, JsValue> {
        if let Some(registry) = SHARED.with(|shared| shared.borrow().clone()) {
            return Ok(registry);
        }
        let registry = MemoryRegistry::new();
        Self::install(&registry)?;
        SHARED.with(|shared| *shared.borrow_mut() = Some(registry.clone()));
        Ok(registry)
    }

    fn install(registry: &MemoryRegistry) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| js_error("no window"))?;
        let api: JsValue = object(&[("register", register_fn(registry.clone()))]).into();

        // Wallets loaded after us register through this listener.
        let listener_api = api.clone();
        let listener = Closure::wrap(Box::new(move |event: Event| {
            let callback = get(event.as_ref(), "detail");
            match callback.dyn_ref::<js_sys::Function>() {
                Some(callback) => {
                    if let Err(e) = callback.call1(&JsValue::NULL, &listener_api) {
                        tracing::warn!(error = %js_message(&e), "wallet registration callback failed");
                    }
                }
                None => tracing::debug!("register-wallet event without callback"),
            }
        }) as Box<dyn FnMut(Event)>);
        window.add_event_listener_with_callback(
            REGISTER_WALLET_EVENT,
            listener.as_ref().unchecked_ref(),
        )?;
        listener.forget();

        // Wallets loaded before us re-register when they see app-ready.
        let init = CustomEventInit::new();
        init.set_detail(&api);
        let ready = CustomEvent::new_with_event_init_dict(APP_READY_EVENT, &init)?;
        window.dispatch_event(&ready)?;
        tracing::debug!("wallet-standard app registry installed");
        Ok(())
    }
}

/// `register(wallet) -> unregister()`
fn register_fn(registry: MemoryRegistry) -> JsValue {
    Closure::wrap(Box::new(move |wallet: JsValue| -> JsValue {
        let handle = registry.register(Rc::new(JsWallet::new(wallet)));
        let handle = RefCell::new(Some(handle));
        Closure::wrap(Box::new(move || {
            if let Some(mut handle) = handle.borrow_mut().take() {
                handle.cancel();
            }
        }) as Box<dyn FnMut()>)
        .into_js_value()
    }) as Box<dyn FnMut(JsValue) -> JsValue>)
    .into_js_value()
}
