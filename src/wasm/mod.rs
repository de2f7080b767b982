//! WASM module: the widget in the browser
//!
//! Binds the platform-neutral core to browser primitives:
//! - Wallet Standard app registry (window events)
//! - Injected wallets driven through `js_sys::Reflect`
//! - localStorage for the preferred wallet
//! - DOM rendering and click handling
//! - `window[bridgeKey]` bridge object plus a change event
//!
//! Architecture:
//! ```text
//! ┌─────────────────────────────────────────┐
//! │      mount(target, config) (JS API)     │
//! │            WidgetHandle.unmount         │
//! └─────────────────┬───────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────┐
//! │          Connector (core)               │
//! │  selection state machine, signer        │
//! └──┬──────────┬──────────┬─────────────┬──┘
//!    │          │          │             │
//! Standard   JsWallet   LocalStorage  DomView / WindowBridge
//! Registry
//! ```

mod bridge;
mod dom;
mod registry;
mod storage;
mod wallet;
mod widget;

pub use bridge::WindowBridge;
pub use dom::{DomView, ROOT_CLASS};
pub use registry::StandardRegistry;
pub use storage::LocalStorage;
pub use wallet::JsWallet;
pub use widget::{mount, BrowserSpawner, WidgetHandle};

use js_sys::{Object, Reflect};
use std::time::Duration;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

/// Initialize WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("info"))
        .with_ansi(false)
        .without_time()
        .with_writer(MakeConsoleWriter)
        .try_init();
}

/// Log to browser console
pub fn console_log(s: &str) {
    web_sys::console::log_1(&JsValue::from_str(s));
}

macro_rules! log {
    ($($t:tt)*) => {
        crate::wasm::console_log(&format!($($t)*))
    }
}

pub(crate) use log;

/// Buffers one formatted tracing event and hands it to `console.log`.
struct ConsoleWriter {
    buf: Vec<u8>,
}

impl std::io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> std::io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.buf);
        let line = line.trim_end();
        if !line.is_empty() {
            console_log(line);
        }
    }
}

struct MakeConsoleWriter;

impl<'a> MakeWriter<'a> for MakeConsoleWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter { buf: Vec::new() }
    }
}

pub(crate) fn js_error(message: impl ToString) -> JsValue {
    JsValue::from_str(&message.to_string())
}

/// Best-effort message from a thrown JS value.
pub(crate) fn js_message(err: &JsValue) -> String {
    if let Some(s) = err.as_string() {
        return s;
    }
    if let Some(message) = get(err, "message").as_string() {
        return message;
    }
    format!("{:?}", err)
}

pub(crate) fn get(target: &JsValue, key: &str) -> JsValue {
    if !target.is_object() && !target.is_function() {
        return JsValue::UNDEFINED;
    }
    Reflect::get(target, &JsValue::from_str(key)).unwrap_or(JsValue::UNDEFINED)
}

pub(crate) fn object(entries: &[(&str, JsValue)]) -> Object {
    let obj = Object::new();
    for (key, value) in entries {
        let _ = Reflect::set(&obj, &JsValue::from_str(key), value);
    }
    obj
}

pub(crate) fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::new()
        .serialize_maps_as_objects(true)
        .serialize_missing_as_null(true);
    value.serialize(&serializer).map_err(js_error)
}

/// Call `target[method](...args)` and await the result if it is a promise.
pub(crate) async fn call_method(
    target: &JsValue,
    method: &str,
    args: &[JsValue],
) -> Result<JsValue, JsValue> {
    let function = get(target, method)
        .dyn_into::<js_sys::Function>()
        .map_err(|_| js_error(format!("{} is not a function", method)))?;
    let args: js_sys::Array = args.iter().collect();
    let result = function.apply(target, &args)?;
    resolve(result).await
}

/// Await `value` if it is a promise, otherwise return it as is.
pub(crate) async fn resolve(value: JsValue) -> Result<JsValue, JsValue> {
    match value.dyn_into::<js_sys::Promise>() {
        Ok(promise) => JsFuture::from(promise).await,
        Err(value) => Ok(value),
    }
}

pub(crate) async fn sleep(duration: Duration) {
    let ms = duration.as_millis().min(i32::MAX as u128) as i32;
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let scheduled = web_sys::window()
            .map(|window| {
                window
                    .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
                    .is_ok()
            })
            .unwrap_or(false);
        if !scheduled {
            let _ = resolve.call0(&JsValue::NULL);
        }
    });
    let _ = JsFuture::from(promise).await;
}
