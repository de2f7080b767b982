//! mount/unmount: the JS entry point
//!
//! ```javascript
//! import init, { mount } from 'sui-connect';
//! await init();
//! const widget = mount('wallet', { network: 'testnet' });
//! // later
//! widget.unmount();
//! ```

use futures::future::LocalBoxFuture;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Element;

use super::bridge::WindowBridge;
use super::dom::{DomListeners, DomView};
use super::registry::StandardRegistry;
use super::storage::LocalStorage;
use super::{js_error, log};
use crate::config::WidgetConfig;
use crate::core::connector::{Connector, Services, Spawn};
use crate::rpc::RpcClient;

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserSpawner;

impl Spawn for BrowserSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }
}

#[derive(Clone)]
struct Mounted {
    container: Element,
    connector: Connector,
    listeners: Rc<RefCell<Option<DomListeners>>>,
}

thread_local! {
    static MOUNTED: RefCell<Vec<Mounted>> = const { RefCell::new(Vec::new()) };
}

fn find_mounted(container: &Element) -> Option<Mounted> {
    MOUNTED.with(|mounted| {
        mounted
            .borrow()
            .iter()
            .find(|m| m.container.is_same_node(Some(container)))
            .cloned()
    })
}

fn resolve_container(target: &JsValue) -> Result<Element, JsValue> {
    if let Some(id) = target.as_string() {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| js_error("no document"))?;
        return document
            .get_element_by_id(&id)
            .ok_or_else(|| js_error(format!("no element with id '{}'", id)));
    }
    target
        .clone()
        .dyn_into::<Element>()
        .map_err(|_| js_error("mount target must be an element id or an Element"))
}

/// Handle returned by `mount`.
#[wasm_bindgen]
pub struct WidgetHandle {
    mounted: Mounted,
}

#[wasm_bindgen]
impl WidgetHandle {
    /// Detach registry, wallet and click listeners. The markup stays.
    #[wasm_bindgen]
    pub fn unmount(&self) {
        let Some(listeners) = self.mounted.listeners.borrow_mut().take() else {
            return;
        };
        listeners.detach();
        self.mounted.connector.stop();
        let container = self.mounted.container.clone();
        MOUNTED.with(|mounted| {
            mounted
                .borrow_mut()
                .retain(|m| !m.container.is_same_node(Some(&container)))
        });
        log!("[sui-connect] unmounted");
    }

    /// `connected` | `connecting` | `disconnected`
    #[wasm_bindgen(getter)]
    pub fn status(&self) -> String {
        self.mounted.connector.status().as_str().to_string()
    }
}

/// Mount the widget into `target` (element id or Element). Mounting the
/// same container twice returns the existing widget.
#[wasm_bindgen]
pub fn mount(target: JsValue, config: JsValue) -> Result<WidgetHandle, JsValue> {
    let container = resolve_container(&target)?;
    if let Some(mounted) = find_mounted(&container) {
        return Ok(WidgetHandle { mounted });
    }

    let config: WidgetConfig = if config.is_undefined() || config.is_null() {
        WidgetConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config).map_err(js_error)?
    };
    log!("[sui-connect] mounting on {}", config.network.chain());

    let view = Rc::new(DomView::build(&container)?);
    let services = Services {
        registry: Rc::new(StandardRegistry::shared()?),
        preferences: Rc::new(LocalStorage),
        client: Rc::new(RpcClient::from_config(&config)),
        view: view.clone(),
        bridge: Rc::new(WindowBridge::new(config.bridge_key.clone())),
        spawner: Rc::new(BrowserSpawner),
    };
    let connector = Connector::new(config, services);
    let listeners = DomListeners::attach(&view, &connector)?;

    let mounted = Mounted {
        container,
        connector: connector.clone(),
        listeners: Rc::new(RefCell::new(Some(listeners))),
    };
    MOUNTED.with(|m| m.borrow_mut().push(mounted.clone()));
    connector.start();
    Ok(WidgetHandle { mounted })
}
