//! DomView: draws the button and the picker panel
//!
//! ```html
//! <div class="sui-connect">
//!   <button class="sui-connect__button" data-status="disconnected">Connect Wallet</button>
//!   <div class="sui-connect__panel" hidden>
//!     <ul class="sui-connect__list"><li><button data-wallet-id="..">..</button></li></ul>
//!     <p class="sui-connect__empty" hidden></p>
//!     <button class="sui-connect__disconnect" hidden>Disconnect</button>
//!   </div>
//! </div>
//! ```

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event};

use super::js_message;
use crate::core::connector::Connector;
use crate::core::selection::Status;
use crate::core::view::{ButtonModel, PickerModel, WidgetView};

pub const WALLET_ID_ATTR: &str = "data-wallet-id";
pub const ROOT_CLASS: &str = "sui-connect";

pub struct DomView {
    document: Document,
    button: Element,
    panel: Element,
    list: Element,
    empty: Element,
    disconnect: Element,
}

fn create(document: &Document, tag: &str, class: &str) -> Result<Element, JsValue> {
    let element = document.create_element(tag)?;
    element.set_class_name(class);
    if tag == "button" {
        element.set_attribute("type", "button")?;
    }
    Ok(element)
}

fn set_hidden(element: &Element, hidden: bool) -> Result<(), JsValue> {
    if hidden {
        element.set_attribute("hidden", "")
    } else {
        element.remove_attribute("hidden")
    }
}

impl DomView {
    /// Build the widget markup inside `container`, replacing markup left
    /// behind by an earlier mount.
    pub fn build(container: &Element) -> Result<Self, JsValue> {
        let document = container
            .owner_document()
            .ok_or_else(|| JsValue::from_str("container is not attached to a document"))?;

        while let Some(stale) = container.query_selector(&format!(":scope > .{}", ROOT_CLASS))? {
            stale.remove();
        }

        let root = create(&document, "div", ROOT_CLASS)?;
        let button = create(&document, "button", "sui-connect__button")?;
        let panel = create(&document, "div", "sui-connect__panel")?;
        let list = create(&document, "ul", "sui-connect__list")?;
        let empty = create(&document, "p", "sui-connect__empty")?;
        let disconnect = create(&document, "button", "sui-connect__disconnect")?;

        set_hidden(&panel, true)?;
        set_hidden(&empty, true)?;
        set_hidden(&disconnect, true)?;
        panel.append_child(&list)?;
        panel.append_child(&empty)?;
        panel.append_child(&disconnect)?;
        root.append_child(&button)?;
        root.append_child(&panel)?;
        container.append_child(&root)?;

        Ok(Self { document, button, panel, list, empty, disconnect })
    }

    pub fn button(&self) -> &Element {
        &self.button
    }

    pub fn list(&self) -> &Element {
        &self.list
    }

    pub fn disconnect_button(&self) -> &Element {
        &self.disconnect
    }

    fn draw_button(&self, model: &ButtonModel) -> Result<(), JsValue> {
        self.button.set_text_content(Some(&model.label));
        self.button.set_attribute("data-status", model.status.as_str())?;
        self.button
            .set_attribute("aria-busy", if model.status == Status::Connecting { "true" } else { "false" })?;
        match &model.title {
            Some(title) => self.button.set_attribute("title", title),
            None => self.button.remove_attribute("title"),
        }
    }

    fn draw_picker(&self, model: &PickerModel) -> Result<(), JsValue> {
        set_hidden(&self.panel, !model.open)?;

        self.list.set_inner_html("");
        for entry in &model.entries {
            let item = self.document.create_element("li")?;
            let choice = create(&self.document, "button", "sui-connect__wallet")?;
            choice.set_attribute(WALLET_ID_ATTR, &entry.id)?;
            if entry.active {
                choice.set_attribute("aria-current", "true")?;
            }
            if let Some(icon) = &entry.icon {
                let img = create(&self.document, "img", "sui-connect__icon")?;
                img.set_attribute("src", icon)?;
                img.set_attribute("alt", "")?;
                choice.append_child(&img)?;
            }
            let name = create(&self.document, "span", "sui-connect__name")?;
            name.set_text_content(Some(&entry.name));
            choice.append_child(&name)?;
            item.append_child(&choice)?;
            self.list.append_child(&item)?;
        }

        match &model.empty_message {
            Some(message) => {
                self.empty.set_text_content(Some(message));
                set_hidden(&self.empty, false)?;
            }
            None => set_hidden(&self.empty, true)?,
        }

        self.disconnect.set_text_content(Some(&model.disconnect_label));
        set_hidden(&self.disconnect, !model.show_disconnect)
    }
}

impl WidgetView for DomView {
    fn render_button(&self, model: &ButtonModel) {
        if let Err(e) = self.draw_button(model) {
            tracing::warn!(error = %js_message(&e), "button render failed");
        }
    }

    fn render_picker(&self, model: &PickerModel) {
        if let Err(e) = self.draw_picker(model) {
            tracing::warn!(error = %js_message(&e), "picker render failed");
        }
    }
}

type ClickClosure = Closure<dyn FnMut(Event)>;

/// Click handlers attached to the widget elements; `detach` removes them.
pub struct DomListeners {
    attached: Vec<(Element, ClickClosure)>,
}

impl DomListeners {
    pub fn attach(view: &DomView, connector: &Connector) -> Result<Self, JsValue> {
        let mut listeners = Self { attached: Vec::new() };

        let c = connector.clone();
        listeners.on_click(view.button(), move |_event| c.toggle_picker())?;

        let c = connector.clone();
        listeners.on_click(view.list(), move |event| {
            let id = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest(&format!("[{}]", WALLET_ID_ATTR)).ok().flatten())
                .and_then(|el| el.get_attribute(WALLET_ID_ATTR));
            if let Some(id) = id {
                c.select_wallet(&id);
            }
        })?;

        let c = connector.clone();
        listeners.on_click(view.disconnect_button(), move |_event| c.request_disconnect())?;

        Ok(listeners)
    }

    fn on_click(
        &mut self,
        element: &Element,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<(), JsValue> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        element.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        self.attached.push((element.clone(), closure));
        Ok(())
    }

    pub fn detach(self) {
        for (element, closure) in self.attached {
            let _ = element
                .remove_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        }
    }
}
