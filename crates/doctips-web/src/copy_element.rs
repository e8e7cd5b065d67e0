#![forbid(unsafe_code)]

//! The `<copy-icon content="…">` custom element.
//!
//! Custom element classes have to extend `HTMLElement` in JS, so a small shim
//! defines the class and forwards `connectedCallback` into Rust. Everything
//! else (state, rendering, clicks) lives here.

use std::cell::RefCell;
use std::rc::Rc;

use doctips_core::DocTipsError;
use doctips_core::config::CopyButtonConfig;
use doctips_core::copy_button::{CopyActivation, CopyButton, activate_shared};
use js_sys::Reflect;
use tracing::debug;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement, MouseEvent};

use crate::dom::{WebDocument, host_error};
use crate::wasm::console_error;

/// Property set on connected elements so a re-attached element keeps its
/// single click listener.
const CONNECTED_MARKER: &str = "__doctipsCopyButton";
const ICON_TAG: &str = "iconify-icon";

#[wasm_bindgen(inline_js = r#"
export function define_copy_element(tag, connect) {
    if (customElements.get(tag)) {
        return false;
    }
    customElements.define(tag, class extends HTMLElement {
        connectedCallback() {
            connect(this);
        }
    });
    return true;
}
"#)]
extern "C" {
    #[wasm_bindgen(catch)]
    fn define_copy_element(tag: &str, connect: &js_sys::Function) -> Result<bool, JsValue>;
}

/// Register the element class. A tag already defined on the page is left as is.
pub(crate) fn define(config: &CopyButtonConfig) -> Result<(), JsValue> {
    let config = config.clone();
    let tag = config.tag.clone();
    let on_connect = Closure::<dyn Fn(HtmlElement)>::new(move |element: HtmlElement| {
        if let Err(err) = connect(&element, &config) {
            console_error(&format!("copy button failed to connect: {err}"));
        }
    });
    let defined = define_copy_element(&tag, on_connect.as_ref().unchecked_ref())?;
    if defined {
        // The element class calls back into this closure for the page's lifetime.
        on_connect.forget();
    }
    debug!(tag = %tag, defined, "copy button element registered");
    Ok(())
}

fn connect(element: &HtmlElement, config: &CopyButtonConfig) -> Result<(), DocTipsError> {
    if Reflect::has(element, &CONNECTED_MARKER.into()).map_err(host_error)? {
        return Ok(());
    }
    Reflect::set(element, &CONNECTED_MARKER.into(), &JsValue::TRUE).map_err(host_error)?;

    let content = element
        .get_attribute(&config.content_attribute)
        .unwrap_or_default();
    let button = Rc::new(RefCell::new(CopyButton::new(content, config.clone())));
    render(element, &button.borrow())?;

    let target = element.clone();
    let attribute = config.content_attribute.clone();
    let on_click = Closure::<dyn Fn(MouseEvent)>::new(move |_event: MouseEvent| {
        if let Err(err) = click(&target, &button, &attribute) {
            console_error(&err.to_string());
        }
    });
    element
        .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
        .map_err(host_error)?;
    on_click.forget();
    Ok(())
}

fn click(
    element: &HtmlElement,
    button: &Rc<RefCell<CopyButton>>,
    attribute: &str,
) -> Result<(), DocTipsError> {
    if let Some(content) = element.get_attribute(attribute) {
        button.borrow_mut().set_content(content);
    }
    let host = WebDocument::current()?;
    let target = element.clone();
    let activation = activate_shared(button, &host, move |button| {
        if let Err(err) = render(&target, button) {
            console_error(&err.to_string());
        }
    })?;
    if activation == CopyActivation::Ignored {
        debug!("click ignored while copy confirmation is showing");
    }
    Ok(())
}

/// Replace the element's children with the icon for the current state.
fn render(element: &HtmlElement, button: &CopyButton) -> Result<(), DocTipsError> {
    let icon = button.icon();
    let document = element
        .owner_document()
        .ok_or_else(|| doctips_core::HostError::new("element has no owner document"))?;
    let node: Element = document.create_element(ICON_TAG).map_err(host_error)?;
    let size = icon.size.to_string();
    node.set_attribute("icon", icon.icon).map_err(host_error)?;
    node.set_attribute("width", &size).map_err(host_error)?;
    node.set_attribute("height", &size).map_err(host_error)?;
    if icon.clickable {
        node.set_attribute("style", "cursor: pointer").map_err(host_error)?;
    }
    element.set_inner_html("");
    element.append_child(&node).map_err(host_error)?;
    Ok(())
}
