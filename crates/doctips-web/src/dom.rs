#![forbid(unsafe_code)]

//! `web-sys` implementations of the core host traits.

use core::time::Duration;
use std::cell::RefCell;

use doctips_core::{
    ClipboardHost, CopySurface, DocumentHost, HostError, MarkupHost, OffsetMetrics, TimerHost,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, HtmlDocument, HtmlElement, HtmlInputElement, HtmlTextAreaElement,
    KeyboardEvent, Window,
};

thread_local! {
    /// The document's single key-press dismiss handler. Replacing it drops
    /// the previous closure after the document stops referencing it.
    static KEY_DISMISS: RefCell<Option<Closure<dyn FnMut(KeyboardEvent)>>> =
        const { RefCell::new(None) };
}

pub(crate) fn host_error(err: JsValue) -> HostError {
    if let Some(error) = err.dyn_ref::<js_sys::Error>() {
        return HostError::new(String::from(error.message()));
    }
    match err.as_string() {
        Some(message) => HostError::new(message),
        None => HostError::new(format!("{err:?}")),
    }
}

/// Handle onto the page's `window` and `document`.
#[derive(Debug, Clone)]
pub(crate) struct WebDocument {
    window: Window,
    document: Document,
}

impl WebDocument {
    pub(crate) fn current() -> Result<Self, HostError> {
        let window = web_sys::window().ok_or_else(|| HostError::new("no global `window`"))?;
        let document = window
            .document()
            .ok_or_else(|| HostError::new("window has no document"))?;
        Ok(Self { window, document })
    }

    pub(crate) fn window(&self) -> &Window {
        &self.window
    }
}

impl DocumentHost for WebDocument {
    type Element = HtmlElement;

    fn element_by_id(&self, id: &str) -> Option<HtmlElement> {
        self.document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    }

    fn offset_metrics(&self, element: &HtmlElement) -> OffsetMetrics {
        OffsetMetrics {
            left: element.offset_left(),
            top: element.offset_top(),
            height: element.offset_height(),
        }
    }

    fn offset_parent(&self, element: &HtmlElement) -> Option<HtmlElement> {
        element
            .offset_parent()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    }

    fn set_style(&self, element: &HtmlElement, property: &str, value: &str) -> Result<(), HostError> {
        element
            .style()
            .set_property(property, value)
            .map_err(host_error)
    }

    fn location_search(&self) -> String {
        self.window.location().search().unwrap_or_default()
    }

    fn install_key_dismiss(&self) -> Result<(), HostError> {
        let handler = Closure::<dyn FnMut(KeyboardEvent)>::new(|_event: KeyboardEvent| {
            crate::wasm::dismiss_on_key();
        });
        self.document
            .set_onkeydown(Some(handler.as_ref().unchecked_ref()));
        KEY_DISMISS.with(|slot| *slot.borrow_mut() = Some(handler));
        Ok(())
    }
}

/// The transient field a copy is selected from.
#[derive(Debug, Clone)]
pub(crate) enum CopyField {
    Line(HtmlInputElement),
    Block(HtmlTextAreaElement),
}

impl CopyField {
    fn element(&self) -> &HtmlElement {
        match self {
            Self::Line(input) => input.as_ref(),
            Self::Block(area) => area.as_ref(),
        }
    }
}

impl WebDocument {
    fn create_field<T: JsCast>(&self, tag: &str) -> Result<T, HostError> {
        self.document
            .create_element(tag)
            .map_err(host_error)?
            .dyn_into::<T>()
            .map_err(|_| HostError::new(format!("`{tag}` element has an unexpected type")))
    }
}

impl ClipboardHost for WebDocument {
    type Input = CopyField;

    fn create_input(&self, value: &str, surface: CopySurface) -> Result<CopyField, HostError> {
        match surface {
            CopySurface::SingleLine => {
                let input: HtmlInputElement = self.create_field("input")?;
                input.set_value(value);
                Ok(CopyField::Line(input))
            }
            CopySurface::MultiLine => {
                let area: HtmlTextAreaElement = self.create_field("textarea")?;
                area.set_value(value);
                area.set_read_only(true);
                // Keep the page from scrolling to the field while it is attached.
                let style = area.style();
                style.set_property("position", "fixed").map_err(host_error)?;
                style.set_property("top", "0").map_err(host_error)?;
                style.set_property("left", "-9999px").map_err(host_error)?;
                Ok(CopyField::Block(area))
            }
        }
    }

    fn attach_input(&self, input: &CopyField) -> Result<(), HostError> {
        let body = self
            .document
            .body()
            .ok_or_else(|| HostError::new("document has no body"))?;
        body.append_child(input.element()).map_err(host_error)?;
        Ok(())
    }

    fn select_input(&self, input: &CopyField) {
        match input {
            CopyField::Line(input) => input.select(),
            CopyField::Block(area) => area.select(),
        }
    }

    fn exec_copy(&self) -> Result<bool, HostError> {
        self.document
            .dyn_ref::<HtmlDocument>()
            .ok_or_else(|| HostError::new("document does not support editing commands"))?
            .exec_command("copy")
            .map_err(host_error)
    }

    fn detach_input(&self, input: &CopyField) -> Result<(), HostError> {
        input.element().remove();
        Ok(())
    }
}

impl MarkupHost for WebDocument {
    type Node = Element;

    fn query_all(&self, selector: &str) -> Result<Vec<Element>, HostError> {
        let list = self
            .document
            .query_selector_all(selector)
            .map_err(host_error)?;
        Ok((0..list.length())
            .filter_map(|idx| list.get(idx))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect())
    }

    fn text_content(&self, node: &Element) -> String {
        node.text_content().unwrap_or_default()
    }

    fn parent_element(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn create_element(&self, tag: &str) -> Result<Element, HostError> {
        self.document.create_element(tag).map_err(host_error)
    }

    fn set_attribute(&self, node: &Element, name: &str, value: &str) -> Result<(), HostError> {
        node.set_attribute(name, value).map_err(host_error)
    }

    fn append_child(&self, parent: &Element, child: &Element) -> Result<(), HostError> {
        parent.append_with_node_1(child).map_err(host_error)
    }

    fn prepend_child(&self, parent: &Element, child: &Element) -> Result<(), HostError> {
        parent.prepend_with_node_1(child).map_err(host_error)
    }
}

impl TimerHost for WebDocument {
    fn schedule_once(
        &self,
        delay: Duration,
        task: Box<dyn FnOnce() + 'static>,
    ) -> Result<(), HostError> {
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        let callback = Closure::once_into_js(move || task());
        self.window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                millis,
            )
            .map_err(host_error)?;
        Ok(())
    }
}
