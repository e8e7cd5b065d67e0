#![forbid(unsafe_code)]

//! `wasm-bindgen` exports and the page globals that inline markup calls.
//!
//! Only compiled on `wasm32` targets.

use std::cell::RefCell;

use doctips_core::decorate::{DecorationReport, decorate_code_blocks};
use doctips_core::{DocTipsConfig, DocTipsError, TipKey, TooltipController};
use js_sys::{Function, Object, Reflect};
use tracing::debug;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement};

use crate::dom::WebDocument;
use crate::{GLOBAL_CLIPBOARD_COPY_TO, GLOBAL_HIDE_TIP, GLOBAL_SHOW_TIP};

thread_local! {
    static CONTROLLER: RefCell<TooltipController> = RefCell::new(TooltipController::default());

    /// Latest non-primitive key passed to `showTip` and its handle. The
    /// controller only compares against its active key, so older objects
    /// need no stable handle.
    static OBJECT_KEY: RefCell<Option<(u64, JsValue)>> = const { RefCell::new(None) };
}

pub(crate) fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<js_sys::Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            console_error(&msg);
        }));
    });
}

fn set_js(obj: &Object, key: &str, value: JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(key), &value);
}

pub(crate) fn to_js(err: DocTipsError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

fn report_to_js(report: DecorationReport) -> JsValue {
    let obj = Object::new();
    set_js(&obj, "decorated", JsValue::from_f64(report.decorated as f64));
    set_js(&obj, "skipped", JsValue::from_f64(report.skipped as f64));
    obj.into()
}

/// JS strict-equality semantics: primitives compare by kind and value,
/// everything else by identity.
fn tip_key(value: &JsValue) -> TipKey {
    if let Some(text) = value.as_string() {
        TipKey::Text(text)
    } else if let Some(number) = value.as_f64() {
        TipKey::Number(number)
    } else if let Some(flag) = value.as_bool() {
        TipKey::Boolean(flag)
    } else if value.is_null() {
        TipKey::Null
    } else if value.is_undefined() {
        TipKey::Undefined
    } else {
        object_key(value)
    }
}

fn object_key(value: &JsValue) -> TipKey {
    OBJECT_KEY.with(|slot| {
        let mut slot = slot.borrow_mut();
        let handle = match slot.as_ref() {
            Some((handle, last)) if Object::is(last, value) => return TipKey::Object(*handle),
            Some((handle, _)) => handle.wrapping_add(1),
            None => 0,
        };
        *slot = Some((handle, value.clone()));
        TipKey::Object(handle)
    })
}

fn tip_name(value: &JsValue) -> Result<String, JsValue> {
    value
        .as_string()
        .ok_or_else(|| js_sys::TypeError::new("tooltip id must be a string").into())
}

/// Explicit owner first, then the element the event fired on. A non-HTML
/// element (an SVG icon inside the trigger) anchors on its nearest HTML
/// ancestor.
fn anchor_element(event: &JsValue, owner: &JsValue) -> Option<HtmlElement> {
    let start = match owner.dyn_ref::<Element>() {
        Some(owner) => owner.clone(),
        None => event
            .dyn_ref::<web_sys::Event>()?
            .target()?
            .dyn_into::<Element>()
            .ok()?,
    };
    nearest_html_element(start)
}

fn nearest_html_element(element: Element) -> Option<HtmlElement> {
    let mut current = Some(element);
    while let Some(element) = current {
        match element.dyn_into::<HtmlElement>() {
            Ok(html) => return Some(html),
            Err(other) => current = other.parent_element(),
        }
    }
    None
}

/// The text `input.value = value` would hold: `null` is empty, anything else
/// goes through JS `String(value)`.
fn copy_value(value: &JsValue) -> Result<String, JsValue> {
    if let Some(text) = value.as_string() {
        return Ok(text);
    }
    if value.is_null() {
        return Ok(String::new());
    }
    let to_string = Reflect::get(&js_sys::global(), &"String".into())?.dyn_into::<Function>()?;
    to_string
        .call1(&JsValue::UNDEFINED, value)?
        .as_string()
        .ok_or_else(|| js_sys::TypeError::new("value has no string form").into())
}

pub(crate) fn dismiss_on_key() {
    let result = WebDocument::current()
        .map_err(DocTipsError::from)
        .and_then(|host| CONTROLLER.with(|ctl| ctl.borrow_mut().dismiss_on_key(&host)));
    if let Err(err) = result {
        console_error(&err.to_string());
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    install_panic_hook();
}

/// Install the page globals, define the copy element and decorate shell
/// snippets. Returns `{ decorated, skipped }`.
#[wasm_bindgen(js_name = installDocTips)]
pub fn install(config_json: Option<String>) -> Result<JsValue, JsValue> {
    install_panic_hook();
    let config = DocTipsConfig::from_optional_json(config_json.as_deref()).map_err(to_js)?;
    let host = WebDocument::current().map_err(|err| to_js(err.into()))?;

    CONTROLLER.with(|ctl| *ctl.borrow_mut() = TooltipController::new(config.tooltip.clone()));
    install_globals(&host)?;
    crate::copy_element::define(&config.copy_button)?;
    let report = decorate_code_blocks(&host, &config).map_err(to_js)?;

    debug!(
        decorated = report.decorated,
        skipped = report.skipped,
        "doctips installed"
    );
    Ok(report_to_js(report))
}

#[wasm_bindgen(js_name = showTip)]
pub fn show_tip(event: JsValue, name: JsValue, unique: JsValue, owner: JsValue) -> Result<(), JsValue> {
    let name = tip_name(&name)?;
    let host = WebDocument::current().map_err(|err| to_js(err.into()))?;
    let anchor = anchor_element(&event, &owner);
    CONTROLLER
        .with(|ctl| {
            ctl.borrow_mut()
                .show_tip(&host, &name, tip_key(&unique), anchor)
        })
        .map(|_| ())
        .map_err(to_js)
}

/// `event` and `unique` are accepted for call-site symmetry with `showTip`.
#[wasm_bindgen(js_name = hideTip)]
pub fn hide_tip(event: JsValue, name: JsValue, unique: JsValue) -> Result<(), JsValue> {
    let _ = (event, unique);
    let name = tip_name(&name)?;
    let host = WebDocument::current().map_err(|err| to_js(err.into()))?;
    CONTROLLER
        .with(|ctl| ctl.borrow_mut().hide_tip(&host, &name))
        .map_err(to_js)
}

#[wasm_bindgen(js_name = copyToClipboard)]
pub fn copy_to_clipboard(value: &str) -> Result<(), JsValue> {
    let host = WebDocument::current().map_err(|err| to_js(err.into()))?;
    doctips_core::clipboard::copy_text(&host, value).map_err(to_js)
}

fn throw_on_err(result: Result<(), JsValue>) {
    if let Err(err) = result {
        wasm_bindgen::throw_val(err);
    }
}

/// Expose the handlers on `window` for inline `onmouseover="showTip(...)"`
/// attributes and the API docs' `Clipboard_CopyTo`.
fn install_globals(host: &WebDocument) -> Result<(), JsValue> {
    let window: &JsValue = host.window().as_ref();

    let show = Closure::<dyn Fn(JsValue, JsValue, JsValue, JsValue)>::new(
        |event: JsValue, name: JsValue, unique: JsValue, owner: JsValue| {
            throw_on_err(show_tip(event, name, unique, owner));
        },
    );
    let hide = Closure::<dyn Fn(JsValue, JsValue, JsValue)>::new(
        |event: JsValue, name: JsValue, unique: JsValue| {
            throw_on_err(hide_tip(event, name, unique));
        },
    );
    let copy = Closure::<dyn Fn(JsValue)>::new(|value: JsValue| {
        throw_on_err(copy_value(&value).and_then(|text| copy_to_clipboard(&text)));
    });

    Reflect::set(window, &GLOBAL_SHOW_TIP.into(), &show.into_js_value())?;
    Reflect::set(window, &GLOBAL_HIDE_TIP.into(), &hide.into_js_value())?;
    Reflect::set(window, &GLOBAL_CLIPBOARD_COPY_TO.into(), &copy.into_js_value())?;
    Ok(())
}
