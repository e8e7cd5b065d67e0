#![forbid(unsafe_code)]

//! WASM bindings that install the documentation page enhancements.
//!
//! `installDocTips` wires everything up once per page:
//! - `window.showTip` / `window.hideTip` for the tooltips that inline event
//!   attributes in rendered API docs call,
//! - `window.Clipboard_CopyTo` for API doc copy links,
//! - the `<copy-icon>` custom element, attached to every shell snippet.
//!
//! The logic lives in `doctips-core`; this crate only adapts `web-sys` to its
//! host traits and exports the entry points with `wasm-bindgen`.

#[cfg(target_arch = "wasm32")]
mod copy_element;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{copy_to_clipboard, hide_tip, install, show_tip};

/// Names of the functions placed on `window`.
pub const GLOBAL_SHOW_TIP: &str = "showTip";
pub const GLOBAL_HIDE_TIP: &str = "hideTip";
pub const GLOBAL_CLIPBOARD_COPY_TO: &str = "Clipboard_CopyTo";
