#![forbid(unsafe_code)]

//! `doctips-core` holds the logic behind the documentation page's tooltips
//! and copy buttons, independent of any browser binding.
//!
//! Design goals:
//! - **Host-driven**: every DOM, clipboard and timer effect goes through the
//!   traits in [`host`], so the same code runs against `web-sys` and against
//!   the in-memory host the tests use.
//! - **One owner for page state**: the tooltip slot lives in a
//!   [`tooltip::TooltipController`] value rather than in ambient globals.
//! - **Fallible lookups**: a missing element is a [`DocTipsError`], not a
//!   silent no-op.

pub mod clipboard;
pub mod config;
pub mod copy_button;
pub mod decorate;
pub mod error;
pub mod geometry;
pub mod host;
pub mod tooltip;

#[cfg(test)]
pub(crate) mod testing;

pub use config::DocTipsConfig;
pub use error::DocTipsError;
pub use host::{
    ClipboardHost, CopySurface, DocumentHost, HostError, MarkupHost, OffsetMetrics, TimerHost,
};
pub use tooltip::{ShowOutcome, TipKey, TooltipController};
