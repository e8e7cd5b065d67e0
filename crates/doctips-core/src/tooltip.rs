#![forbid(unsafe_code)]

//! Single-slot tooltip controller behind the page's `showTip` / `hideTip`.
//!
//! The controller tracks one logical tooltip at a time:
//! - a show with the key already active is a no-op,
//! - a show with a new key redirects the slot without hiding the previous
//!   tooltip's element,
//! - a hide always clears the active key, whatever id it names.

use tracing::{debug, trace};

use crate::config::TooltipConfig;
use crate::error::DocTipsError;
use crate::geometry::{PositionMode, TipPosition, anchor_position};
use crate::host::DocumentHost;

/// Caller-supplied de-duplication token.
///
/// Equality mirrors JS strict equality: keys of different kinds never compare
/// equal, and a NaN key never matches anything.
#[derive(Debug, Clone, PartialEq)]
pub enum TipKey {
    Text(String),
    Number(f64),
    Boolean(bool),
    Null,
    Undefined,
    /// A non-primitive value. The host hands out the handle and gives the
    /// same one back only for the identical object.
    Object(u64),
}

impl From<&str> for TipKey {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for TipKey {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for TipKey {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for TipKey {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

/// Result of one `show_tip` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowOutcome {
    /// The key was already active; nothing was touched.
    Duplicate,
    Shown { position: TipPosition },
}

#[derive(Debug, Clone, Default)]
pub struct TooltipController {
    config: TooltipConfig,
    current_key: Option<TipKey>,
    /// Last tooltip shown. Hiding does not clear it, so a later key press
    /// hides this element again.
    current_tip_id: Option<String>,
}

impl TooltipController {
    #[must_use]
    pub fn new(config: TooltipConfig) -> Self {
        Self {
            config,
            current_key: None,
            current_tip_id: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &TooltipConfig {
        &self.config
    }

    #[must_use]
    pub fn active_key(&self) -> Option<&TipKey> {
        self.current_key.as_ref()
    }

    #[must_use]
    pub fn current_tip_id(&self) -> Option<&str> {
        self.current_tip_id.as_deref()
    }

    /// Reveal `tip_id` next to `anchor`.
    ///
    /// State is recorded and the key-press dismiss handler installed before
    /// the tooltip element is looked up; a failed lookup leaves them in place.
    pub fn show_tip<H: DocumentHost>(
        &mut self,
        host: &H,
        tip_id: &str,
        key: TipKey,
        anchor: Option<H::Element>,
    ) -> Result<ShowOutcome, DocTipsError> {
        if self.current_key.as_ref() == Some(&key) {
            trace!(tip_id, ?key, "tooltip already active");
            return Ok(ShowOutcome::Duplicate);
        }
        self.current_key = Some(key);
        self.current_tip_id = Some(tip_id.to_owned());
        host.install_key_dismiss()?;

        let anchor = anchor.ok_or_else(|| DocTipsError::MissingAnchor {
            tip_id: tip_id.to_owned(),
        })?;
        let mode = PositionMode::detect(&host.location_search(), &self.config);
        let position = anchor_position(host, &anchor, mode);

        let element = host
            .element_by_id(tip_id)
            .ok_or_else(|| DocTipsError::not_found(tip_id))?;
        host.set_style(&element, "position", "absolute")?;
        host.set_style(&element, "left", &position.left_px())?;
        host.set_style(&element, "top", &position.top_px())?;
        host.set_style(&element, "display", "block")?;

        debug!(tip_id, ?mode, left = position.left, top = position.top, "tooltip shown");
        Ok(ShowOutcome::Shown { position })
    }

    /// Hide `tip_id` and forget the active key, even when `tip_id` is not the
    /// tooltip currently tracked.
    pub fn hide_tip<H: DocumentHost>(&mut self, host: &H, tip_id: &str) -> Result<(), DocTipsError> {
        let element = host
            .element_by_id(tip_id)
            .ok_or_else(|| DocTipsError::not_found(tip_id))?;
        host.set_style(&element, "display", "none")?;
        self.current_key = None;
        debug!(tip_id, "tooltip hidden");
        Ok(())
    }

    /// Key-press handler body: hide whichever tooltip was shown last.
    pub fn dismiss_on_key<H: DocumentHost>(&mut self, host: &H) -> Result<(), DocTipsError> {
        let Some(tip_id) = self.current_tip_id.clone() else {
            return Ok(());
        };
        debug!(tip_id = %tip_id, "dismissing tooltip on key press");
        self.hide_tip(host, &tip_id)
    }
}
