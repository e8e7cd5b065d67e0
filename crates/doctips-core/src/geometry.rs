#![forbid(unsafe_code)]

//! Anchor position computation for tooltips.

use crate::config::{TipOffset, TooltipConfig};
use crate::host::DocumentHost;

/// Which coordinate formula applies to the current page load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionMode {
    /// Page rendered inside an embedded web view: the anchor's local offset
    /// plus a fixed nudge, ignoring the offset-parent chain.
    InApp { offset: TipOffset },
    /// Regular browser tab: page-absolute coordinates summed over the
    /// offset-parent chain.
    Document,
}

impl PositionMode {
    /// The marker must match `location.search` exactly.
    #[must_use]
    pub fn detect(search: &str, config: &TooltipConfig) -> Self {
        if search == config.in_app_query {
            Self::InApp {
                offset: config.in_app_offset,
            }
        } else {
            Self::Document
        }
    }
}

/// Tooltip placement in CSS pixels.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TipPosition {
    pub left: i32,
    pub top: i32,
}

impl TipPosition {
    #[must_use]
    pub fn left_px(self) -> String {
        format!("{}px", self.left)
    }

    #[must_use]
    pub fn top_px(self) -> String {
        format!("{}px", self.top)
    }
}

/// Where a tooltip anchored at `anchor` should be placed.
///
/// In document mode the anchor's own height is counted once, so the tooltip
/// lands just below the anchor.
pub fn anchor_position<H: DocumentHost>(
    host: &H,
    anchor: &H::Element,
    mode: PositionMode,
) -> TipPosition {
    match mode {
        PositionMode::InApp { offset } => {
            let metrics = host.offset_metrics(anchor);
            TipPosition {
                left: metrics.left.saturating_add(offset.x),
                top: metrics.top.saturating_add(offset.y),
            }
        }
        PositionMode::Document => {
            let mut position = TipPosition {
                left: 0,
                top: host.offset_metrics(anchor).height,
            };
            let mut current = Some(anchor.clone());
            while let Some(element) = current {
                let metrics = host.offset_metrics(&element);
                position.left = position.left.saturating_add(metrics.left);
                position.top = position.top.saturating_add(metrics.top);
                current = host.offset_parent(&element);
            }
            position
        }
    }
}
