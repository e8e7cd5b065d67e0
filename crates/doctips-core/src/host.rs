#![forbid(unsafe_code)]

//! Capability traits the embedding environment implements.
//!
//! The browser binding implements these on `web-sys` types; tests implement
//! them on an in-memory arena. Every method takes `&self`: hosts are handles
//! onto a document that the page owns, not owners of it.

use core::time::Duration;

use thiserror::Error;

/// Failure reported by a host call (a rejected DOM mutation, a missing
/// `window`, a thrown JS exception).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("host call failed: {message}")]
pub struct HostError {
    message: String,
}

impl HostError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Layout offsets of one element relative to its offset parent, in CSS pixels.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OffsetMetrics {
    pub left: i32,
    pub top: i32,
    pub height: i32,
}

/// Element lookup, geometry and styling used by the tooltip controller.
pub trait DocumentHost {
    type Element: Clone;

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    fn offset_metrics(&self, element: &Self::Element) -> OffsetMetrics;

    fn offset_parent(&self, element: &Self::Element) -> Option<Self::Element>;

    fn set_style(
        &self,
        element: &Self::Element,
        property: &str,
        value: &str,
    ) -> Result<(), HostError>;

    /// Raw `location.search` of the page, including the leading `?`.
    fn location_search(&self) -> String;

    /// Route every document key press to the controller's dismiss path.
    ///
    /// Only one such handler exists per document; installing replaces the
    /// previous one.
    fn install_key_dismiss(&self) -> Result<(), HostError>;
}

/// Kind of transient field a copy goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopySurface {
    /// An `<input>`: the host strips line breaks from the value.
    SingleLine,
    /// A `<textarea>`: the value is kept verbatim.
    MultiLine,
}

/// The synchronous select-and-copy primitives behind [`crate::clipboard`].
pub trait ClipboardHost {
    type Input;

    fn create_input(&self, value: &str, surface: CopySurface) -> Result<Self::Input, HostError>;

    fn attach_input(&self, input: &Self::Input) -> Result<(), HostError>;

    fn select_input(&self, input: &Self::Input);

    /// Run the `copy` editing command. `Ok(false)` means the host refused.
    fn exec_copy(&self) -> Result<bool, HostError>;

    fn detach_input(&self, input: &Self::Input) -> Result<(), HostError>;
}

/// Markup queries and construction used to decorate code blocks.
pub trait MarkupHost {
    type Node: Clone;

    fn query_all(&self, selector: &str) -> Result<Vec<Self::Node>, HostError>;

    fn text_content(&self, node: &Self::Node) -> String;

    fn parent_element(&self, node: &Self::Node) -> Option<Self::Node>;

    fn create_element(&self, tag: &str) -> Result<Self::Node, HostError>;

    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str)
    -> Result<(), HostError>;

    fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<(), HostError>;

    fn prepend_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<(), HostError>;
}

/// One-shot delayed callbacks. Scheduled tasks are fire-and-forget.
pub trait TimerHost {
    fn schedule_once(
        &self,
        delay: Duration,
        task: Box<dyn FnOnce() + 'static>,
    ) -> Result<(), HostError>;
}
