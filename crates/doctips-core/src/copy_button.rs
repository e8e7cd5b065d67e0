#![forbid(unsafe_code)]

//! State machine behind the `<copy-icon>` element.
//!
//! Idle shows a clickable clipboard icon. A click copies the content and
//! flips to a non-clickable checkmark; a one-shot timer flips it back.

use core::time::Duration;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::clipboard::copy_multiline_text;
use crate::config::CopyButtonConfig;
use crate::error::DocTipsError;
use crate::host::{ClipboardHost, TimerHost};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyButtonState {
    Idle,
    JustCopied,
}

/// What the element should currently render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyIcon<'a> {
    pub icon: &'a str,
    pub size: u32,
    pub clickable: bool,
}

/// Result of a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyActivation {
    /// Content copied; revert to idle after the delay.
    Copied { revert_after: Duration },
    /// The checkmark is showing and does not take clicks.
    Ignored,
}

#[derive(Debug, Clone)]
pub struct CopyButton {
    content: String,
    state: CopyButtonState,
    config: CopyButtonConfig,
}

impl CopyButton {
    #[must_use]
    pub fn new(content: impl Into<String>, config: CopyButtonConfig) -> Self {
        Self {
            content: content.into(),
            state: CopyButtonState::Idle,
            config,
        }
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Replace the text to copy (the content attribute changed).
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    #[must_use]
    pub const fn state(&self) -> CopyButtonState {
        self.state
    }

    #[must_use]
    pub fn icon(&self) -> CopyIcon<'_> {
        match self.state {
            CopyButtonState::Idle => CopyIcon {
                icon: &self.config.idle_icon,
                size: self.config.icon_size,
                clickable: true,
            },
            CopyButtonState::JustCopied => CopyIcon {
                icon: &self.config.copied_icon,
                size: self.config.icon_size,
                clickable: false,
            },
        }
    }

    pub fn activate<C: ClipboardHost>(
        &mut self,
        clipboard: &C,
    ) -> Result<CopyActivation, DocTipsError> {
        if self.state == CopyButtonState::JustCopied {
            return Ok(CopyActivation::Ignored);
        }
        copy_multiline_text(clipboard, &self.content)?;
        self.state = CopyButtonState::JustCopied;
        Ok(CopyActivation::Copied {
            revert_after: self.config.revert_after(),
        })
    }

    pub fn revert(&mut self) {
        self.state = CopyButtonState::Idle;
    }
}

/// Handle a click on a shared button and schedule its revert.
///
/// `on_change` runs after every state change (the copy and the later revert)
/// so the caller can re-render. The timer only holds a weak reference: a
/// button dropped before the delay elapses is simply not reverted.
pub fn activate_shared<H, F>(
    button: &Rc<RefCell<CopyButton>>,
    host: &H,
    on_change: F,
) -> Result<CopyActivation, DocTipsError>
where
    H: ClipboardHost + TimerHost,
    F: Fn(&CopyButton) + 'static,
{
    let activation = button.borrow_mut().activate(host)?;
    let CopyActivation::Copied { revert_after } = activation else {
        return Ok(activation);
    };
    on_change(&button.borrow());

    let weak: Weak<RefCell<CopyButton>> = Rc::downgrade(button);
    host.schedule_once(
        revert_after,
        Box::new(move || {
            if let Some(button) = weak.upgrade() {
                button.borrow_mut().revert();
                debug!("copy button reverted to idle");
                on_change(&button.borrow());
            }
        }),
    )?;
    Ok(activation)
}
