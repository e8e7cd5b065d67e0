#![forbid(unsafe_code)]

use thiserror::Error;

use crate::host::HostError;

/// Errors surfaced by tooltip, clipboard and decoration operations.
#[derive(Debug, Error)]
pub enum DocTipsError {
    /// A dynamic `getElementById`-style lookup found nothing.
    #[error("no element with id `{id}` in the document")]
    ElementNotFound { id: String },
    /// `showTip` had neither an explicit owner nor an event target.
    #[error("tooltip `{tip_id}` has no anchor element to position against")]
    MissingAnchor { tip_id: String },
    /// The host's `copy` command reported failure.
    #[error("clipboard copy command was rejected by the host")]
    CopyRejected,
    #[error("failed to parse configuration JSON: {0}")]
    ConfigParse(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),
    #[error(transparent)]
    Host(#[from] HostError),
}

impl DocTipsError {
    pub(crate) fn not_found(id: &str) -> Self {
        Self::ElementNotFound { id: id.to_owned() }
    }
}
