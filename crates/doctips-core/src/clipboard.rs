#![forbid(unsafe_code)]

use tracing::{debug, warn};

use crate::error::DocTipsError;
use crate::host::{ClipboardHost, CopySurface};

/// Copy `value` through a transient, selected `<input>`.
///
/// Line breaks are lost on the way, as with any text input. The input is
/// detached again whether or not the copy command succeeds.
pub fn copy_text<C: ClipboardHost>(host: &C, value: &str) -> Result<(), DocTipsError> {
    copy_through(host, value, CopySurface::SingleLine)
}

/// Copy `value` through a transient `<textarea>`, keeping its line breaks.
pub fn copy_multiline_text<C: ClipboardHost>(host: &C, value: &str) -> Result<(), DocTipsError> {
    copy_through(host, value, CopySurface::MultiLine)
}

fn copy_through<C: ClipboardHost>(
    host: &C,
    value: &str,
    surface: CopySurface,
) -> Result<(), DocTipsError> {
    let input = host.create_input(value, surface)?;
    host.attach_input(&input)?;
    host.select_input(&input);
    let copied = host.exec_copy();
    host.detach_input(&input)?;

    if copied? {
        debug!(bytes = value.len(), ?surface, "copied text to clipboard");
        Ok(())
    } else {
        warn!(bytes = value.len(), "host rejected clipboard copy");
        Err(DocTipsError::CopyRejected)
    }
}
