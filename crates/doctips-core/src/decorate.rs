#![forbid(unsafe_code)]

//! Decorates shell snippets rendered as table rows: a copy element cell is
//! appended to the row and a terminal icon cell is prepended.

use tracing::{debug, warn};

use crate::config::DocTipsConfig;
use crate::error::DocTipsError;
use crate::host::MarkupHost;

const ICON_TAG: &str = "iconify-icon";
const CELL_TAG: &str = "td";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DecorationReport {
    pub decorated: usize,
    /// Code blocks without a row ancestor at the configured depth.
    pub skipped: usize,
}

/// `code[lang=shell],code[lang=bash]` for the default languages.
#[must_use]
pub fn code_block_selector(languages: &[String]) -> String {
    languages
        .iter()
        .map(|lang| format!("code[lang={}]", lang.trim()))
        .collect::<Vec<_>>()
        .join(",")
}

fn nth_ancestor<H: MarkupHost>(host: &H, node: &H::Node, depth: usize) -> Option<H::Node> {
    let mut current = node.clone();
    for _ in 0..depth {
        current = host.parent_element(&current)?;
    }
    Some(current)
}

fn wrap_in_cell<H: MarkupHost>(host: &H, child: &H::Node) -> Result<H::Node, DocTipsError> {
    let cell = host.create_element(CELL_TAG)?;
    host.append_child(&cell, child)?;
    Ok(cell)
}

pub fn decorate_code_blocks<H: MarkupHost>(
    host: &H,
    config: &DocTipsConfig,
) -> Result<DecorationReport, DocTipsError> {
    let mut report = DecorationReport::default();
    let blocks = &config.code_blocks;
    if blocks.languages.is_empty() {
        return Ok(report);
    }
    let copy = &config.copy_button;
    let size = copy.icon_size.to_string();

    for code in host.query_all(&code_block_selector(&blocks.languages))? {
        let Some(row) = nth_ancestor(host, &code, blocks.row_depth) else {
            warn!(depth = blocks.row_depth, "code block has no row ancestor");
            report.skipped += 1;
            continue;
        };

        let copy_icon = host.create_element(&copy.tag)?;
        host.set_attribute(&copy_icon, &copy.content_attribute, &host.text_content(&code))?;
        host.append_child(&row, &wrap_in_cell(host, &copy_icon)?)?;

        let terminal = host.create_element(ICON_TAG)?;
        host.set_attribute(&terminal, "icon", &blocks.terminal_icon)?;
        host.set_attribute(&terminal, "width", &size)?;
        host.set_attribute(&terminal, "height", &size)?;
        host.prepend_child(&row, &wrap_in_cell(host, &terminal)?)?;

        report.decorated += 1;
    }

    debug!(
        decorated = report.decorated,
        skipped = report.skipped,
        "decorated code blocks"
    );
    Ok(report)
}
