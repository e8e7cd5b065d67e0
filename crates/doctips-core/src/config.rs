#![forbid(unsafe_code)]

//! Page-level configuration, parsed from the optional JSON handed to `installDocTips`.

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::DocTipsError;

pub const DEFAULT_IN_APP_QUERY: &str = "?inapp";
pub const DEFAULT_COPY_TAG: &str = "copy-icon";
pub const DEFAULT_CONTENT_ATTRIBUTE: &str = "content";
pub const DEFAULT_IDLE_ICON: &str = "solar:clipboard-outline";
pub const DEFAULT_COPIED_ICON: &str = "ic:twotone-check";
pub const DEFAULT_TERMINAL_ICON: &str = "ph:terminal-bold";
pub const DEFAULT_ICON_SIZE: u32 = 16;
pub const DEFAULT_REVERT_AFTER_MS: u64 = 500;
pub const DEFAULT_ROW_DEPTH: usize = 3;

pub type Result<T> = std::result::Result<T, DocTipsError>;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct DocTipsConfig {
    pub tooltip: TooltipConfig,
    pub copy_button: CopyButtonConfig,
    pub code_blocks: CodeBlockConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct TooltipConfig {
    /// Exact `location.search` value that marks an embedded in-app web view.
    pub in_app_query: String,
    pub in_app_offset: TipOffset,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            in_app_query: DEFAULT_IN_APP_QUERY.to_owned(),
            in_app_offset: TipOffset { x: 10, y: 30 },
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TipOffset {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct CopyButtonConfig {
    /// Custom element tag name; must contain a hyphen.
    pub tag: String,
    pub content_attribute: String,
    pub idle_icon: String,
    pub copied_icon: String,
    pub icon_size: u32,
    pub revert_after_ms: u64,
}

impl CopyButtonConfig {
    #[must_use]
    pub const fn revert_after(&self) -> Duration {
        Duration::from_millis(self.revert_after_ms)
    }
}

impl Default for CopyButtonConfig {
    fn default() -> Self {
        Self {
            tag: DEFAULT_COPY_TAG.to_owned(),
            content_attribute: DEFAULT_CONTENT_ATTRIBUTE.to_owned(),
            idle_icon: DEFAULT_IDLE_ICON.to_owned(),
            copied_icon: DEFAULT_COPIED_ICON.to_owned(),
            icon_size: DEFAULT_ICON_SIZE,
            revert_after_ms: DEFAULT_REVERT_AFTER_MS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct CodeBlockConfig {
    /// Values of the `lang` attribute that mark a shell snippet.
    pub languages: Vec<String>,
    /// How many element ancestors up from `<code>` the table row sits.
    pub row_depth: usize,
    pub terminal_icon: String,
}

impl Default for CodeBlockConfig {
    fn default() -> Self {
        Self {
            languages: vec!["shell".to_owned(), "bash".to_owned()],
            row_depth: DEFAULT_ROW_DEPTH,
            terminal_icon: DEFAULT_TERMINAL_ICON.to_owned(),
        }
    }
}

impl DocTipsConfig {
    /// Parse and validate a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse `json` when present, otherwise return the defaults.
    pub fn from_optional_json(json: Option<&str>) -> Result<Self> {
        match json.map(str::trim) {
            Some(json) if !json.is_empty() => Self::from_json(json),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let copy = &self.copy_button;
        if !copy.tag.contains('-') {
            return Err(invalid(format!(
                "custom element tag `{}` must contain a hyphen",
                copy.tag
            )));
        }
        if copy.content_attribute.trim().is_empty() {
            return Err(invalid("copy button content attribute is empty"));
        }
        if copy.icon_size == 0 {
            return Err(invalid("icon size must be positive"));
        }
        if self.code_blocks.row_depth == 0 {
            return Err(invalid("code block row depth must be at least 1"));
        }
        if let Some(idx) = self
            .code_blocks
            .languages
            .iter()
            .position(|lang| lang.trim().is_empty())
        {
            return Err(invalid(format!("code block language #{idx} is blank")));
        }
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> DocTipsError {
    DocTipsError::ConfigInvalid(msg.into())
}
