//! Template data structures.

use crate::constants::MAX_TEMPLATE_NAME_LEN;
use crate::error::{EngineError, EngineResult};
use crate::models::BindingMap;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// File stems Windows reserves for devices, with or without an extension.
const RESERVED_STEMS: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Validated template name.
///
/// # Validation
///
/// - surrounding whitespace is trimmed; the rest must be non-empty
/// - max 100 characters
/// - none of `/ \ : * ? " < > |` and no control characters
/// - must not start or end with `.`
/// - not a reserved device name (`CON`, `NUL`, `COM1`, ...)
///
/// Names are safe to use verbatim as file stems on every platform. Names
/// differing only in case still share a file on case-insensitive filesystems.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TemplateName(String);

impl TemplateName {
    /// Validates and wraps a template name.
    pub fn new(name: impl AsRef<str>) -> EngineResult<Self> {
        let raw = name.as_ref();
        let name = raw.trim();

        let reject = |reason: &str| EngineError::InvalidName {
            name: raw.to_string(),
            reason: reason.to_string(),
        };

        if name.is_empty() {
            return Err(reject("name cannot be empty"));
        }
        if name.chars().count() > MAX_TEMPLATE_NAME_LEN {
            return Err(reject("name exceeds maximum length of 100 characters"));
        }
        if name.starts_with('.') {
            return Err(reject("name cannot start with '.'"));
        }
        if name.ends_with('.') {
            return Err(reject("name cannot end with '.'"));
        }
        if name.chars().any(|c| {
            matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') || c.is_control()
        }) {
            return Err(reject(
                "name cannot contain / \\ : * ? \" < > | or control characters",
            ));
        }
        let stem = name.split('.').next().unwrap_or(name).trim_end();
        if RESERVED_STEMS
            .iter()
            .any(|reserved| stem.eq_ignore_ascii_case(reserved))
        {
            return Err(reject("name is reserved by the operating system"));
        }

        Ok(Self(name.to_string()))
    }

    /// The name as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TemplateName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Named snapshot of bindings. Replaced wholesale on save-over, never edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// Unique name within the repository
    pub name: TemplateName,
    /// Bindings captured at save time
    pub bindings: BindingMap,
    /// Keyboard layout the bindings were made for (e.g. "100%")
    pub layout_tag: String,
    /// When the template was saved
    pub created_at: DateTime<Utc>,
}

impl Template {
    /// Summary row for listings.
    pub fn summary(&self) -> TemplateSummary {
        TemplateSummary {
            name: self.name.to_string(),
            created_at: self.created_at,
            layout_tag: self.layout_tag.clone(),
            binding_count: self.bindings.len(),
        }
    }
}

/// Listing entry for a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateSummary {
    /// Template name
    pub name: String,
    /// Creation timestamp
    #[serde(rename = "created")]
    pub created_at: DateTime<Utc>,
    /// Layout tag
    #[serde(rename = "layout")]
    pub layout_tag: String,
    /// Number of bound keys
    pub binding_count: usize,
}
