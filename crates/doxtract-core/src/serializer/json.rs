//! JSON serialization.
//!
//! [`crate::ProcessedDocument`] already implements `Serialize`; this is
//! a convenience wrapper with formatting options.

use crate::document::ProcessedDocument;
use crate::Result;

/// Options for JSON serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JsonOptions {
    /// Pretty-print with indentation (default: true).
    pub pretty: bool,
}

impl Default for JsonOptions {
    #[inline]
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// JSON serializer for processing results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct JsonSerializer {
    options: JsonOptions,
}

impl JsonSerializer {
    /// Serializer with default options (pretty-printed).
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializer with custom options.
    #[inline]
    #[must_use]
    pub const fn with_options(options: JsonOptions) -> Self {
        Self { options }
    }

    /// Serialize a processed document to JSON.
    ///
    /// # Errors
    /// Returns an error when serialization fails.
    pub fn serialize(&self, doc: &ProcessedDocument) -> Result<String> {
        let out = if self.options.pretty {
            serde_json::to_string_pretty(doc)?
        } else {
            serde_json::to_string(doc)?
        };
        Ok(out)
    }
}
