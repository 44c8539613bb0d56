//! Error types for document extraction operations.
//!
//! This module defines the error types that can occur while reading a
//! document, building the section hierarchy, or writing outputs, and
//! provides the crate-wide [`Result`] alias.

use thiserror::Error;

/// Error types that can occur during document extraction.
///
/// Covers I/O failures, configuration problems, backend (reader)
/// failures, and serialization errors.
///
/// # Examples
///
/// ```rust
/// use doxtract_core::{DoxtractError, Result};
///
/// fn must_have_output(dir: Option<&str>) -> Result<&str> {
///     dir.ok_or_else(|| DoxtractError::Configuration("output dir required".to_string()))
/// }
///
/// assert!(must_have_output(None).is_err());
/// ```
#[derive(Error, Debug)]
pub enum DoxtractError {
    /// General processing error.
    ///
    /// A catch-all for extraction failures that don't fit a more
    /// specific category.
    #[error("Processing error: {0}")]
    Processing(String),

    /// Invalid configuration.
    ///
    /// Raised before any document work starts, e.g. an out-of-range
    /// image size cap or an invalid similarity threshold.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Backend-specific error.
    ///
    /// The document reader or an external collaborator (PDF converter,
    /// page-text source) failed in a way that is fatal for this
    /// document.
    #[error("Backend error: {0}")]
    Backend(String),

    /// A requested capability is not available in this environment.
    ///
    /// Distinct from [`DoxtractError::Backend`]: the collaborator is
    /// absent, not broken. Callers that only need the basic tree should
    /// never see this; the pipeline degrades instead of failing.
    #[error("Capability missing: {0}")]
    CapabilityMissing(String),

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Parser error from format-specific readers.
    #[error("Parser error: {0}")]
    Parser(#[from] anyhow::Error),
}

/// Type alias for [`Result<T, DoxtractError>`].
pub type Result<T> = std::result::Result<T, DoxtractError>;
