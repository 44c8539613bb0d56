//! Processing configuration.

use crate::classify::ClassifierOptions;
use crate::pagemap::PageMapConfig;
use crate::{DoxtractError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for one document-processing invocation.
///
/// All fields have working defaults; `ProcessingConfig::default()`
/// extracts everything into memory and writes nothing to disk.
///
/// # Examples
///
/// ```rust
/// use doxtract_core::ProcessingConfig;
///
/// let config = ProcessingConfig {
///     extract_page_numbers: true,
///     ..ProcessingConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Directory extracted artifacts are written to. `None` keeps the
    /// result purely in memory.
    pub output_dir: Option<PathBuf>,

    /// Write extracted images under `images/`.
    pub save_images: bool,
    /// Write extracted tables under `tables/`.
    pub save_tables: bool,
    /// Write content JSON files.
    pub save_content: bool,

    /// Derive the table of contents.
    pub extract_toc: bool,
    /// Read header/footer parts from the document.
    pub include_headers_footers: bool,
    /// Skip images whose payload exceeds this many megabytes (1-100).
    pub max_image_size_mb: u32,

    /// Map sections to page numbers (needs the PDF-conversion
    /// collaborator; silently degraded when absent).
    pub extract_page_numbers: bool,
    /// Keep the converted PDF in the output directory.
    pub convert_to_pdf: bool,
    /// Limit how many page snapshots the mapper consumes.
    pub max_pages: Option<u32>,

    /// Paragraph classification tuning.
    pub classifier: ClassifierOptions,
    /// Fuzzy page-matching tuning.
    pub page_map: PageMapConfig,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            save_images: true,
            save_tables: true,
            save_content: true,
            extract_toc: true,
            include_headers_footers: true,
            max_image_size_mb: 10,
            extract_page_numbers: false,
            convert_to_pdf: false,
            max_pages: None,
            classifier: ClassifierOptions::default(),
            page_map: PageMapConfig::default(),
        }
    }
}

impl ProcessingConfig {
    /// Check the configuration before any document work starts.
    ///
    /// # Errors
    /// Returns [`DoxtractError::Configuration`] for out-of-range values.
    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.max_image_size_mb) {
            return Err(DoxtractError::Configuration(format!(
                "max_image_size_mb must be within 1-100, got {}",
                self.max_image_size_mb
            )));
        }
        if self.max_pages == Some(0) {
            return Err(DoxtractError::Configuration(
                "max_pages must be at least 1 when set".to_string(),
            ));
        }
        self.page_map.validate()
    }

    /// Image size cap in bytes.
    #[inline]
    #[must_use]
    pub const fn max_image_bytes(&self) -> usize {
        self.max_image_size_mb as usize * 1024 * 1024
    }

    /// `true` when any enhanced-mode feature is requested.
    #[inline]
    #[must_use]
    pub const fn wants_enhanced(&self) -> bool {
        self.extract_page_numbers || self.convert_to_pdf
    }
}
