//! Page text snapshots from a converted PDF.
//!
//! The page mapper only needs per-page text fingerprints, which lopdf
//! extracts without rendering. Full rasterization (page screenshots)
//! stays behind the [`PageSource`] trait for callers that bring their
//! own renderer.

use crate::traits::PageSource;
use doxtract_core::{DoxtractError, Result};
use log::debug;
use std::path::Path;

/// lopdf-backed page text source.
#[derive(Debug)]
pub struct PdfPageSource {
    document: lopdf::Document,
    page_count: usize,
}

impl PdfPageSource {
    /// Open a PDF from disk.
    ///
    /// # Errors
    /// Returns [`DoxtractError::Backend`] when the file cannot be
    /// parsed as a PDF.
    pub fn open(path: &Path) -> Result<Self> {
        let document = lopdf::Document::load(path)
            .map_err(|e| DoxtractError::Backend(format!("failed to load PDF: {e}")))?;
        let page_count = document.get_pages().len();
        debug!("opened PDF with {page_count} pages");
        Ok(Self {
            document,
            page_count,
        })
    }
}

impl PageSource for PdfPageSource {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn page_text(&self, page: u32) -> Result<String> {
        self.document
            .extract_text(&[page])
            .map_err(|e| DoxtractError::Backend(format!("failed to extract page {page}: {e}")))
    }
}
