//! Collaborator contracts.
//!
//! The core consumes two external capabilities: a document reader that
//! enumerates body elements in original order, and an optional page
//! source that supplies per-page text snapshots of the rendered
//! document. Both are traits so tests (and alternative formats) can
//! substitute their own implementations.

use chrono::{DateTime, Utc};
use doxtract_core::{Element, Endnote, HeaderFooter, PageText, ProcessingConfig, Result};
use std::path::Path;

/// Everything a reader pulls out of one document, pre-classification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawDocument {
    /// Ordered body elements with stable sequence indices.
    pub elements: Vec<Element>,
    /// Header/footer text, when requested.
    pub headers_footers: Vec<HeaderFooter>,
    /// Endnotes keyed by id.
    pub endnotes: Vec<Endnote>,
    /// Title from document properties.
    pub title: Option<String>,
    /// Author from document properties.
    pub author: Option<String>,
    /// Creation timestamp from document properties.
    pub created: Option<DateTime<Utc>>,
    /// Last-modified timestamp from document properties.
    pub modified: Option<DateTime<Utc>>,
    /// Non-fatal problems hit while reading (oversized images, ...).
    pub warnings: Vec<String>,
}

/// A source of ordered raw elements with style metadata.
///
/// Implementations must enumerate elements in original document order
/// with strictly increasing sequence indices; the hierarchy builder's
/// correctness depends on it. A document the reader cannot enumerate
/// at all is a fatal error for that document; no partial stream.
pub trait DocumentReader {
    /// Read a document from disk.
    ///
    /// # Errors
    /// Returns an error when the document cannot be opened or its body
    /// cannot be enumerated.
    fn read_file(&self, path: &Path, config: &ProcessingConfig) -> Result<RawDocument>;

    /// Read a document from an in-memory buffer.
    ///
    /// # Errors
    /// Same failure contract as [`DocumentReader::read_file`].
    fn read_bytes(&self, bytes: &[u8], config: &ProcessingConfig) -> Result<RawDocument>;
}

/// Per-page text snapshots of a rendered document.
///
/// This is the rasterization-side collaborator the page mapper
/// consumes. It is optional by design: absence degrades the page
/// mapper only, never the rest of the pipeline.
pub trait PageSource {
    /// Number of pages in the rendered document.
    fn page_count(&self) -> usize;

    /// Text snapshot of one 1-based page.
    ///
    /// # Errors
    /// Returns an error when the page cannot be read.
    fn page_text(&self, page: u32) -> Result<String>;

    /// Snapshots for all pages (optionally capped), in page order.
    ///
    /// # Errors
    /// Propagates the first per-page failure.
    fn snapshots(&self, max_pages: Option<u32>) -> Result<Vec<PageText>> {
        let count = self.page_count() as u32;
        let limit = max_pages.map_or(count, |m| m.min(count));
        (1..=limit)
            .map(|page| {
                Ok(PageText {
                    page,
                    text: self.page_text(page)?,
                })
            })
            .collect()
    }
}
