//! The read-only result surface of a document-processing invocation.
//!
//! A [`ProcessedDocument`] bundles the section tree with everything
//! derived from it: the TOC, reconciled table and image artifacts,
//! optional page mappings, header/footer and endnote text, metadata,
//! and accumulated warnings. It is fully materialized in memory, owned
//! exclusively by the invocation that produced it, and serializable as
//! a nested structure for downstream export.

use crate::artifact::{ImageArtifact, TableArtifact};
use crate::pagemap::PageMapping;
use crate::toc::TocEntry;
use crate::tree::SectionTree;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which optional collaborators were available for this invocation.
///
/// Capability absence is data, not an error: a result produced without
/// the PDF collaborator is complete except for page mappings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySet {
    /// An office-suite binary capable of DOCX→PDF conversion was found.
    pub pdf_conversion: bool,
    /// Page text snapshots could be produced (implies `pdf_conversion`).
    pub page_rendering: bool,
}

/// Document metadata gathered while reading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Document title (from document properties, or the file stem).
    pub title: Option<String>,
    /// Author from document properties.
    pub author: Option<String>,
    /// Creation timestamp from document properties.
    pub created: Option<DateTime<Utc>>,
    /// Last-modified timestamp from document properties.
    pub modified: Option<DateTime<Utc>>,
    /// Source file size in bytes, when read from disk.
    pub file_size_bytes: Option<u64>,
    /// Number of body elements enumerated by the reader.
    pub num_elements: usize,
    /// Page count of the rendered document (enhanced mode only).
    pub total_pages: Option<u32>,
    /// Wall-clock processing time.
    pub processing_time_seconds: Option<f64>,
}

/// Header or footer origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderFooterKind {
    /// Page header part.
    Header,
    /// Page footer part.
    Footer,
}

/// Text of one header or footer part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderFooter {
    /// Header or footer.
    pub kind: HeaderFooterKind,
    /// Concatenated part text.
    pub text: String,
}

/// One endnote, keyed by its document-internal id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endnote {
    /// Reference id matching `ContentItem::FootnoteRef`.
    pub id: String,
    /// Endnote text.
    pub text: String,
}

/// Aggregate counts over a processing result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingStats {
    /// Sections excluding the root.
    pub total_sections: usize,
    /// Extracted images.
    pub total_images: usize,
    /// Extracted tables.
    pub total_tables: usize,
    /// Rendered pages (enhanced mode only).
    pub total_pages: Option<u32>,
}

/// The complete result of processing one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedDocument {
    /// The section hierarchy.
    pub tree: SectionTree,
    /// Derived table of contents (pre-order).
    pub toc: Vec<TocEntry>,
    /// Extracted tables in document order.
    pub tables: Vec<TableArtifact>,
    /// Extracted images in document order.
    pub images: Vec<ImageArtifact>,
    /// Section→page mappings; empty when the collaborator is absent.
    pub page_mappings: Vec<PageMapping>,
    /// Header and footer text, when requested.
    pub headers_footers: Vec<HeaderFooter>,
    /// Endnotes keyed by id.
    pub endnotes: Vec<Endnote>,
    /// Collaborator availability for this invocation.
    pub capabilities: CapabilitySet,
    /// Document metadata.
    pub metadata: DocumentMetadata,
    /// Non-fatal problems encountered during processing.
    pub warnings: Vec<String>,
}

impl ProcessedDocument {
    /// Aggregate counts for display.
    #[must_use]
    pub fn stats(&self) -> ProcessingStats {
        ProcessingStats {
            total_sections: self.tree.section_count(),
            total_images: self.images.len(),
            total_tables: self.tables.len(),
            total_pages: self.metadata.total_pages,
        }
    }

    /// Map of display title → aggregated section text (children folded
    /// into ancestors).
    #[must_use]
    pub fn content(&self) -> BTreeMap<String, String> {
        self.tree
            .iter()
            .filter(|&(id, _)| id != self.tree.root())
            .map(|(id, node)| (node.display_title(), self.tree.aggregated_text(id)))
            .collect()
    }

    /// Map of display title → the section's own text only.
    #[must_use]
    pub fn content_without_children(&self) -> BTreeMap<String, String> {
        self.tree
            .iter()
            .filter(|&(id, _)| id != self.tree.root())
            .map(|(_, node)| (node.display_title(), node.own_text()))
            .collect()
    }
}
