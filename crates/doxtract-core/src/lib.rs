//! # doxtract-core: hierarchical DOCX content extraction
//!
//! doxtract maps a flat DOCX body (paragraphs, tables, images,
//! footnote references) onto a nested section tree with a derived
//! table of contents, reconciled table/image artifacts, and, when an
//! external rasterization collaborator is available, per-section page
//! numbers.
//!
//! This crate holds the data model and the pure structural logic; it
//! knows nothing about ZIP archives, XML, or external processes. The
//! `doxtract-backend` crate supplies the DOCX reader and the optional
//! PDF collaborators and feeds this crate an ordered [`Element`]
//! stream.
//!
//! ## Quick Start
//!
//! ```rust
//! use doxtract_core::{build_hierarchy, derive_toc, ClassifierOptions, Element};
//!
//! let elements = vec![
//!     Element::heading(0, 1, "Intro"),
//!     Element::paragraph(1, "Preamble text.", Default::default()),
//!     Element::heading(2, 2, "Background"),
//! ];
//!
//! let result = build_hierarchy(&elements, &ClassifierOptions::default());
//! let toc = derive_toc(&result.tree);
//!
//! assert_eq!(result.tree.section_count(), 2);
//! assert_eq!(toc[0].title, "Intro");
//! ```
//!
//! ## Module Organization
//!
//! - [`element`] - The flat element stream readers produce
//! - [`classify`] - Semantic classification of body elements
//! - [`hierarchy`] - Stack-based section tree construction
//! - [`tree`] - The arena-backed section tree
//! - [`toc`] - Table-of-contents derivation
//! - [`artifact`] - Table and image artifacts
//! - [`pagemap`] - Fuzzy section→page mapping (enhanced mode)
//! - [`document`] - The read-only result surface
//! - [`serializer`] - JSON, YAML, and markdown export
//! - [`config`] - Processing configuration
//! - [`error`] - Error types and the crate [`Result`] alias

pub mod artifact;
pub mod classify;
pub mod config;
pub mod document;
pub mod element;
pub mod error;
pub mod hierarchy;
pub mod pagemap;
pub mod serializer;
pub mod text;
pub mod toc;
pub mod tree;

// Re-exports for convenience
pub use artifact::{ImageArtifact, TableArtifact};
pub use classify::{classify, ClassifierOptions, ElementClass, StylePrecedence};
pub use config::ProcessingConfig;
pub use document::{
    CapabilitySet, DocumentMetadata, Endnote, HeaderFooter, HeaderFooterKind,
    ProcessedDocument, ProcessingStats,
};
pub use element::{Element, ElementPayload, RawCell, StyleHint};
pub use error::{DoxtractError, Result};
pub use hierarchy::{build_hierarchy, HierarchyBuilder, HierarchyResult};
pub use pagemap::{map_sections, PageMapConfig, PageMapping, PageText};
pub use serializer::{JsonSerializer, MarkdownSerializer, YamlSerializer};
pub use toc::{apply_page_mappings, derive_toc, TocEntry};
pub use tree::{ContentItem, NodeId, SectionNode, SectionTree};
