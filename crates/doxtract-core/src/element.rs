//! The flat element stream a document reader produces.
//!
//! A DOCX body is a loosely structured sequence of paragraphs, tables
//! and anchored drawings. The reader flattens it into ordered
//! [`Element`]s with stable sequence indices; everything downstream
//! (classification, hierarchy building, artifact reconciliation) works
//! on this stream and never on reader-specific types.

use serde::{Deserialize, Serialize};

/// Raw style information attached to a body element.
///
/// `style_name` is the style identifier as written in the document
/// (e.g. `Heading1`, or a corporate variant like `CorpTitle2`).
/// `outline_level` is the 1-based heading level resolved from the
/// document's style definitions, when the style declares one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleHint {
    /// Style identifier from the source document, if any.
    pub style_name: Option<String>,
    /// 1-based outline level declared by the style definition, if any.
    pub outline_level: Option<u8>,
}

impl StyleHint {
    /// Hint with neither a style name nor an outline level ("body").
    #[must_use]
    pub const fn none() -> Self {
        Self {
            style_name: None,
            outline_level: None,
        }
    }
}

/// One raw table cell as read from the document, spans unresolved.
///
/// `grid_span` is the horizontal span (default 1). `v_merge` mirrors
/// the DOCX vertical-merge marker: `Some(true)` starts a merge,
/// `Some(false)` continues one, `None` means no merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCell {
    /// Concatenated cell text.
    pub text: String,
    /// Horizontal span in grid columns.
    pub grid_span: usize,
    /// Vertical merge state: start, continue, or none.
    pub v_merge: Option<bool>,
}

impl RawCell {
    /// A plain unmerged cell.
    #[must_use]
    pub const fn new(text: String) -> Self {
        Self {
            text,
            grid_span: 1,
            v_merge: None,
        }
    }
}

/// The payload of one atomic body element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementPayload {
    /// A paragraph of text (may be a heading; classification decides).
    Paragraph {
        /// Paragraph text with runs concatenated.
        text: String,
    },
    /// A table with raw, merge-unresolved rows.
    Table {
        /// Rows of raw cells in document order.
        rows: Vec<Vec<RawCell>>,
    },
    /// An anchored image.
    Image {
        /// Binary payload.
        data: Vec<u8>,
        /// Format tag derived from the media file extension ("png", "jpeg", ...).
        format: String,
    },
    /// A footnote or endnote reference marker.
    FootnoteRef {
        /// Reference identifier from the source document.
        id: String,
    },
}

/// One atomic unit from the document body, immutable once read.
///
/// `seq` is the element's position in the original document order;
/// nesting correctness depends on the stream never being reordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Original sequence index, 0-based and strictly increasing.
    pub seq: usize,
    /// Raw style information (meaningful for paragraphs).
    pub style: StyleHint,
    /// The element content.
    pub payload: ElementPayload,
}

impl Element {
    /// Convenience constructor for a paragraph element.
    #[must_use]
    pub fn paragraph(seq: usize, text: impl Into<String>, style: StyleHint) -> Self {
        Self {
            seq,
            style,
            payload: ElementPayload::Paragraph { text: text.into() },
        }
    }

    /// Convenience constructor for a heading-styled paragraph.
    ///
    /// Used pervasively by tests; produces a paragraph whose style name
    /// is the standard `Heading{level}` identifier.
    #[must_use]
    pub fn heading(seq: usize, level: u8, text: impl Into<String>) -> Self {
        Self::paragraph(
            seq,
            text,
            StyleHint {
                style_name: Some(format!("Heading{level}")),
                outline_level: Some(level),
            },
        )
    }

    /// Convenience constructor for a table element.
    #[must_use]
    pub fn table(seq: usize, rows: Vec<Vec<RawCell>>) -> Self {
        Self {
            seq,
            style: StyleHint::none(),
            payload: ElementPayload::Table { rows },
        }
    }

    /// Convenience constructor for an image element.
    #[must_use]
    pub fn image(seq: usize, data: Vec<u8>, format: impl Into<String>) -> Self {
        Self {
            seq,
            style: StyleHint::none(),
            payload: ElementPayload::Image {
                data,
                format: format.into(),
            },
        }
    }

    /// The paragraph text, if this element is a paragraph.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.payload {
            ElementPayload::Paragraph { text } => Some(text),
            _ => None,
        }
    }
}
