//! Element classification.
//!
//! Assigns each flat body element a semantic role: heading at some
//! level, body text, table, image anchor, or footnote reference.
//! Classification is a pure function of the element and the options;
//! it has no side effects and never fails: unrecognized paragraph
//! styles default to body text.

use crate::element::{Element, ElementPayload};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Matches "Heading 2" / "Heading2" style names (prefix checked separately).
static STYLE_DIGITS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)").expect("valid regex"));

/// Semantic role of a classified element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementClass {
    /// A section heading at the given 1-based level.
    Heading {
        /// Normalized heading level, clamped to `1..=max_heading_level`.
        level: u8,
    },
    /// Plain body text.
    BodyText,
    /// A table.
    Table,
    /// An anchored image.
    ImageAnchor,
    /// A footnote/endnote reference marker.
    FootnoteRef,
}

/// Which signal wins when a style name and an outline-level hint disagree.
///
/// The source documentation leaves this unspecified, so it is a
/// configuration parameter rather than a hardcoded rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StylePrecedence {
    /// Style names literally matching a heading prefix win; the outline
    /// level is a fallback for non-standard corporate styles (default).
    #[default]
    StyleNameFirst,
    /// The outline level declared in the style definitions wins; style
    /// names are the fallback.
    OutlineLevelFirst,
}

/// Options controlling paragraph classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierOptions {
    /// Precedence between style-name heuristics and outline-level hints.
    pub precedence: StylePrecedence,
    /// Style-name prefixes recognized as headings (case-insensitive).
    pub heading_style_prefixes: Vec<String>,
    /// Upper clamp for heading levels (DOCX defines levels 1-9).
    pub max_heading_level: u8,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self {
            precedence: StylePrecedence::StyleNameFirst,
            heading_style_prefixes: vec!["Heading".to_string()],
            max_heading_level: 9,
        }
    }
}

impl ClassifierOptions {
    fn clamp_level(&self, level: u8) -> u8 {
        level.clamp(1, self.max_heading_level)
    }
}

/// Classify one element.
///
/// Non-paragraph payloads map directly to their role. Paragraphs are
/// headings when either the style name matches a heading prefix (with
/// a digit giving the level) or the style's outline level is set;
/// which signal is consulted first depends on
/// [`ClassifierOptions::precedence`]. Everything else is body text.
#[must_use]
pub fn classify(element: &Element, options: &ClassifierOptions) -> ElementClass {
    match &element.payload {
        ElementPayload::Table { .. } => ElementClass::Table,
        ElementPayload::Image { .. } => ElementClass::ImageAnchor,
        ElementPayload::FootnoteRef { .. } => ElementClass::FootnoteRef,
        ElementPayload::Paragraph { .. } => {
            let from_name = element
                .style
                .style_name
                .as_deref()
                .and_then(|name| heading_level_from_style_name(name, options));
            let from_outline = element.style.outline_level;

            let level = match options.precedence {
                StylePrecedence::StyleNameFirst => from_name.or(from_outline),
                StylePrecedence::OutlineLevelFirst => from_outline.or(from_name),
            };

            level.map_or(ElementClass::BodyText, |level| ElementClass::Heading {
                level: options.clamp_level(level),
            })
        }
    }
}

/// Extract a heading level from a style name like `Heading1` or
/// `heading 3`.
///
/// The name must start with one of the configured prefixes
/// (case-insensitive); the level is the first digit group anywhere in
/// the name. A matching prefix with no digits is treated as level 1,
/// which covers styles named just "Heading".
fn heading_level_from_style_name(name: &str, options: &ClassifierOptions) -> Option<u8> {
    let matches_prefix = options.heading_style_prefixes.iter().any(|prefix| {
        name.get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    });
    if !matches_prefix {
        return None;
    }

    STYLE_DIGITS_RE
        .captures(name)
        .and_then(|c| c[1].parse::<u8>().ok())
        .or(Some(1))
}
