//! Markdown serialization.
//!
//! Walks the section tree in pre-order and renders headings, body
//! text, tables and image references as a single markdown document.
//! Table columns are padded to a common display width; widths are
//! measured with `unicode-width` so CJK and other double-width text
//! aligns correctly.

use crate::document::ProcessedDocument;
use crate::tree::ContentItem;
use unicode_width::UnicodeWidthStr;

/// Options for markdown serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkdownOptions {
    /// Emit a "Table of Contents" block before the body.
    pub include_toc: bool,
    /// Append mapped page numbers to TOC lines when available.
    pub include_page_numbers: bool,
    /// Append an "Endnotes" block after the body.
    pub include_endnotes: bool,
}

impl Default for MarkdownOptions {
    #[inline]
    fn default() -> Self {
        Self {
            include_toc: true,
            include_page_numbers: true,
            include_endnotes: true,
        }
    }
}

/// Markdown serializer for processing results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MarkdownSerializer {
    options: MarkdownOptions,
}

impl MarkdownSerializer {
    /// Serializer with default options.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializer with custom options.
    #[inline]
    #[must_use]
    pub const fn with_options(options: MarkdownOptions) -> Self {
        Self { options }
    }

    /// Render a processed document as markdown.
    #[must_use]
    pub fn serialize(&self, doc: &ProcessedDocument) -> String {
        let mut out = String::new();

        if let Some(title) = &doc.metadata.title {
            out.push_str("# ");
            out.push_str(title);
            out.push_str("\n\n");
        }

        if self.options.include_toc && !doc.toc.is_empty() {
            out.push_str("## Table of Contents\n\n");
            for entry in &doc.toc {
                let indent = "    ".repeat((entry.level as usize).saturating_sub(1));
                out.push_str(&indent);
                out.push_str("- ");
                if let Some(number) = &entry.number {
                    out.push_str(number);
                    out.push(' ');
                }
                out.push_str(&entry.title);
                if self.options.include_page_numbers {
                    if let Some(page) = entry.page {
                        out.push_str(&format!(" (p. {page})"));
                    }
                }
                out.push('\n');
            }
            out.push('\n');
        }

        for id in doc.tree.preorder() {
            let node = doc.tree.get(id);
            if id != doc.tree.root() {
                let hashes = "#".repeat((node.level as usize).min(6));
                out.push_str(&hashes);
                out.push(' ');
                out.push_str(&node.display_title());
                out.push_str("\n\n");
            }
            for item in &node.content {
                match item {
                    ContentItem::Paragraph { text, .. } => {
                        out.push_str(text);
                        out.push_str("\n\n");
                    }
                    ContentItem::Table { table, .. } => {
                        if let Some(artifact) = doc.tables.get(*table) {
                            out.push_str(&grid_to_markdown(&artifact.grid));
                            out.push('\n');
                        }
                    }
                    ContentItem::Image { image, .. } => {
                        if let Some(artifact) = doc.images.get(*image) {
                            out.push_str(&format!(
                                "![{name}](images/{name})\n\n",
                                name = artifact.filename
                            ));
                        }
                    }
                    ContentItem::FootnoteRef { id, .. } => {
                        out.push_str(&format!("[^{id}]\n\n"));
                    }
                }
            }
        }

        if self.options.include_endnotes && !doc.endnotes.is_empty() {
            out.push_str("## Endnotes\n\n");
            for endnote in &doc.endnotes {
                out.push_str(&format!("[^{}]: {}\n", endnote.id, endnote.text));
            }
            out.push('\n');
        }

        out
    }
}

/// Render an expanded grid as a markdown pipe table with padded
/// columns. Empty grids render as nothing.
fn grid_to_markdown(grid: &[Vec<String>]) -> String {
    let Some(first) = grid.first() else {
        return String::new();
    };
    let num_cols = first.len();
    if num_cols == 0 {
        return String::new();
    }

    // Column width = widest cell, measured in display columns.
    let mut widths = vec![0usize; num_cols];
    for row in grid {
        for (i, cell) in row.iter().enumerate().take(num_cols) {
            widths[i] = widths[i].max(cell.width());
        }
    }

    let render_row = |row: &[String]| -> String {
        let mut line = String::from("|");
        for i in 0..num_cols {
            let cell = row.get(i).map_or("", String::as_str);
            let pad = widths[i].saturating_sub(cell.width());
            line.push(' ');
            line.push_str(&cell.replace('|', "\\|").replace('\n', " "));
            line.push_str(&" ".repeat(pad + 1));
            line.push('|');
        }
        line.push('\n');
        line
    };

    let mut out = render_row(first);
    out.push('|');
    for width in &widths {
        out.push_str(&"-".repeat(width + 2));
        out.push('|');
    }
    out.push('\n');
    for row in grid.iter().skip(1) {
        out.push_str(&render_row(row));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ClassifierOptions;
    use crate::document::{CapabilitySet, DocumentMetadata, Endnote};
    use crate::element::{Element, RawCell};
    use crate::hierarchy::build_hierarchy;
    use crate::toc::derive_toc;

    fn sample() -> ProcessedDocument {
        let elements = vec![
            Element::heading(0, 1, "Intro"),
            Element::paragraph(1, "Some text.", Default::default()),
            Element::table(
                2,
                vec![
                    vec![RawCell::new("Name".into()), RawCell::new("Value".into())],
                    vec![RawCell::new("a".into()), RawCell::new("1".into())],
                ],
            ),
        ];
        let built = build_hierarchy(&elements, &ClassifierOptions::default());
        let toc = derive_toc(&built.tree);
        ProcessedDocument {
            tree: built.tree,
            toc,
            tables: built.tables,
            images: built.images,
            page_mappings: Vec::new(),
            headers_footers: Vec::new(),
            endnotes: vec![Endnote {
                id: "1".into(),
                text: "a note".into(),
            }],
            capabilities: CapabilitySet::default(),
            metadata: DocumentMetadata::default(),
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_headings_and_toc() {
        let md = MarkdownSerializer::new().serialize(&sample());
        assert!(md.contains("## Table of Contents"));
        assert!(md.contains("- 1 Intro"));
        assert!(md.contains("# 1 Intro"));
    }

    #[test]
    fn test_table_rendering() {
        let md = MarkdownSerializer::new().serialize(&sample());
        assert!(md.contains("| Name"));
        assert!(md.contains("|------"));
        assert!(md.contains("| a"));
    }

    #[test]
    fn test_endnotes_block() {
        let md = MarkdownSerializer::new().serialize(&sample());
        assert!(md.contains("## Endnotes"));
        assert!(md.contains("[^1]: a note"));
    }

    #[test]
    fn test_options_disable_blocks() {
        let serializer = MarkdownSerializer::with_options(MarkdownOptions {
            include_toc: false,
            include_page_numbers: false,
            include_endnotes: false,
        });
        let md = serializer.serialize(&sample());
        assert!(!md.contains("Table of Contents"));
        assert!(!md.contains("Endnotes"));
    }

    #[test]
    fn test_column_padding_aligns_pipes() {
        let grid = vec![
            vec!["long header".to_string(), "x".to_string()],
            vec!["a".to_string(), "b".to_string()],
        ];
        let md = grid_to_markdown(&grid);
        let lines: Vec<&str> = md.lines().collect();
        assert_eq!(lines.len(), 3);
        // All rows end at the same display width
        assert_eq!(lines[0].width(), lines[2].width());
    }
}
