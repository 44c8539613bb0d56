//! Stack-based section hierarchy construction.
//!
//! Consumes the classified element stream in original document order
//! and produces the [`SectionTree`] plus reconciled table and image
//! artifacts. The builder keeps a stack of open sections keyed by
//! level: a heading of level L pops until the top has level < L, then
//! opens a new child there. Non-heading elements attach to the current
//! top of stack, which is also how floating artifacts are reconciled
//! with the section that owns their anchor position.
//!
//! A heading jump (level 1 straight to level 3) nests under the nearest
//! open ancestor; no synthetic intermediate sections are invented. A
//! document with no headings at all yields a single root holding
//! everything, which is a valid result rather than an error.

use crate::artifact::{ImageArtifact, TableArtifact};
use crate::classify::{classify, ClassifierOptions, ElementClass};
use crate::element::{Element, ElementPayload};
use crate::text;
use crate::tree::{ContentItem, NodeId, SectionTree};
use log::{debug, warn};

/// Everything the single build pass produces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HierarchyResult {
    /// The section tree.
    pub tree: SectionTree,
    /// Extracted tables, in document order.
    pub tables: Vec<TableArtifact>,
    /// Extracted images, in document order.
    pub images: Vec<ImageArtifact>,
    /// Non-fatal problems encountered while building.
    pub warnings: Vec<String>,
}

/// Per-level heading counters for derived section numbering.
///
/// Numbering follows the usual outline convention: a level-L heading
/// increments the level-L counter and resets every deeper level, and
/// the number is the dot-joined path of non-zero counters.
#[derive(Debug, Clone, Default)]
struct NumberingCounters {
    counts: Vec<usize>,
}

impl NumberingCounters {
    fn next(&mut self, level: u8) -> String {
        let level = level as usize;
        if self.counts.len() < level {
            self.counts.resize(level, 0);
        }
        self.counts[level - 1] += 1;
        for deeper in self.counts.iter_mut().skip(level) {
            *deeper = 0;
        }
        self.counts[..level]
            .iter()
            .filter(|&&c| c > 0)
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Build the section tree from a classified element stream.
///
/// Elements must be in original document order; the builder never
/// reorders them. This is the whole-document entry point used by the
/// processing pipeline.
#[must_use]
pub fn build_hierarchy(elements: &[Element], options: &ClassifierOptions) -> HierarchyResult {
    let mut builder = HierarchyBuilder::new(options);
    for element in elements {
        builder.push(element);
    }
    builder.finish()
}

/// Incremental hierarchy builder.
///
/// [`build_hierarchy`] is the usual entry point; the incremental form
/// exists so a streaming reader can feed elements as it parses.
pub struct HierarchyBuilder<'a> {
    options: &'a ClassifierOptions,
    tree: SectionTree,
    /// Open sections, root at the bottom. Never empty.
    stack: Vec<NodeId>,
    counters: NumberingCounters,
    tables: Vec<TableArtifact>,
    images: Vec<ImageArtifact>,
    warnings: Vec<String>,
}

impl<'a> HierarchyBuilder<'a> {
    /// Create a builder with an empty tree.
    #[must_use]
    pub fn new(options: &'a ClassifierOptions) -> Self {
        let tree = SectionTree::new();
        let root = tree.root();
        Self {
            options,
            tree,
            stack: vec![root],
            counters: NumberingCounters::default(),
            tables: Vec::new(),
            images: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// The section currently receiving content.
    #[inline]
    fn current(&self) -> NodeId {
        *self.stack.last().expect("stack holds at least the root")
    }

    /// Consume one element.
    pub fn push(&mut self, element: &Element) {
        match classify(element, self.options) {
            ElementClass::Heading { level } => self.open_section(element, level),
            ElementClass::BodyText => self.attach_paragraph(element),
            ElementClass::Table => self.attach_table(element),
            ElementClass::ImageAnchor => self.attach_image(element),
            ElementClass::FootnoteRef => self.attach_footnote_ref(element),
        }
        self.extend_spans(element.seq);
    }

    /// Finish the build and return the result.
    #[must_use]
    pub fn finish(self) -> HierarchyResult {
        debug_assert!(self.tree.levels_are_monotonic());
        debug!(
            "built hierarchy: {} sections, {} tables, {} images",
            self.tree.section_count(),
            self.tables.len(),
            self.images.len()
        );
        HierarchyResult {
            tree: self.tree,
            tables: self.tables,
            images: self.images,
            warnings: self.warnings,
        }
    }

    fn open_section(&mut self, element: &Element, level: u8) {
        let raw_title = text::clean_string(element.text().unwrap_or_default());
        let number = self.counters.next(level);

        // Headings that carry their own numbering keep it; otherwise the
        // derived number is prepended for display.
        let title = if raw_title.is_empty() {
            "Orphaned Section".to_string()
        } else {
            raw_title
        };

        // Pop until the nearest open ancestor with a strictly smaller
        // level; a level jump nests there with no synthetic nodes.
        while self.stack.len() > 1 {
            let top = self.current();
            if self.tree.get(top).level < level {
                break;
            }
            self.stack.pop();
        }

        let parent = self.current();
        let id = self
            .tree
            .push_child(parent, title, Some(number), level, element.seq);
        self.stack.push(id);
    }

    fn attach_paragraph(&mut self, element: &Element) {
        let Some(raw) = element.text() else { return };
        let text = raw.trim();
        if text.is_empty() {
            return;
        }
        let current = self.current();
        self.tree.get_mut(current).content.push(ContentItem::Paragraph {
            seq: element.seq,
            text: text.to_string(),
        });
    }

    fn attach_table(&mut self, element: &Element) {
        let ElementPayload::Table { rows } = &element.payload else {
            return;
        };
        let owner = self.current();
        let (table, warning) = TableArtifact::from_rows(rows, owner, element.seq);
        if let Some(warning) = warning {
            warn!("{warning}");
            self.warnings.push(warning);
        }
        let index = self.tables.len();
        self.tables.push(table);
        self.tree.get_mut(owner).content.push(ContentItem::Table {
            seq: element.seq,
            table: index,
        });
    }

    fn attach_image(&mut self, element: &Element) {
        let ElementPayload::Image { data, format } = &element.payload else {
            return;
        };
        let owner = self.current();
        let index = self.images.len();
        self.images.push(ImageArtifact {
            data: data.clone(),
            format: format.clone(),
            width: None,
            height: None,
            owner,
            anchor: element.seq,
            filename: format!("image_{index}.{format}"),
        });
        self.tree.get_mut(owner).content.push(ContentItem::Image {
            seq: element.seq,
            image: index,
        });
    }

    fn attach_footnote_ref(&mut self, element: &Element) {
        let ElementPayload::FootnoteRef { id } = &element.payload else {
            return;
        };
        let current = self.current();
        self.tree
            .get_mut(current)
            .content
            .push(ContentItem::FootnoteRef {
                seq: element.seq,
                id: id.clone(),
            });
    }

    /// Every open section's span covers the element just consumed.
    fn extend_spans(&mut self, seq: usize) {
        for &id in &self.stack {
            let node = self.tree.get_mut(id);
            if node.last_seq < seq {
                node.last_seq = seq;
            }
        }
    }
}
