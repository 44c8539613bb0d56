//! The section tree.
//!
//! Nodes live in an arena (a flat `Vec`) and refer to each other by
//! [`NodeId`] indices, so parent back-references are plain indices
//! rather than owning pointers. The tree is built once per document
//! and never mutated incrementally afterwards.

use serde::{Deserialize, Serialize};

/// Index of a node in the [`SectionTree`] arena.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root node's id.
    pub const ROOT: Self = Self(0);
}

impl std::fmt::Display for NodeId {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One content item attached directly to a section.
///
/// Tables and images are stored once as artifacts on the extraction
/// result; the content list references them by artifact index so the
/// in-section ordering relative to paragraphs is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentItem {
    /// A body paragraph.
    Paragraph {
        /// Original sequence index.
        seq: usize,
        /// Paragraph text.
        text: String,
    },
    /// A table, by index into the result's table artifacts.
    Table {
        /// Original sequence index (the anchor position).
        seq: usize,
        /// Index into `ProcessedDocument::tables`.
        table: usize,
    },
    /// An image, by index into the result's image artifacts.
    Image {
        /// Original sequence index (the anchor position).
        seq: usize,
        /// Index into `ProcessedDocument::images`.
        image: usize,
    },
    /// A footnote/endnote reference marker.
    FootnoteRef {
        /// Original sequence index.
        seq: usize,
        /// Reference id from the source document.
        id: String,
    },
}

impl ContentItem {
    /// The original sequence index of this item.
    #[must_use]
    pub const fn seq(&self) -> usize {
        match self {
            Self::Paragraph { seq, .. }
            | Self::Table { seq, .. }
            | Self::Image { seq, .. }
            | Self::FootnoteRef { seq, .. } => *seq,
        }
    }
}

/// A node in the section hierarchy.
///
/// The root has level 0 and an empty title; it owns any preamble
/// content appearing before the first heading. Child levels are
/// strictly greater than their parent's level along every path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionNode {
    /// Section title (empty for the root).
    pub title: String,
    /// Derived section numbering such as "1.2.3", when applicable.
    pub number: Option<String>,
    /// Heading level; 0 for the root, 1-9 otherwise.
    pub level: u8,
    /// Parent node index (`None` only for the root).
    pub parent: Option<NodeId>,
    /// Child section indices in document order.
    pub children: Vec<NodeId>,
    /// Content attached directly to this section, in document order.
    pub content: Vec<ContentItem>,
    /// First sequence index covered by this section (its heading, or 0
    /// for the root).
    pub first_seq: usize,
    /// Last sequence index covered by this section or its subtree.
    pub last_seq: usize,
}

impl SectionNode {
    fn root() -> Self {
        Self {
            title: String::new(),
            number: None,
            level: 0,
            parent: None,
            children: Vec::new(),
            content: Vec::new(),
            first_seq: 0,
            last_seq: 0,
        }
    }

    /// Text of the paragraphs attached directly to this section.
    #[must_use]
    pub fn own_text(&self) -> String {
        let mut out = String::new();
        for item in &self.content {
            if let ContentItem::Paragraph { text, .. } = item {
                out.push_str(text);
                out.push('\n');
            }
        }
        out
    }

    /// Title with derived numbering prepended, e.g. "1.2 Background".
    #[must_use]
    pub fn display_title(&self) -> String {
        match &self.number {
            Some(number) if !crate::text::has_section_number(&self.title) => {
                format!("{number} {title}", title = self.title)
            }
            _ => self.title.clone(),
        }
    }
}

/// The arena-backed hierarchy tree. Index 0 is always the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionTree {
    nodes: Vec<SectionNode>,
}

impl Default for SectionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionTree {
    /// Create a tree holding only the root node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![SectionNode::root()],
        }
    }

    /// The root node id.
    #[inline]
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Number of nodes including the root.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` when the tree holds only the root.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Number of sections excluding the root.
    #[inline]
    #[must_use]
    pub fn section_count(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Borrow a node.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this tree. Ids are only ever
    /// produced by the tree itself, so an out-of-range id is a logic
    /// error, not a runtime condition.
    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &SectionNode {
        &self.nodes[id.0]
    }

    /// Mutably borrow a node. See [`SectionTree::get`] for panics.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut SectionNode {
        &mut self.nodes[id.0]
    }

    /// Append a new child section under `parent` and return its id.
    pub fn push_child(
        &mut self,
        parent: NodeId,
        title: String,
        number: Option<String>,
        level: u8,
        first_seq: usize,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(SectionNode {
            title,
            number,
            level,
            parent: Some(parent),
            children: Vec::new(),
            content: Vec::new(),
            first_seq,
            last_seq: first_seq,
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// All node ids in pre-order (root first, children in document
    /// order). Iterative to keep arbitrarily deep trees off the call
    /// stack.
    #[must_use]
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            out.push(id);
            // Push children reversed so the leftmost child pops first.
            for &child in self.get(id).children.iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// Pre-order ids of the subtree rooted at `id` (inclusive).
    #[must_use]
    pub fn preorder_from(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            out.push(id);
            for &child in self.get(id).children.iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// Iterate over `(id, node)` pairs in arena order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SectionNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId(i), node))
    }

    /// Section text including all descendant sections, pre-order, with
    /// child titles inlined; the "aggregated" view of a section.
    #[must_use]
    pub fn aggregated_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node_id in self.preorder_from(id) {
            let node = self.get(node_id);
            if node_id != id && !node.title.is_empty() {
                out.push_str(&node.display_title());
                out.push_str("\n\n");
            }
            out.push_str(&node.own_text());
        }
        out
    }

    /// Verify the level invariant: every child's level is strictly
    /// greater than its parent's. Used by tests and debug assertions.
    #[must_use]
    pub fn levels_are_monotonic(&self) -> bool {
        self.iter().all(|(_, node)| {
            node.children
                .iter()
                .all(|&child| self.get(child).level > node.level)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tree_has_only_root() {
        let tree = SectionTree::new();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.section_count(), 0);
        assert!(tree.is_empty());
        let root = tree.get(tree.root());
        assert_eq!(root.level, 0);
        assert!(root.title.is_empty());
        assert!(root.parent.is_none());
    }

    #[test]
    fn test_push_child_links_both_directions() {
        let mut tree = SectionTree::new();
        let a = tree.push_child(tree.root(), "A".into(), None, 1, 0);
        let b = tree.push_child(a, "B".into(), None, 2, 1);

        assert_eq!(tree.get(a).parent, Some(NodeId::ROOT));
        assert_eq!(tree.get(tree.root()).children, vec![a]);
        assert_eq!(tree.get(a).children, vec![b]);
        assert_eq!(tree.get(b).parent, Some(a));
    }

    #[test]
    fn test_preorder_is_document_order() {
        let mut tree = SectionTree::new();
        let a = tree.push_child(tree.root(), "A".into(), None, 1, 0);
        let a1 = tree.push_child(a, "A1".into(), None, 2, 1);
        let b = tree.push_child(tree.root(), "B".into(), None, 1, 2);

        assert_eq!(tree.preorder(), vec![NodeId::ROOT, a, a1, b]);
    }

    #[test]
    fn test_display_title_keeps_explicit_numbering() {
        let mut tree = SectionTree::new();
        let a = tree.push_child(
            tree.root(),
            "2.1 Already numbered".into(),
            Some("1.1".into()),
            2,
            0,
        );
        assert_eq!(tree.get(a).display_title(), "2.1 Already numbered");

        let b = tree.push_child(tree.root(), "Plain".into(), Some("2".into()), 1, 1);
        assert_eq!(tree.get(b).display_title(), "2 Plain");
    }

    #[test]
    fn test_aggregated_text_includes_descendants() {
        let mut tree = SectionTree::new();
        let a = tree.push_child(tree.root(), "A".into(), None, 1, 0);
        tree.get_mut(a).content.push(ContentItem::Paragraph {
            seq: 1,
            text: "alpha".into(),
        });
        let b = tree.push_child(a, "B".into(), None, 2, 2);
        tree.get_mut(b).content.push(ContentItem::Paragraph {
            seq: 3,
            text: "beta".into(),
        });

        let agg = tree.aggregated_text(a);
        assert!(agg.contains("alpha"));
        assert!(agg.contains("B\n\n"));
        assert!(agg.contains("beta"));
        // own_text stays local
        assert!(!tree.get(a).own_text().contains("beta"));
    }

    #[test]
    fn test_levels_are_monotonic() {
        let mut tree = SectionTree::new();
        let a = tree.push_child(tree.root(), "A".into(), None, 1, 0);
        tree.push_child(a, "B".into(), None, 3, 1);
        assert!(tree.levels_are_monotonic());
    }
}
