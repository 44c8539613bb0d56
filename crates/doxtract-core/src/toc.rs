//! Table-of-contents derivation.
//!
//! The TOC is derived from the built tree, not from any TOC field the
//! source document may embed, so it always reflects the actual heading
//! structure. Derivation is a pure pre-order walk: re-running it on the
//! same tree yields an identical sequence.

use crate::pagemap::PageMapping;
use crate::tree::{NodeId, SectionTree};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One derived, read-only table-of-contents line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Section title (without derived numbering).
    pub title: String,
    /// Derived numbering such as "1.2", when present on the node.
    pub number: Option<String>,
    /// Heading level (1-9).
    pub level: u8,
    /// The section this entry summarizes.
    pub node: NodeId,
    /// First-appearance page, filled in by the page mapper when the
    /// rasterization collaborator is available.
    pub page: Option<u32>,
}

/// Derive the TOC: one entry per non-root section, in pre-order.
#[must_use]
pub fn derive_toc(tree: &SectionTree) -> Vec<TocEntry> {
    tree.preorder()
        .into_iter()
        .filter(|&id| id != tree.root())
        .map(|id| {
            let node = tree.get(id);
            TocEntry {
                title: node.title.clone(),
                number: node.number.clone(),
                level: node.level,
                node: id,
                page: None,
            }
        })
        .collect()
}

/// Annotate TOC entries with first-appearance pages from the mapper's
/// output. Entries without a mapping keep `page: None` ("unknown
/// page"), never a guessed page 1.
pub fn apply_page_mappings(toc: &mut [TocEntry], mappings: &[PageMapping]) {
    let by_node: HashMap<NodeId, u32> = mappings.iter().map(|m| (m.node, m.page)).collect();
    for entry in toc {
        entry.page = by_node.get(&entry.node).copied();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ClassifierOptions;
    use crate::element::Element;
    use crate::hierarchy::build_hierarchy;

    fn sample_tree() -> SectionTree {
        let elements = vec![
            Element::heading(0, 1, "Intro"),
            Element::heading(1, 2, "Background"),
            Element::heading(2, 1, "Methods"),
        ];
        build_hierarchy(&elements, &ClassifierOptions::default()).tree
    }

    #[test]
    fn test_toc_matches_preorder() {
        let tree = sample_tree();
        let toc = derive_toc(&tree);

        let preorder_titles: Vec<_> = tree
            .preorder()
            .into_iter()
            .filter(|&id| id != tree.root())
            .map(|id| tree.get(id).title.clone())
            .collect();
        let toc_titles: Vec<_> = toc.iter().map(|e| e.title.clone()).collect();
        assert_eq!(toc_titles, preorder_titles);
        assert_eq!(toc_titles, vec!["Intro", "Background", "Methods"]);
    }

    #[test]
    fn test_toc_levels_and_numbers() {
        let toc = derive_toc(&sample_tree());
        assert_eq!(toc[0].level, 1);
        assert_eq!(toc[1].level, 2);
        assert_eq!(toc[1].number.as_deref(), Some("1.1"));
        assert_eq!(toc[2].number.as_deref(), Some("2"));
    }

    #[test]
    fn test_toc_is_idempotent() {
        let tree = sample_tree();
        assert_eq!(derive_toc(&tree), derive_toc(&tree));
    }

    #[test]
    fn test_empty_tree_has_empty_toc() {
        let tree = SectionTree::new();
        assert!(derive_toc(&tree).is_empty());
    }

    #[test]
    fn test_apply_page_mappings_leaves_unmapped_unknown() {
        let tree = sample_tree();
        let mut toc = derive_toc(&tree);
        let mappings = vec![PageMapping {
            node: toc[0].node,
            page: 3,
            confidence: 0.9,
        }];
        apply_page_mappings(&mut toc, &mappings);
        assert_eq!(toc[0].page, Some(3));
        assert_eq!(toc[1].page, None);
        assert_eq!(toc[2].page, None);
    }
}
