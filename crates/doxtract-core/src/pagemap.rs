//! Page-number mapping from externally supplied page text snapshots.
//!
//! When the rasterization/PDF collaborator is available, each page of
//! the rendered document contributes a text snapshot. For every section
//! the mapper finds the first page whose snapshot fuzzily contains the
//! section title (falling back to a fingerprint of the section's
//! leading content) and records the match with its confidence. Scores
//! below the configured threshold produce no mapping at all; callers
//! must treat a missing mapping as "unknown page", never as page 1.
//!
//! The matcher is normalized Levenshtein similarity over a sliding
//! window of the page text; the threshold and fingerprint length are
//! configuration because the original system leaves them unspecified.

use crate::text::normalize_for_match;
use crate::tree::{NodeId, SectionTree};
use log::debug;
use serde::{Deserialize, Serialize};
use strsim::normalized_levenshtein;

/// One page's text snapshot from the rasterization collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    /// 1-based page index.
    pub page: u32,
    /// Extracted page text.
    pub text: String,
}

/// Tuning for fuzzy page matching.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageMapConfig {
    /// Minimum similarity (0.0-1.0) for a match to count.
    pub min_confidence: f64,
    /// Length, in characters, of the leading-content fingerprint used
    /// when the title alone does not reach the threshold.
    pub fingerprint_len: usize,
}

impl Default for PageMapConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.65,
            fingerprint_len: 80,
        }
    }
}

impl PageMapConfig {
    /// Validate threshold bounds.
    ///
    /// # Errors
    /// Returns a configuration error when the threshold is outside 0-1.
    pub fn validate(&self) -> crate::Result<()> {
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(crate::DoxtractError::Configuration(format!(
                "min_confidence must be within 0.0-1.0, got {}",
                self.min_confidence
            )));
        }
        Ok(())
    }
}

/// A section's first-appearance page with match confidence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageMapping {
    /// The mapped section.
    pub node: NodeId,
    /// 1-based first-appearance page index.
    pub page: u32,
    /// Similarity score of the winning match.
    pub confidence: f64,
}

/// Map every section to the first page containing its content.
///
/// Pages are scanned in ascending order and the first page reaching the
/// confidence threshold wins, which makes ties break toward the
/// earliest page. Sections whose best score stays below the threshold
/// are simply absent from the output.
#[must_use]
pub fn map_sections(
    tree: &SectionTree,
    pages: &[PageText],
    config: &PageMapConfig,
) -> Vec<PageMapping> {
    if pages.is_empty() {
        return Vec::new();
    }

    let normalized_pages: Vec<(u32, Vec<char>)> = pages
        .iter()
        .map(|p| (p.page, normalize_for_match(&p.text).chars().collect()))
        .collect();

    let mut mappings = Vec::new();
    for id in tree.preorder() {
        if id == tree.root() {
            continue;
        }
        let node = tree.get(id);

        let title = normalize_for_match(&node.display_title());
        let fingerprint = leading_fingerprint(&node.own_text(), config.fingerprint_len);

        let mut found = None;
        for (page, page_chars) in &normalized_pages {
            let mut score = best_window_score(&title, page_chars);
            if score < config.min_confidence {
                if let Some(fp) = &fingerprint {
                    score = score.max(best_window_score(fp, page_chars));
                }
            }
            if score >= config.min_confidence {
                found = Some(PageMapping {
                    node: id,
                    page: *page,
                    confidence: score,
                });
                break;
            }
        }

        match found {
            Some(mapping) => mappings.push(mapping),
            None => debug!(
                "no page mapping for section {:?} (below confidence threshold)",
                node.title
            ),
        }
    }
    mappings
}

/// Normalized fingerprint of a section's leading content.
fn leading_fingerprint(own_text: &str, len: usize) -> Option<String> {
    let normalized = normalize_for_match(own_text);
    if normalized.is_empty() || len == 0 {
        return None;
    }
    Some(normalized.chars().take(len).collect())
}

/// Best normalized-Levenshtein score of `needle` against any
/// needle-sized window of `hay`.
///
/// The window advances half a needle at a time; adjacent windows
/// overlap enough that the best alignment cannot fall between steps by
/// more than a few characters, which the fuzzy score absorbs.
fn best_window_score(needle: &str, hay: &[char]) -> f64 {
    if needle.is_empty() {
        return 0.0;
    }
    let needle_len = needle.chars().count();
    if hay.len() <= needle_len {
        let hay_str: String = hay.iter().collect();
        return normalized_levenshtein(needle, &hay_str);
    }

    let step = (needle_len / 2).max(1);
    let mut best: f64 = 0.0;
    let mut start = 0;
    while start + needle_len <= hay.len() {
        let window: String = hay[start..start + needle_len].iter().collect();
        best = best.max(normalized_levenshtein(needle, &window));
        if best >= 0.999 {
            break;
        }
        start += step;
    }
    // Tail window so the end of the page is always covered.
    let tail: String = hay[hay.len() - needle_len..].iter().collect();
    best.max(normalized_levenshtein(needle, &tail))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ClassifierOptions;
    use crate::element::Element;
    use crate::hierarchy::build_hierarchy;

    fn tree_with(titles: &[(u8, &str)]) -> SectionTree {
        let elements: Vec<Element> = titles
            .iter()
            .enumerate()
            .map(|(i, (level, title))| Element::heading(i, *level, *title))
            .collect();
        build_hierarchy(&elements, &ClassifierOptions::default()).tree
    }

    fn pages(texts: &[&str]) -> Vec<PageText> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| PageText {
                page: (i + 1) as u32,
                text: (*t).to_string(),
            })
            .collect()
    }

    #[test]
    fn test_exact_title_maps_to_first_page() {
        let tree = tree_with(&[(1, "Introduction"), (1, "Methods")]);
        let pages = pages(&[
            "1 Introduction\nsome preamble text",
            "2 Methods\nprocedure details",
        ]);
        let mappings = map_sections(&tree, &pages, &PageMapConfig::default());
        assert_eq!(mappings.len(), 2);
        assert_eq!(mappings[0].page, 1);
        assert_eq!(mappings[1].page, 2);
        assert!(mappings[0].confidence >= 0.65);
    }

    #[test]
    fn test_repeated_title_breaks_tie_to_earliest_page() {
        let tree = tree_with(&[(1, "Summary")]);
        let pages = pages(&["1 Summary here", "Summary again later"]);
        let mappings = map_sections(&tree, &pages, &PageMapConfig::default());
        assert_eq!(mappings.len(), 1);
        assert_eq!(mappings[0].page, 1);
    }

    #[test]
    fn test_below_threshold_yields_no_mapping() {
        let tree = tree_with(&[(1, "Quarterly Financial Projections")]);
        let pages = pages(&["completely unrelated text about gardening"]);
        let mappings = map_sections(&tree, &pages, &PageMapConfig::default());
        assert!(mappings.is_empty());
    }

    #[test]
    fn test_fuzzy_match_tolerates_ocr_noise() {
        let tree = tree_with(&[(1, "Implementation Details")]);
        // One substituted character, as a lossy rasterization would produce
        let pages = pages(&["3 Implementatlon Details\nbody text"]);
        let mappings = map_sections(&tree, &pages, &PageMapConfig::default());
        assert_eq!(mappings.len(), 1);
        assert!(mappings[0].confidence < 1.0);
    }

    #[test]
    fn test_no_pages_no_mappings() {
        let tree = tree_with(&[(1, "Intro")]);
        let mappings = map_sections(&tree, &[], &PageMapConfig::default());
        assert!(mappings.is_empty());
    }

    #[test]
    fn test_config_validation() {
        assert!(PageMapConfig::default().validate().is_ok());
        let bad = PageMapConfig {
            min_confidence: 1.5,
            ..PageMapConfig::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_strict_threshold_rejects_near_miss() {
        let tree = tree_with(&[(1, "Results")]);
        let pages = pages(&["Resu1ts discussion"]);
        let strict = PageMapConfig {
            min_confidence: 0.999,
            ..PageMapConfig::default()
        };
        assert!(map_sections(&tree, &pages, &strict).is_empty());
    }
}
