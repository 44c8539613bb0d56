//! Extracted table and image artifacts.
//!
//! Tables arrive as raw rows with unresolved `gridSpan`/`vMerge`
//! markers and are expanded into a rectangular grid: horizontal spans
//! replicate the cell text across spanned columns, vertical merges
//! replicate the text of the merge-starting cell downward. Corrupt or
//! jagged structures degrade to a best-effort flattened grid instead of
//! failing the extraction.

use crate::element::RawCell;
use crate::tree::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An extracted table attached to a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableArtifact {
    /// Rectangular cell grid with merges resolved.
    pub grid: Vec<Vec<String>>,
    /// Row count of the expanded grid.
    pub num_rows: usize,
    /// Column count of the expanded grid.
    pub num_cols: usize,
    /// Rendered HTML markup preserving merged-cell content.
    pub html: String,
    /// The section owning this table.
    pub owner: NodeId,
    /// Original sequence index of the table element.
    pub anchor: usize,
    /// `true` when the source structure was irregular and the grid is a
    /// best-effort flattening.
    pub degraded: bool,
}

impl TableArtifact {
    /// Build an artifact from raw rows.
    ///
    /// Returns the artifact and, when the structure was irregular, a
    /// warning message describing the degradation.
    #[must_use]
    pub fn from_rows(rows: &[Vec<RawCell>], owner: NodeId, anchor: usize) -> (Self, Option<String>) {
        let (grid, degraded) = expand_grid(rows);
        let num_rows = grid.len();
        let num_cols = grid.first().map_or(0, Vec::len);
        let html = render_html(&grid);

        let warning = degraded.then(|| {
            format!("table at element {anchor} has an irregular structure; grid was flattened")
        });

        (
            Self {
                grid,
                num_rows,
                num_cols,
                html,
                owner,
                anchor,
                degraded,
            },
            warning,
        )
    }

    /// `true` for 1x1 tables, which many documents use as framing
    /// around a single block of text rather than as data.
    #[inline]
    #[must_use]
    pub fn is_single_cell(&self) -> bool {
        self.num_rows == 1 && self.num_cols == 1
    }
}

/// Expand raw rows into a rectangular grid, resolving spans.
///
/// Returns the grid and whether the input was irregular (rows spanning
/// different column counts).
fn expand_grid(rows: &[Vec<RawCell>]) -> (Vec<Vec<String>>, bool) {
    if rows.is_empty() {
        return (Vec::new(), false);
    }

    // Column count is the widest row after horizontal-span expansion.
    let widths: Vec<usize> = rows
        .iter()
        .map(|row| row.iter().map(|c| c.grid_span.max(1)).sum())
        .collect();
    let num_cols = widths.iter().copied().max().unwrap_or(0);
    let degraded = widths.iter().any(|&w| w != num_cols);

    let mut grid: Vec<Vec<String>> = vec![vec![String::new(); num_cols]; rows.len()];

    // Track vertical-merge "restart" cells so "continue" cells inherit
    // their content. Map: column index -> text.
    let mut v_merge_starts: HashMap<usize, String> = HashMap::new();

    for (row_idx, row) in rows.iter().enumerate() {
        let mut col_idx = 0;
        for cell in row {
            if col_idx >= num_cols {
                break;
            }

            let cell_text = match cell.v_merge {
                Some(true) => {
                    v_merge_starts.insert(col_idx, cell.text.clone());
                    cell.text.clone()
                }
                Some(false) => v_merge_starts.get(&col_idx).cloned().unwrap_or_default(),
                None => {
                    v_merge_starts.remove(&col_idx);
                    cell.text.clone()
                }
            };

            let span = cell.grid_span.max(1);
            for offset in 0..span {
                if col_idx + offset < num_cols {
                    grid[row_idx][col_idx + offset].clone_from(&cell_text);
                }
            }
            col_idx += span;
        }
    }

    (grid, degraded)
}

/// Render the expanded grid as HTML: first row as header cells, the
/// rest as body rows.
fn render_html(grid: &[Vec<String>]) -> String {
    let mut html =
        String::from("<table style='border-collapse: collapse; border: 1px solid black;'>");

    let mut rows = grid.iter();
    if let Some(header) = rows.next() {
        html.push_str("<thead><tr>");
        for cell in header {
            html.push_str("<th style='border: 1px solid black; padding: 5px;'><p>");
            html.push_str(&escape_html(cell));
            html.push_str("</p></th>");
        }
        html.push_str("</tr></thead>");
    }

    html.push_str("<tbody>");
    for row in rows {
        html.push_str("<tr>");
        for cell in row {
            html.push_str("<td style='border: 1px solid black; padding: 5px;'><p>");
            html.push_str(&escape_html(cell));
            html.push_str("</p></td>");
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");

    html
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// An extracted image attached to a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageArtifact {
    /// Binary payload.
    pub data: Vec<u8>,
    /// Format tag derived from the media extension ("png", "jpeg", ...).
    pub format: String,
    /// Pixel width, when the payload could be decoded.
    pub width: Option<u32>,
    /// Pixel height, when the payload could be decoded.
    pub height: Option<u32>,
    /// The section owning this image.
    pub owner: NodeId,
    /// Original sequence index of the image anchor.
    pub anchor: usize,
    /// Output filename, e.g. `image_0.png`.
    pub filename: String,
}

impl ImageArtifact {
    /// Payload size in bytes.
    #[inline]
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(text: &str) -> RawCell {
        RawCell::new(text.to_string())
    }

    fn spanned(text: &str, span: usize) -> RawCell {
        RawCell {
            text: text.to_string(),
            grid_span: span,
            v_merge: None,
        }
    }

    #[test]
    fn test_plain_grid() {
        let rows = vec![
            vec![cell("a"), cell("b")],
            vec![cell("c"), cell("d")],
        ];
        let (table, warning) = TableArtifact::from_rows(&rows, NodeId::ROOT, 5);
        assert!(warning.is_none());
        assert!(!table.degraded);
        assert_eq!(table.num_rows, 2);
        assert_eq!(table.num_cols, 2);
        assert_eq!(table.grid[1][1], "d");
        assert_eq!(table.anchor, 5);
    }

    #[test]
    fn test_horizontal_span_replicates_text() {
        let rows = vec![
            vec![spanned("merged", 2)],
            vec![cell("a"), cell("b")],
        ];
        let (table, warning) = TableArtifact::from_rows(&rows, NodeId::ROOT, 0);
        assert!(warning.is_none());
        assert_eq!(table.grid[0], vec!["merged", "merged"]);
        assert_eq!(table.grid[1], vec!["a", "b"]);
    }

    #[test]
    fn test_vertical_merge_replicates_downward() {
        let rows = vec![
            vec![
                RawCell {
                    text: "span".into(),
                    grid_span: 1,
                    v_merge: Some(true),
                },
                cell("r1"),
            ],
            vec![
                RawCell {
                    text: String::new(),
                    grid_span: 1,
                    v_merge: Some(false),
                },
                cell("r2"),
            ],
        ];
        let (table, _) = TableArtifact::from_rows(&rows, NodeId::ROOT, 0);
        assert_eq!(table.grid[0][0], "span");
        assert_eq!(table.grid[1][0], "span");
        assert_eq!(table.grid[1][1], "r2");
    }

    #[test]
    fn test_jagged_rows_degrade_with_warning() {
        let rows = vec![
            vec![cell("a"), cell("b"), cell("c")],
            vec![cell("only")],
        ];
        let (table, warning) = TableArtifact::from_rows(&rows, NodeId::ROOT, 9);
        assert!(table.degraded);
        let warning = warning.expect("degradation warning");
        assert!(warning.contains("element 9"));
        // Grid is still rectangular
        assert_eq!(table.num_cols, 3);
        assert_eq!(table.grid[1], vec!["only", "", ""]);
    }

    #[test]
    fn test_empty_table() {
        let (table, warning) = TableArtifact::from_rows(&[], NodeId::ROOT, 0);
        assert!(warning.is_none());
        assert_eq!(table.num_rows, 0);
        assert_eq!(table.num_cols, 0);
    }

    #[test]
    fn test_html_escapes_and_structure() {
        let rows = vec![
            vec![cell("Col <1>")],
            vec![cell("a & b")],
        ];
        let (table, _) = TableArtifact::from_rows(&rows, NodeId::ROOT, 0);
        assert!(table.html.contains("<thead>"));
        assert!(table.html.contains("Col &lt;1&gt;"));
        assert!(table.html.contains("a &amp; b"));
        assert!(table.html.ends_with("</tbody></table>"));
    }

    #[test]
    fn test_single_cell_detection() {
        let (table, _) = TableArtifact::from_rows(&[vec![cell("x")]], NodeId::ROOT, 0);
        assert!(table.is_single_cell());
    }
}
