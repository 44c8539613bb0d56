//! Text normalization helpers shared by the classifier, the page
//! mapper, and the output writers.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches leading section numbering like "1.", "1.2" or "1.2.3. ".
static SECTION_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\d+(\.\d+)*\.?\s*").expect("valid regex"));

/// Matches a full section number for capture ("1.2.3" without trailing dot).
static SECTION_NUMBER_CAPTURE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d+(?:\.\d+)*)").expect("valid regex"));

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Collapse runs of whitespace to single spaces, drop non-breaking
/// spaces, and trim the result.
#[must_use]
pub fn clean_string(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let text = text.replace('\u{a0}', " ");
    WHITESPACE_RE.replace_all(&text, " ").trim().to_string()
}

/// Normalize all whitespace to single spaces.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Returns `true` when the text starts with section numbering such as
/// "3.1 Results".
#[must_use]
pub fn has_section_number(text: &str) -> bool {
    SECTION_NUMBER_CAPTURE_RE.is_match(text)
}

/// Remove leading section numbering ("1.2.3 Title" -> "Title").
///
/// Text that is nothing but a number is returned unchanged rather than
/// emptied.
#[must_use]
pub fn strip_section_number(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let cleaned = SECTION_NUMBER_RE.replace(text, "").trim().to_string();
    if cleaned.is_empty() {
        text.to_string()
    } else {
        cleaned
    }
}

/// Extract leading section numbering from text like "1.2.3 Title".
#[must_use]
pub fn extract_section_number(text: &str) -> Option<String> {
    SECTION_NUMBER_CAPTURE_RE
        .captures(text.trim())
        .map(|c| c[1].to_string())
}

/// Truncate text to `max_length` characters, appending `...` when cut.
#[must_use]
pub fn truncate_text(text: &str, max_length: usize) -> String {
    const SUFFIX: &str = "...";
    if text.chars().count() <= max_length {
        return text.to_string();
    }
    let keep = max_length.saturating_sub(SUFFIX.len());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(SUFFIX);
    out
}

/// Sanitize a string for filesystem use: invalid characters, whitespace
/// and dots become underscores.
#[must_use]
pub fn sanitize_filename(filename: &str) -> String {
    let mut out = String::with_capacity(filename.len());
    for c in filename.chars() {
        match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => out.push('_'),
            c if c.is_whitespace() || c == '.' => out.push('_'),
            c => out.push(c),
        }
    }
    let out = out.trim_matches('_').to_string();
    if out.is_empty() {
        "unnamed".to_string()
    } else {
        out
    }
}

/// Lowercase, drop punctuation, and collapse whitespace.
///
/// This is the canonical form both sides of a fuzzy page comparison are
/// reduced to before scoring, so punctuation and casing differences
/// between the DOCX text and the rasterized page text do not affect the
/// similarity score.
#[must_use]
pub fn normalize_for_match(text: &str) -> String {
    let filtered: String = text
        .chars()
        .flat_map(|c| {
            if c.is_alphanumeric() {
                c.to_lowercase().collect::<Vec<_>>()
            } else {
                vec![' ']
            }
        })
        .collect();
    normalize_whitespace(&filtered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_string_collapses_whitespace() {
        assert_eq!(clean_string("a\t b\n\nc"), "a b c");
        assert_eq!(clean_string("  x\u{a0}y  "), "x y");
        assert_eq!(clean_string(""), "");
    }

    #[test]
    fn test_strip_section_number() {
        assert_eq!(strip_section_number("1.2.3 Title"), "Title");
        assert_eq!(strip_section_number("1. Introduction"), "Introduction");
        assert_eq!(strip_section_number("No numbering"), "No numbering");
        // pure numbers stay intact
        assert_eq!(strip_section_number("1.2.3"), "1.2.3");
    }

    #[test]
    fn test_extract_section_number() {
        assert_eq!(extract_section_number("1.2.3 Title"), Some("1.2.3".to_string()));
        assert_eq!(extract_section_number("  4 Results"), Some("4".to_string()));
        assert_eq!(extract_section_number("Title"), None);
    }

    #[test]
    fn test_has_section_number() {
        assert!(has_section_number("2.1 Background"));
        assert!(!has_section_number("Background"));
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        let long = "abcdefghijklmnop";
        let cut = truncate_text(long, 10);
        assert_eq!(cut.chars().count(), 10);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("1.2 Results: part/two"), "1_2_Results__part_two");
        assert_eq!(sanitize_filename("***"), "unnamed");
        assert_eq!(sanitize_filename("plain"), "plain");
    }

    #[test]
    fn test_normalize_for_match() {
        assert_eq!(normalize_for_match("Hello,   World!"), "hello world");
        assert_eq!(normalize_for_match("3.1 Results"), "3 1 results");
    }
}
