//! Narrative cleanup for YAML block scalars.
//!
//! A block scalar (`text: |`) only round-trips cleanly when the string ends
//! with a newline and no line carries trailing whitespace.

use once_cell::sync::Lazy;
use regex::Regex;

/// Whitespace run ending in a newline.
static TRAILING_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+\n").expect("valid regex"));

/// Clean narrative text for embedding as a YAML block scalar.
///
/// Trailing whitespace is stripped and exactly one newline appended, then
/// every whitespace run that ends in a newline collapses to that newline.
/// The result always ends with a single `\n` and is a fixed point:
/// `cleanup_text(&cleanup_text(s)) == cleanup_text(s)`.
pub fn cleanup_text(text: &str) -> String {
    let mut cleaned = text.trim_end().to_string();
    cleaned.push('\n');
    TRAILING_WS.replace_all(&cleaned, "\n").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "",
        "   ",
        "\n",
        "Logs retained.",
        "Logs retained.\n",
        "Logs retained.   \n\n\n",
        "line one  \nline two\t\nline three",
        "line one\r\nline two\r\n",
        "para one\n\n\npara two\n",
        "  leading indent kept\n    nested\n",
        "tabs\t\t\n\t\n",
        "unicode space\u{00A0}\nend",
    ];

    #[test]
    fn test_appends_single_newline() {
        assert_eq!(cleanup_text("Other."), "Other.\n");
        assert_eq!(cleanup_text("Logs retained.\n"), "Logs retained.\n");
        assert_eq!(cleanup_text("Logs retained.\n\n  \n"), "Logs retained.\n");
    }

    #[test]
    fn test_empty_text_becomes_newline() {
        assert_eq!(cleanup_text(""), "\n");
        assert_eq!(cleanup_text(" \t "), "\n");
    }

    #[test]
    fn test_strips_whitespace_before_inner_newlines() {
        assert_eq!(cleanup_text("a  \nb\t\nc"), "a\nb\nc\n");
        assert_eq!(cleanup_text("a\r\nb"), "a\nb\n");
    }

    #[test]
    fn test_blank_lines_collapse() {
        assert_eq!(cleanup_text("a\n\n\nb"), "a\nb\n");
    }

    #[test]
    fn test_leading_indentation_is_kept() {
        assert_eq!(cleanup_text("  a\n    b"), "  a\n    b\n");
    }

    #[test]
    fn test_idempotent() {
        for sample in SAMPLES {
            let once = cleanup_text(sample);
            assert_eq!(cleanup_text(&once), once, "not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn test_output_shape() {
        for sample in SAMPLES {
            let cleaned = cleanup_text(sample);
            assert!(cleaned.ends_with('\n'), "{:?}", sample);
            assert!(!cleaned.ends_with("\n\n") || cleaned == "\n", "{:?}", sample);
            for line in cleaned.split_inclusive('\n') {
                let body = line.trim_end_matches('\n');
                assert_eq!(body, body.trim_end(), "trailing whitespace in {:?}", cleaned);
            }
        }
    }
}
