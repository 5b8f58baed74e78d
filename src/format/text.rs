//! Grapheme splitting for text entering the element model

use unicode_segmentation::UnicodeSegmentation;

use crate::model::ZERO;

/// Split text into user-perceived characters
pub fn split_text(text: &str) -> Vec<&str> {
    text.graphemes(true).collect()
}

/// Line breaks become the zero-width marker; everything else passes through
pub fn normalize_break(grapheme: &str) -> &str {
    match grapheme {
        "\n" | "\r\n" | "\r" => ZERO,
        other => other,
    }
}

/// Inverse of [`normalize_break`] for text leaving the element model
pub fn denormalize_break(value: &str) -> String {
    value.replace(ZERO, "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_keeps_clusters_together() {
        assert_eq!(split_text("e\u{301}x"), vec!["e\u{301}", "x"]);
        assert_eq!(split_text("a\r\nb"), vec!["a", "\r\n", "b"]);
        assert!(split_text("").is_empty());
    }

    #[test]
    fn test_break_normalization() {
        assert_eq!(normalize_break("\r\n"), ZERO);
        assert_eq!(normalize_break("a"), "a");
        assert_eq!(denormalize_break("a\u{200B}b"), "a\nb");
    }
}
