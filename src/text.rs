//! Text sample truncation.

/// Truncate `text` to at most `max_chars` characters, appending `ellipsis`
/// when anything was cut. Counts characters, not bytes.
///
/// # Example
///
/// ```rust
/// use rs_intelliscrape::text::truncate_text;
///
/// assert_eq!(truncate_text("hello world", 5, "..."), "hello...");
/// assert_eq!(truncate_text("short", 70, "..."), "short");
/// ```
#[must_use]
pub fn truncate_text(text: &str, max_chars: usize, ellipsis: &str) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => {
            let mut out = String::with_capacity(cut + ellipsis.len());
            out.push_str(&text[..cut]);
            out.push_str(ellipsis);
            out
        }
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_limit_not_truncated() {
        let text = "a".repeat(70);
        assert_eq!(truncate_text(&text, 70, "..."), text);
    }

    #[test]
    fn test_one_over_limit_truncated() {
        let text = "a".repeat(71);
        let out = truncate_text(&text, 70, "...");
        assert_eq!(out.chars().count(), 73);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn test_multibyte_chars_counted_as_chars() {
        let text = "é".repeat(80);
        let out = truncate_text(&text, 70, "...");
        assert_eq!(out.chars().count(), 73);
        assert!(out.starts_with("éé"));
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(truncate_text("", 70, "..."), "");
    }
}
