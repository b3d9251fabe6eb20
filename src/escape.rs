//! CSS identifier escaping.
//!
//! Raw `id` values and class tokens may contain characters that are
//! significant in selector syntax. Escaping them makes the fingerprint keys
//! directly usable as selectors.

/// Characters that must be backslash-escaped in a CSS identifier.
pub const CSS_SPECIAL_CHARS: &[char] = &[
    '!', '"', '#', '$', '%', '&', '\'', '(', ')', '*', '+', ',', '.', '/', ':', ';', '<', '=',
    '>', '?', '@', '[', '\\', ']', '^', '`', '{', '|', '}', '~',
];

/// Escape a raw identifier for use after `#` or `.` in a CSS selector.
///
/// Every character in [`CSS_SPECIAL_CHARS`] is prefixed with a backslash;
/// everything else is copied unchanged. Not idempotent: escape raw values
/// exactly once.
///
/// # Example
///
/// ```rust
/// use rs_intelliscrape::escape::escape_css_identifier;
///
/// assert_eq!(escape_css_identifier("w-1/2"), r"w-1\/2");
/// assert_eq!(escape_css_identifier("md:flex"), r"md\:flex");
/// ```
#[must_use]
pub fn escape_css_identifier(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 4);
    for c in raw.chars() {
        if CSS_SPECIAL_CHARS.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Build a `#id` selector fragment.
#[must_use]
pub fn id_selector(id: &str) -> String {
    format!("#{}", escape_css_identifier(id))
}

/// Build a `.a.b.c` selector fragment, escaping each token independently.
///
/// Returns `None` for an empty token list.
#[must_use]
pub fn class_selector<S: AsRef<str>>(classes: &[S]) -> Option<String> {
    if classes.is_empty() {
        return None;
    }
    let mut out = String::new();
    for class in classes {
        out.push('.');
        out.push_str(&escape_css_identifier(class.as_ref()));
    }
    Some(out)
}
