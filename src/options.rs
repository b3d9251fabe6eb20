//! Configuration options for fingerprinting.
//!
//! The `Options` struct carries the tunables that earlier versions of the
//! summarizer hard-coded: the pruned tag list, the text truncation limits and
//! the keying strategy.

use crate::pruning::DEFAULT_EXCLUDED_TAGS;

/// How fingerprint entries are keyed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FingerprintMode {
    /// Key by `#id` or `.class.list`; elements with neither are transparent.
    #[default]
    Attributes,

    /// Key by normalized absolute path (`/html/body/ul/li[1]`), sampling the
    /// first child of each tag name at every level.
    StructuralPath,
}

/// Configuration options for fingerprinting and the content-node tree.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use rs_intelliscrape::{FingerprintMode, Options};
///
/// let options = Options {
///     mode: FingerprintMode::StructuralPath,
///     max_content_items: 3,
///     ..Options::default()
/// };
/// assert_eq!(options.max_text_len, 70);
/// ```
#[derive(Debug, Clone)]
pub struct Options {
    /// Keying strategy.
    ///
    /// Default: `FingerprintMode::Attributes`
    pub mode: FingerprintMode,

    /// Tags removed (with their descendants) before fingerprinting.
    ///
    /// Default: `script, style, meta, link, comment, head, footer, nav, form, noscript`
    pub excluded_tags: Vec<String>,

    /// Maximum characters kept from a text sample before the ellipsis.
    ///
    /// Default: `70`
    pub max_text_len: usize,

    /// Suffix appended to truncated text samples.
    ///
    /// Default: `"..."`
    pub ellipsis: String,

    /// Maximum text samples kept per fingerprint entry.
    ///
    /// Default: `2`
    pub max_content_items: usize,

    /// Maximum element depth walked below the starting element.
    ///
    /// Deeper subtrees are skipped and reported as a warning.
    ///
    /// Default: `256`
    pub max_tree_depth: usize,

    /// Attach the element's escaped class selector to structural-path entries.
    ///
    /// Default: `true`
    pub include_class_hint: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            mode: FingerprintMode::Attributes,
            excluded_tags: DEFAULT_EXCLUDED_TAGS.iter().map(|t| (*t).to_string()).collect(),
            max_text_len: 70,
            ellipsis: "...".to_string(),
            max_content_items: 2,
            max_tree_depth: 256,
            include_class_hint: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = Options::default();

        assert_eq!(opts.mode, FingerprintMode::Attributes);
        assert_eq!(opts.max_text_len, 70);
        assert_eq!(opts.ellipsis, "...");
        assert_eq!(opts.max_content_items, 2);
        assert_eq!(opts.max_tree_depth, 256);
        assert!(opts.include_class_hint);
        assert_eq!(opts.excluded_tags.len(), 10);
        assert!(opts.excluded_tags.iter().any(|t| t == "noscript"));
    }

    #[test]
    fn test_custom_excluded_tags() {
        let opts = Options {
            excluded_tags: vec!["aside".to_string()],
            ..Options::default()
        };

        assert_eq!(opts.excluded_tags, vec!["aside".to_string()]);
        assert_eq!(opts.max_content_items, 2);
    }
}
