//! Tag pruning.
//!
//! Removes non-content elements (scripts, styles, navigation chrome, forms)
//! and comment nodes before a document is summarized. Extraction never runs
//! on a pruned document: selectors are resolved against the original markup.

use dom_query::Matcher;
use tracing::{debug, warn};

use crate::dom::{self, Document};

/// Tags removed by default, together with all of their descendants.
pub const DEFAULT_EXCLUDED_TAGS: &[&str] = &[
    "script", "style", "meta", "link", "comment", "head", "footer", "nav", "form", "noscript",
];

/// Outcome of a pruning pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneReport {
    /// Elements detached (outermost matches; descendants go with them).
    pub removed_elements: usize,

    /// Comment nodes detached.
    pub removed_comments: usize,

    /// Configured tag names that could not be used as a selector.
    pub skipped_tags: Vec<String>,
}

/// Remove every element whose tag is in `excluded_tags`, in place.
///
/// Tag names that do not form a valid type selector are skipped and listed in
/// the report rather than aborting the pass.
pub fn prune_tags<S: AsRef<str>>(doc: &Document, excluded_tags: &[S]) -> PruneReport {
    let mut report = PruneReport::default();
    let mut valid = Vec::new();

    for tag in excluded_tags {
        let tag = tag.as_ref().trim();
        if tag.is_empty() {
            continue;
        }
        if Matcher::new(tag).is_ok() {
            valid.push(tag.to_ascii_lowercase());
        } else {
            warn!(tag, "skipping excluded tag that is not a valid selector");
            report.skipped_tags.push(tag.to_string());
        }
    }

    if !valid.is_empty() {
        // One combined query instead of a scan per tag
        let combined = valid.join(", ");
        if let Ok(matcher) = Matcher::new(&combined) {
            let matches = doc.select_matcher(&matcher);
            // Nested matches disappear with their ancestor; count outermost only
            report.removed_elements = matches
                .nodes()
                .iter()
                .filter(|node| {
                    !node.ancestors(None).iter().any(|anc| {
                        dom::tag_name(anc).is_some_and(|t| valid.contains(&t))
                    })
                })
                .count();
            matches.remove();
        };
    }

    report.removed_comments = dom::remove_comments(doc);

    debug!(
        removed_elements = report.removed_elements,
        removed_comments = report.removed_comments,
        "pruned document"
    );
    report
}

/// Parse `html` and return a pruned document, leaving no shared state with
/// any other parse of the same markup.
#[must_use]
pub fn pruned_document<S: AsRef<str>>(html: &str, excluded_tags: &[S]) -> Document {
    let doc = dom::parse(html);
    prune_tags(&doc, excluded_tags);
    doc
}

/// Prune a copy of `doc`; the original stays intact and queryable.
#[must_use]
pub fn pruned_copy<S: AsRef<str>>(doc: &Document, excluded_tags: &[S]) -> Document {
    let copy = dom::clone_document(doc);
    prune_tags(&copy, excluded_tags);
    copy
}
