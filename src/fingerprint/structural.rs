//! Structural-path keyed fingerprints.
//!
//! Each entry is keyed by the element's absolute path from the document root
//! with every sibling index normalized to `[1]`; elements without same-tag
//! siblings carry no index at all (`/html/body/ul/li[1]`). At every level
//! only the first child of each tag name is walked, so a list of several
//! hundred identical rows is represented by one sampled row. The keys are
//! valid XPath expressions for that first instance; dropping the index
//! addresses all of them.

use std::collections::HashSet;

use crate::dom::{self, NodeRef};
use crate::escape::class_selector;

use super::{FingerprintEntry, FingerprintMap, Walk};

/// Path segment for an element: `tag`, or `tag[1]` when it has same-tag siblings.
#[must_use]
pub fn path_segment(node: &NodeRef, tag: &str) -> String {
    if dom::has_same_tag_sibling(node, tag) {
        format!("{tag}[1]")
    } else {
        tag.to_string()
    }
}

/// Normalized absolute path of an element, e.g. `/html/body/div[1]/p`.
///
/// Returns `None` for non-element nodes.
#[must_use]
pub fn normalized_path(node: &NodeRef) -> Option<String> {
    let mut segments = Vec::new();
    let mut current = Some(*node);
    while let Some(n) = current {
        let Some(tag) = dom::tag_name(&n) else {
            break;
        };
        segments.push(path_segment(&n, &tag));
        current = n.parent();
    }
    if segments.is_empty() {
        return None;
    }
    segments.reverse();
    Some(format!("/{}", segments.join("/")))
}

fn class_hint(node: &NodeRef, walk: &Walk) -> Option<String> {
    if !walk.options.include_class_hint {
        return None;
    }
    class_selector(&dom::class_tokens(node))
}

/// Entries for the first child of each tag name under `node`, recursively.
fn collect_children(node: &NodeRef, path: &str, depth: usize, walk: &mut Walk) -> FingerprintMap {
    let max_items = walk.options.max_content_items;
    let mut level = FingerprintMap::new();
    let mut seen = HashSet::new();

    for child in dom::element_children(node) {
        let Some(tag) = dom::tag_name(&child) else {
            walk.skip(&child, "element without a tag name");
            continue;
        };
        if !seen.insert(tag.clone()) {
            continue;
        }
        if walk.too_deep(depth + 1) {
            break;
        }

        let key = format!("{path}/{}", path_segment(&child, &tag));
        let entry = FingerprintEntry {
            content: walk.sample(&child).into_iter().collect(),
            class: class_hint(&child, walk),
            children: collect_children(&child, &key, depth + 1, walk),
        };
        level.insert(key, entry, max_items);
    }

    level
}

/// Entries for a starting node, keyed by its own normalized path.
///
/// A document node (no `<body>`) contributes no key; its element children
/// become the top level.
pub(crate) fn collect_root(root: &NodeRef, walk: &mut Walk) -> FingerprintMap {
    let Some(path) = normalized_path(root) else {
        return collect_children(root, "", 0, walk);
    };

    let mut level = FingerprintMap::new();
    let entry = FingerprintEntry {
        content: walk.sample(root).into_iter().collect(),
        class: class_hint(root, walk),
        children: collect_children(root, &path, 0, walk),
    };
    level.insert(path, entry, walk.options.max_content_items);
    level
}
