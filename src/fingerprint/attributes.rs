//! Id/class keyed fingerprints.
//!
//! An element with an `id` becomes `#id`; otherwise one with classes becomes
//! `.a.b`. Elements with neither are transparent: their children's entries
//! are merged into the caller's level, so layout-only wrappers add no
//! nesting. Repeated keys at the same level merge, which is how a list of
//! `.item` rows collapses into one entry sampling the first rows' text.

use crate::dom::{self, NodeRef};
use crate::escape::{class_selector, id_selector};

use super::{FingerprintEntry, FingerprintMap, Walk};

/// Selector key for an element, or `None` when it is keyless.
#[must_use]
pub fn element_key(node: &NodeRef) -> Option<String> {
    if let Some(id) = dom::id(node) {
        return Some(id_selector(&id));
    }
    class_selector(&dom::class_tokens(node))
}

/// Collect the entries contributed by `node`'s element children.
///
/// `node` itself is not keyed here; callers decide whether it gets a level.
pub(crate) fn collect(node: &NodeRef, depth: usize, walk: &mut Walk) -> FingerprintMap {
    let max_items = walk.options.max_content_items;
    let mut level = FingerprintMap::new();

    for child in dom::element_children(node) {
        if walk.too_deep(depth + 1) {
            break;
        }
        if dom::tag_name(&child).is_none() {
            walk.skip(&child, "element without a tag name");
            continue;
        }

        match element_key(&child) {
            Some(key) => {
                let entry = FingerprintEntry {
                    content: walk.sample(&child).into_iter().collect(),
                    children: collect(&child, depth + 1, walk),
                    class: None,
                };
                level.insert(key, entry, max_items);
            }
            None => {
                let nested = collect(&child, depth + 1, walk);
                level.merge(nested, max_items);
            }
        }
    }

    level
}

/// Entries for a starting node, keying the node itself when it has an id or class.
pub(crate) fn collect_root(root: &NodeRef, walk: &mut Walk) -> FingerprintMap {
    let children = collect(root, 0, walk);
    match element_key(root) {
        Some(key) if root.is_element() => {
            let mut level = FingerprintMap::new();
            let entry = FingerprintEntry {
                content: walk.sample(root).into_iter().collect(),
                children,
                class: None,
            };
            level.insert(key, entry, walk.options.max_content_items);
            level
        }
        _ => children,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::build;
    use crate::options::Options;
    use crate::pruning::pruned_document;
    use crate::pruning::DEFAULT_EXCLUDED_TAGS;

    fn fingerprint(html: &str) -> crate::fingerprint::Fingerprint {
        let doc = pruned_document(html, DEFAULT_EXCLUDED_TAGS);
        build(&doc, &Options::default())
    }

    #[test]
    fn test_element_key_prefers_id() {
        let doc = dom::parse(r#"<div id="main" class="a b">x</div><p class="x y:z">y</p><i>z</i>"#);
        let div = doc.select("div").nodes()[0];
        let p = doc.select("p").nodes()[0];
        let i = doc.select("i").nodes()[0];

        assert_eq!(element_key(&div), Some("#main".to_string()));
        assert_eq!(element_key(&p), Some(r".x.y\:z".to_string()));
        assert_eq!(element_key(&i), None);
    }

    #[test]
    fn test_keyless_wrappers_are_transparent() {
        let fp = fingerprint(
            r#"<body><div><div><section><p class="lead">Intro</p></section></div></div></body>"#,
        );

        assert_eq!(fp.entries.keys().collect::<Vec<_>>(), vec![".lead"]);
        assert_eq!(fp.entries.get(".lead").map(|e| e.content.clone()), Some(vec!["Intro".to_string()]));
    }

    #[test]
    fn test_nested_keys_and_descendant_text() {
        let fp = fingerprint(r#"<div id="card">Title <span class="price">$5</span></div>"#);

        let card = fp.entries.get("#card");
        assert_eq!(card.map(|e| e.content.clone()), Some(vec!["Title $5".to_string()]));
        assert_eq!(
            fp.entries.get_path(&["#card", ".price"]).map(|e| e.content.clone()),
            Some(vec!["$5".to_string()])
        );
    }

    #[test]
    fn test_repeated_classes_merge_with_cap() {
        let fp = fingerprint(
            r#"<ul><li class="item">One</li><li class="item">Two</li><li class="item">Three</li></ul>"#,
        );

        assert_eq!(fp.entries.len(), 1);
        assert_eq!(
            fp.entries.get(".item").map(|e| e.content.clone()),
            Some(vec!["One".to_string(), "Two".to_string()])
        );
    }

    #[test]
    fn test_keyed_body_gets_a_level() {
        let fp = fingerprint(r#"<html><body class="home"><p id="x">Hi</p></body></html>"#);

        assert!(fp.entries.get_path(&[".home", "#x"]).is_some());
    }

    #[test]
    fn test_depth_limit_warns_and_keeps_shallow_entries() {
        let mut html = String::from(r#"<p class="top">top</p>"#);
        for _ in 0..20 {
            html.push_str("<div>");
        }
        html.push_str(r#"<p class="deep">deep</p>"#);
        let doc = pruned_document(&html, DEFAULT_EXCLUDED_TAGS);
        let options = Options {
            max_tree_depth: 5,
            ..Options::default()
        };

        let fp = build(&doc, &options);

        assert!(fp.entries.get(".top").is_some());
        assert!(fp.entries.get(".deep").is_none());
        assert_eq!(fp.warnings.len(), 1);
    }
}
