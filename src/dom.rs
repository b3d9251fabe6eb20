//! DOM Operations Adapter
//!
//! Thin layer over the `dom_query` crate giving the fingerprint builder, the
//! content-node tree and the extractor one vocabulary for attribute access,
//! text gathering and traversal.

// Re-export core types for external use
pub use dom_query::{Document, NodeId, NodeRef, Selection};

// Re-export StrTendril for external use
pub use tendril::StrTendril;

// === Parsing ===

/// Parse HTML string into document
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

/// Clone document by re-serializing it.
///
/// Used to prune a copy while the original stays queryable.
#[must_use]
pub fn clone_document(doc: &Document) -> Document {
    Document::from(doc.html().to_string())
}

/// Starting node for summarization: `<body>` if present, else the document node.
#[must_use]
pub fn body_or_root(doc: &Document) -> NodeRef<'_> {
    doc.select("body")
        .nodes()
        .first()
        .copied()
        .unwrap_or_else(|| doc.root())
}

// === Attribute Operations ===

/// Get any attribute value
#[inline]
#[must_use]
pub fn get_attribute(node: &NodeRef, name: &str) -> Option<StrTendril> {
    node.attr(name)
}

/// Get the element ID exactly as written, or `None` when it is blank.
#[must_use]
pub fn id(node: &NodeRef) -> Option<String> {
    node.attr("id")
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.to_string())
}

/// Get the whitespace-separated class tokens, in attribute order.
#[must_use]
pub fn class_tokens(node: &NodeRef) -> Vec<String> {
    node.attr("class")
        .map(|s| s.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

// === Tag/Node Information ===

/// Get tag name (lowercase)
///
/// Returns `None` for non-element nodes.
#[must_use]
pub fn tag_name(node: &NodeRef) -> Option<String> {
    if !node.is_element() {
        return None;
    }
    node.node_name().map(|t| t.to_ascii_lowercase())
}

// === Text Content ===

/// Text owned directly by the element: its child text nodes, each trimmed,
/// joined with single spaces. Descendant elements contribute nothing.
#[must_use]
pub fn direct_text(node: &NodeRef) -> String {
    let mut out = String::new();
    for child in node.children() {
        if !child.is_text() {
            continue;
        }
        let text = child.text();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(trimmed);
    }
    out
}

/// All text of node and descendants, trimmed.
#[must_use]
pub fn text_content(node: &NodeRef) -> String {
    node.text().trim().to_string()
}

/// All text of node and descendants with whitespace runs collapsed to one
/// space.
#[must_use]
pub fn collapsed_text(node: &NodeRef) -> String {
    node.text().split_whitespace().collect::<Vec<_>>().join(" ")
}

// === Tree Navigation ===

/// Get direct element children in document order
#[must_use]
pub fn element_children<'a>(node: &NodeRef<'a>) -> Vec<NodeRef<'a>> {
    node.children()
        .into_iter()
        .filter(NodeRef::is_element)
        .collect()
}

/// Whether any other element child of this node's parent has the same tag.
#[must_use]
pub fn has_same_tag_sibling(node: &NodeRef, tag: &str) -> bool {
    let Some(parent) = node.parent() else {
        return false;
    };
    parent
        .children()
        .iter()
        .filter(|sibling| sibling.id != node.id)
        .any(|sibling| tag_name(sibling).is_some_and(|t| t == tag))
}

/// All nodes under `root` (inclusive) in document order, iteratively.
#[must_use]
pub fn preorder<'a>(root: &NodeRef<'a>) -> Vec<NodeRef<'a>> {
    let mut out = Vec::new();
    let mut stack = vec![*root];
    while let Some(node) = stack.pop() {
        out.push(node);
        let mut children = node.children();
        children.reverse();
        stack.extend(children);
    }
    out
}

// === Tree Manipulation ===

/// Remove all HTML comment nodes from the document.
///
/// Returns the number of comments removed.
pub fn remove_comments(doc: &Document) -> usize {
    let comments: Vec<NodeRef> = preorder(&doc.root())
        .into_iter()
        .filter(NodeRef::is_comment)
        .collect();
    for comment in &comments {
        comment.remove_from_parent();
    }
    comments.len()
}
