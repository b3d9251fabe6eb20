//! Content-node tree and ASCII outline.
//!
//! An alternative fingerprint view: a full mirror of the pruned element tree
//! (no collapsing of keyless elements), each node carrying its tag, escaped
//! id and classes and at most one truncated text sample. Rendered as an
//! indented outline such as
//!
//! ```text
//! body
//! ├── div#main
//! │   ├── h1 - Welcome
//! │   └── p.lead - Intro text
//! └── div.sidebar
//! ```
//!
//! Rendering is far more token-hungry than the keyed fingerprint but easier
//! for a person to read.

use serde::Serialize;
use tracing::warn;

use crate::dom::{self, Document, NodeRef};
use crate::escape::escape_css_identifier;
use crate::options::Options;
use crate::text::truncate_text;

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const SPACE: &str = "    ";

/// One element of the content-node tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContentNode {
    /// Lowercase tag name.
    pub tag: String,

    /// Escaped `id`, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Escaped class tokens, in attribute order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,

    /// Truncated direct text, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Child elements in document order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ContentNode>,
}

impl ContentNode {
    /// Create a node, escaping the raw id and class tokens.
    #[must_use]
    pub fn new<S: AsRef<str>>(tag: &str, id: Option<&str>, classes: &[S]) -> Self {
        Self {
            tag: tag.to_string(),
            id: id.map(escape_css_identifier),
            classes: classes
                .iter()
                .map(|c| escape_css_identifier(c.as_ref()))
                .collect(),
            content: None,
            children: Vec::new(),
        }
    }

    /// Set the text sample, truncating it with the configured limits.
    ///
    /// Blank text clears the sample.
    pub fn set_content(&mut self, text: &str, options: &Options) {
        let text = text.trim();
        self.content = if text.is_empty() {
            None
        } else {
            Some(truncate_text(text, options.max_text_len, &options.ellipsis))
        };
    }

    /// Append a child node.
    pub fn add_child(&mut self, child: ContentNode) {
        self.children.push(child);
    }

    /// The node's text sample, or an empty string.
    #[must_use]
    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }

    /// Nodes in this subtree, including this one.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(ContentNode::node_count).sum::<usize>()
    }

    /// Build the tree for an already-pruned document, from `<body>` (or the
    /// document's first element when there is no body).
    #[must_use]
    pub fn from_document(doc: &Document, options: &Options) -> Option<Self> {
        let root = dom::body_or_root(doc);
        let root = if root.is_element() {
            root
        } else {
            dom::element_children(&root).into_iter().next()?
        };
        let mut depth_warned = false;
        Some(Self::from_node(&root, 0, options, &mut depth_warned))
    }

    fn from_node(node: &NodeRef, depth: usize, options: &Options, depth_warned: &mut bool) -> Self {
        let tag = dom::tag_name(node).unwrap_or_default();
        let id = dom::id(node);
        let mut out = Self::new(&tag, id.as_deref(), &dom::class_tokens(node));
        out.set_content(&dom::direct_text(node), options);

        if depth >= options.max_tree_depth {
            if !*depth_warned && !dom::element_children(node).is_empty() {
                *depth_warned = true;
                warn!(max_depth = options.max_tree_depth, "content tree truncated at depth limit");
            }
            return out;
        }

        for child in dom::element_children(node) {
            out.add_child(Self::from_node(&child, depth + 1, options, depth_warned));
        }
        out
    }

    /// One-line label: `tag[#id][.class...][ - content]`.
    #[must_use]
    pub fn label(&self) -> String {
        let mut out = self.tag.clone();
        if let Some(id) = &self.id {
            out.push('#');
            out.push_str(id);
        }
        for class in &self.classes {
            out.push('.');
            out.push_str(class);
        }
        if let Some(content) = &self.content {
            out.push_str(" - ");
            out.push_str(content);
        }
        out
    }

    /// Render the subtree as an indented box-drawing outline.
    #[must_use]
    pub fn render(&self) -> String {
        let mut lines = vec![self.label()];
        render_children(self, "", &mut lines);
        lines.join("\n")
    }
}

fn render_children(node: &ContentNode, prefix: &str, lines: &mut Vec<String>) {
    let count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        let is_last = i + 1 == count;
        let (connector, extension) = if is_last {
            (LAST_BRANCH, SPACE)
        } else {
            (BRANCH, PIPE)
        };
        lines.push(format!("{prefix}{connector}{}", child.label()));
        render_children(child, &format!("{prefix}{extension}"), lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(tag: &str, text: &str) -> ContentNode {
        let mut node = ContentNode::new::<&str>(tag, None, &[]);
        node.set_content(text, &Options::default());
        node
    }

    #[test]
    fn test_label_format() {
        let mut node = ContentNode::new("div", Some("main:1"), &["a", "b/c"]);
        node.set_content("  Hello  ", &Options::default());

        assert_eq!(node.label(), r"div#main\:1.a.b\/c - Hello");
        assert_eq!(node.text(), "Hello");
    }

    #[test]
    fn test_render_connectors() {
        let mut root = ContentNode::new::<&str>("body", None, &[]);
        let mut main = ContentNode::new::<&str>("div", Some("main"), &[]);
        main.add_child(leaf("h1", "Welcome"));
        main.add_child(leaf("p", "Intro"));
        root.add_child(main);
        root.add_child(ContentNode::new("div", None, &["sidebar"]));

        let expected = [
            "body",
            "├── div#main",
            "│   ├── h1 - Welcome",
            "│   └── p - Intro",
            "└── div.sidebar",
        ]
        .join("\n");
        assert_eq!(root.render(), expected);
    }

    #[test]
    fn test_render_last_branch_indent() {
        let mut root = ContentNode::new::<&str>("ul", None, &[]);
        let mut li = leaf("li", "");
        li.add_child(leaf("a", "Link"));
        root.add_child(li);

        assert_eq!(root.render(), "ul\n└── li\n    └── a - Link");
    }

    #[test]
    fn test_set_content_truncates_and_clears() {
        let mut node = leaf("p", &"x".repeat(100));
        assert_eq!(node.text().chars().count(), 73);

        node.set_content("   ", &Options::default());
        assert!(node.content.is_none());
    }

    #[test]
    fn test_from_document_mirrors_every_element() {
        let doc = dom::parse(r#"<div><div><p class="x">a</p></div><span>b</span></div>"#);
        let tree = ContentNode::from_document(&doc, &Options::default());

        assert_eq!(tree.as_ref().map(ContentNode::node_count), Some(5));
        assert_eq!(tree.map(|t| t.tag), Some("body".to_string()));
    }

    #[test]
    fn test_from_document_depth_limit() {
        let doc = dom::parse("<div><div><div><p>deep</p></div></div></div>");
        let options = Options {
            max_tree_depth: 2,
            ..Options::default()
        };
        let tree = ContentNode::from_document(&doc, &options);

        // body, div, div
        assert_eq!(tree.map(|t| t.node_count()), Some(3));
    }
}
