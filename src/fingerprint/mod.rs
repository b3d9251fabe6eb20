//! Structural Fingerprints
//!
//! A fingerprint is a compact nested summary of a pruned DOM: entries keyed
//! by something selector-addressable, each carrying at most a couple of
//! truncated text samples and the entries found beneath it. It is small
//! enough to embed in a prompt regardless of page size, while keeping enough
//! structure for a reader to pick out exact selectors.
//!
//! Two keying strategies share the same entry type and cleanup pass:
//! - [`attributes`]: `#id` / `.class` keys, transparent keyless wrappers
//! - [`structural`]: normalized absolute paths, one sampled instance per tag

use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{debug, warn};

use crate::dom::{self, Document, NodeRef};
use crate::options::{FingerprintMode, Options};
use crate::pruning::{pruned_copy, pruned_document};
use crate::text::truncate_text;

pub mod attributes;
pub mod structural;

/// One node of the fingerprint.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct FingerprintEntry {
    /// Truncated text samples, in document order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<String>,

    /// Entries discovered beneath this one.
    #[serde(skip_serializing_if = "FingerprintMap::is_empty")]
    pub children: FingerprintMap,

    /// Escaped class selector of the element (structural-path mode only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
}

impl FingerprintEntry {
    /// Whether the entry carries neither text nor children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.children.is_empty()
    }

    /// Fold `other` into this entry: content appended up to `max_items`,
    /// children merged key by key.
    fn absorb(&mut self, other: Self, max_items: usize) {
        for text in other.content {
            if self.content.len() >= max_items {
                break;
            }
            self.content.push(text);
        }
        if self.class.is_none() {
            self.class = other.class;
        }
        self.children.merge(other.children, max_items);
    }
}

/// Insertion-ordered map of fingerprint keys to entries.
///
/// Keys are unique; iteration follows first insertion (document order).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FingerprintMap {
    entries: Vec<(String, FingerprintEntry)>,
    index: HashMap<String, usize>,
}

impl FingerprintMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries at this level.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether this level has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FingerprintEntry> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    /// Follow a chain of keys through nested `children`.
    #[must_use]
    pub fn get_path(&self, keys: &[&str]) -> Option<&FingerprintEntry> {
        let (first, rest) = keys.split_first()?;
        let mut entry = self.get(first)?;
        for key in rest {
            entry = entry.children.get(key)?;
        }
        Some(entry)
    }

    /// Keys at this level in document order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// `(key, entry)` pairs at this level in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FingerprintEntry)> {
        self.entries.iter().map(|(k, e)| (k.as_str(), e))
    }

    /// Insert an entry, merging into an existing one with the same key.
    pub fn insert(&mut self, key: String, entry: FingerprintEntry, max_items: usize) {
        if let Some(&i) = self.index.get(&key) {
            self.entries[i].1.absorb(entry, max_items);
        } else {
            self.index.insert(key.clone(), self.entries.len());
            self.entries.push((key, entry));
        }
    }

    /// Merge every entry of `other` into this map.
    pub fn merge(&mut self, other: Self, max_items: usize) {
        for (key, entry) in other.entries {
            self.insert(key, entry, max_items);
        }
    }

    /// Total entries at every level.
    #[must_use]
    pub fn total_entries(&self) -> usize {
        self.entries
            .iter()
            .map(|(_, e)| 1 + e.children.total_entries())
            .sum()
    }
}

impl Serialize for FingerprintMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, entry) in &self.entries {
            map.serialize_entry(key, entry)?;
        }
        map.end()
    }
}

/// A finished fingerprint plus anything skipped while building it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fingerprint {
    /// Top-level entries.
    pub entries: FingerprintMap,

    /// Keying strategy that produced the entries.
    pub mode: FingerprintMode,

    /// Non-fatal issues: malformed elements, depth cut-offs, empty input.
    pub warnings: Vec<String>,
}

impl Fingerprint {
    /// An empty fingerprint carrying one warning.
    #[must_use]
    pub fn empty(mode: FingerprintMode, warning: impl Into<String>) -> Self {
        Self {
            entries: FingerprintMap::new(),
            mode,
            warnings: vec![warning.into()],
        }
    }

    /// Whether nothing survived summarization.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The nested mapping as a JSON value; `null` if serialization fails.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.entries).unwrap_or_else(|e| {
            warn!(error = %e, "fingerprint serialization failed");
            serde_json::Value::Null
        })
    }

    /// The nested mapping as compact JSON text, for embedding in a prompt.
    ///
    /// Empty if serialization fails.
    #[must_use]
    pub fn to_json_string(&self) -> String {
        serde_json::to_string(&self.entries).unwrap_or_else(|e| {
            warn!(error = %e, "fingerprint serialization failed");
            String::new()
        })
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

/// Per-walk state shared by both keying strategies.
pub(crate) struct Walk<'o> {
    pub(crate) options: &'o Options,
    pub(crate) warnings: Vec<String>,
    depth_warned: bool,
}

impl<'o> Walk<'o> {
    fn new(options: &'o Options) -> Self {
        Self {
            options,
            warnings: Vec::new(),
            depth_warned: false,
        }
    }

    /// Whether `depth` is past the configured limit. Warns once per walk.
    pub(crate) fn too_deep(&mut self, depth: usize) -> bool {
        if depth <= self.options.max_tree_depth {
            return false;
        }
        if !self.depth_warned {
            self.depth_warned = true;
            let msg = format!(
                "subtrees deeper than {} elements were skipped",
                self.options.max_tree_depth
            );
            warn!("{msg}");
            self.warnings.push(msg);
        }
        true
    }

    /// Record an element that could not be summarized.
    pub(crate) fn skip(&mut self, node: &NodeRef, reason: &str) {
        let msg = format!("skipped element {:?}: {reason}", node.id);
        warn!("{msg}");
        self.warnings.push(msg);
    }

    /// Truncated descendant text of an element, `None` when blank.
    pub(crate) fn sample(&self, node: &NodeRef) -> Option<String> {
        let text = dom::collapsed_text(node);
        if text.is_empty() {
            return None;
        }
        Some(truncate_text(
            &text,
            self.options.max_text_len,
            &self.options.ellipsis,
        ))
    }
}

/// Fingerprint an already-pruned document.
///
/// Walks from `<body>` (or the document node when there is none) with the
/// strategy selected by `options.mode`, then applies [`clean`].
#[must_use]
pub fn build(doc: &Document, options: &Options) -> Fingerprint {
    let root = dom::body_or_root(doc);
    let mut walk = Walk::new(options);

    let raw = match options.mode {
        FingerprintMode::Attributes => attributes::collect_root(&root, &mut walk),
        FingerprintMode::StructuralPath => structural::collect_root(&root, &mut walk),
    };
    let entries = clean(raw, options.max_content_items);

    debug!(
        mode = ?options.mode,
        top_level = entries.len(),
        total = entries.total_entries(),
        warnings = walk.warnings.len(),
        "built fingerprint"
    );

    Fingerprint {
        entries,
        mode: options.mode,
        warnings: walk.warnings,
    }
}

/// Warning attached to the fingerprint of blank input.
pub const EMPTY_INPUT_WARNING: &str = "input contained no markup";

/// Fingerprint raw markup: prune with `options.excluded_tags`, then [`build`].
///
/// Blank input yields an empty fingerprint carrying [`EMPTY_INPUT_WARNING`].
#[must_use]
pub fn from_html(html: &str, options: &Options) -> Fingerprint {
    if html.trim().is_empty() {
        return Fingerprint::empty(options.mode, EMPTY_INPUT_WARNING);
    }
    let doc = pruned_document(html, &options.excluded_tags);
    build(&doc, options)
}

/// Fingerprint a pruned copy of `doc`, leaving `doc` untouched.
#[must_use]
pub fn from_document(doc: &Document, options: &Options) -> Fingerprint {
    let pruned = pruned_copy(doc, &options.excluded_tags);
    build(&pruned, options)
}

/// Cleanup pass: drop blank samples, keep the first `max_items` samples,
/// and remove entries left with neither content nor children.
#[must_use]
pub fn clean(map: FingerprintMap, max_items: usize) -> FingerprintMap {
    let mut out = FingerprintMap::new();
    for (key, entry) in map.entries {
        let content: Vec<String> = entry
            .content
            .into_iter()
            .filter(|s| !s.trim().is_empty())
            .take(max_items)
            .collect();
        let children = clean(entry.children, max_items);
        let cleaned = FingerprintEntry {
            content,
            children,
            class: entry.class,
        };
        if !cleaned.is_empty() {
            out.insert(key, cleaned, max_items);
        }
    }
    out
}
