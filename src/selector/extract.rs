//! Selector-driven extraction.
//!
//! Runs every leaf of a [`SelectorMap`] against a document and mirrors the
//! map's shape in the result. Each label is isolated: a selector that does
//! not compile (or a leaf that is not a selector at all) yields an empty list
//! for that label plus a [`SelectorFailure`], and the remaining labels are
//! still evaluated.

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{debug, warn};

use crate::dom::Document;

use super::{select_texts, SelectorMap, SelectorSpec};

/// Value extracted for one label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractedValue {
    /// Trimmed text of every match, in document order.
    Texts(Vec<String>),

    /// Result of a nested selector map.
    Nested(ExtractionResult),
}

impl ExtractedValue {
    /// Texts for a leaf, `None` for nested values.
    #[must_use]
    pub fn as_texts(&self) -> Option<&[String]> {
        match self {
            Self::Texts(texts) => Some(texts),
            Self::Nested(_) => None,
        }
    }

    /// Nested result, `None` for leaves.
    #[must_use]
    pub fn as_nested(&self) -> Option<&ExtractionResult> {
        match self {
            Self::Texts(_) => None,
            Self::Nested(result) => Some(result),
        }
    }
}

impl Serialize for ExtractedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Texts(texts) => texts.serialize(serializer),
            Self::Nested(result) => result.serialize(serializer),
        }
    }
}

/// Ordered label → value mapping, same shape as the selector map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionResult {
    entries: Vec<(String, ExtractedValue)>,
}

impl ExtractionResult {
    /// Look up a label.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&ExtractedValue> {
        self.entries.iter().find(|(l, _)| l == label).map(|(_, v)| v)
    }

    /// Texts for a leaf label; empty when the label is missing or nested.
    #[must_use]
    pub fn get_texts(&self, label: &str) -> &[String] {
        self.get(label)
            .and_then(ExtractedValue::as_texts)
            .unwrap_or_default()
    }

    /// Number of labels at this level.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no labels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(label, value)` pairs in selector-map order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExtractedValue)> {
        self.entries.iter().map(|(l, v)| (l.as_str(), v))
    }

    fn push(&mut self, label: &str, value: ExtractedValue) {
        self.entries.push((label.to_string(), value));
    }
}

impl Serialize for ExtractionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, value) in &self.entries {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

/// A label whose selector could not be evaluated.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SelectorFailure {
    /// Labels from the top-level map down to the failing leaf.
    pub label_path: Vec<String>,

    /// The selector as given, or its JSON rendering for malformed leaves.
    pub selector: String,

    /// Why it failed.
    pub reason: String,
}

/// Extraction output: values plus per-label failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct Extraction {
    /// Values in the shape of the selector map.
    pub result: ExtractionResult,

    /// Labels that produced an empty list because their selector failed.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<SelectorFailure>,
}

impl Extraction {
    /// Whether every label was evaluated without error.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Evaluate every selector in `selectors` against `doc`.
///
/// Never fails as a whole; see [`Extraction::failures`].
#[must_use]
pub fn extract(doc: &Document, selectors: &SelectorMap) -> Extraction {
    let mut failures = Vec::new();
    let mut path = Vec::new();
    let result = extract_level(doc, selectors, &mut path, &mut failures);
    debug!(
        labels = result.len(),
        failures = failures.len(),
        "selector extraction finished"
    );
    Extraction { result, failures }
}

fn extract_level(
    doc: &Document,
    selectors: &SelectorMap,
    path: &mut Vec<String>,
    failures: &mut Vec<SelectorFailure>,
) -> ExtractionResult {
    let mut out = ExtractionResult::default();

    for (label, spec) in selectors.iter() {
        path.push(label.to_string());
        let value = match spec {
            SelectorSpec::Nested(inner) => {
                ExtractedValue::Nested(extract_level(doc, inner, path, failures))
            }
            SelectorSpec::Invalid(raw) => {
                let reason = "not a selector string, list of strings, or nested map".to_string();
                warn!(label = %path.join("."), selector = %raw, "{reason}");
                failures.push(SelectorFailure {
                    label_path: path.clone(),
                    selector: raw.to_string(),
                    reason,
                });
                ExtractedValue::Texts(Vec::new())
            }
            SelectorSpec::Single(_) | SelectorSpec::Parts(_) => {
                let query = spec.query_string().unwrap_or_default();
                match select_texts(doc, &query) {
                    Ok(texts) => ExtractedValue::Texts(texts),
                    Err(e) => {
                        warn!(label = %path.join("."), selector = %query, error = %e, "selector failed");
                        failures.push(SelectorFailure {
                            label_path: path.clone(),
                            selector: query,
                            reason: e.to_string(),
                        });
                        ExtractedValue::Texts(Vec::new())
                    }
                }
            }
        };
        out.push(label, value);
        path.pop();
    }

    out
}
