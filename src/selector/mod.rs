//! Selector Maps
//!
//! A selector map pairs human-readable labels with the selectors that
//! locate their values: a single CSS/XPath string, a list of fragments
//! joined with spaces into one descendant selector, or a nested map for
//! hierarchical results. Maps normally come back from the selector
//! inference step as JSON; [`SelectorMap::from_json`] accepts whatever that
//! step produced and keeps malformed leaves as [`SelectorSpec::Invalid`] so
//! extraction can degrade per label instead of failing outright.

use dom_query::Matcher;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::dom::{self, Document};
use crate::error::{Error, Result};

pub mod extract;
pub mod xpath;

/// How to locate one label's values.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorSpec {
    /// One CSS selector or XPath expression.
    Single(String),

    /// Fragments joined with a single space before querying.
    Parts(Vec<String>),

    /// Nested labels, producing a nested result.
    Nested(SelectorMap),

    /// Anything else the inference step returned, kept for reporting.
    Invalid(Value),
}

impl SelectorSpec {
    /// The selector string to run for a leaf, `None` for nested/invalid specs.
    #[must_use]
    pub fn query_string(&self) -> Option<String> {
        match self {
            Self::Single(selector) => Some(selector.clone()),
            Self::Parts(parts) => Some(parts.join(" ")),
            Self::Nested(_) | Self::Invalid(_) => None,
        }
    }

    fn from_json(value: &Value) -> Self {
        match value {
            Value::String(s) => Self::Single(s.clone()),
            Value::Array(items) => {
                let parts: Option<Vec<String>> = items
                    .iter()
                    .map(|item| item.as_str().map(str::to_string))
                    .collect();
                match parts {
                    Some(parts) => Self::Parts(parts),
                    None => Self::Invalid(value.clone()),
                }
            }
            Value::Object(_) => match SelectorMap::from_json(value) {
                Ok(map) => Self::Nested(map),
                Err(_) => Self::Invalid(value.clone()),
            },
            _ => Self::Invalid(value.clone()),
        }
    }
}

impl From<&str> for SelectorSpec {
    fn from(selector: &str) -> Self {
        Self::Single(selector.to_string())
    }
}

impl From<String> for SelectorSpec {
    fn from(selector: String) -> Self {
        Self::Single(selector)
    }
}

impl From<SelectorMap> for SelectorSpec {
    fn from(map: SelectorMap) -> Self {
        Self::Nested(map)
    }
}

impl Serialize for SelectorSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Single(selector) => serializer.serialize_str(selector),
            Self::Parts(parts) => parts.serialize(serializer),
            Self::Nested(map) => map.serialize(serializer),
            Self::Invalid(value) => value.serialize(serializer),
        }
    }
}

/// Ordered label → selector mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectorMap {
    entries: Vec<(String, SelectorSpec)>,
}

impl SelectorMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, label: impl Into<String>, spec: impl Into<SelectorSpec>) -> Self {
        self.insert(label, spec);
        self
    }

    /// Insert or replace a label, keeping its original position on replace.
    pub fn insert(&mut self, label: impl Into<String>, spec: impl Into<SelectorSpec>) {
        let label = label.into();
        let spec = spec.into();
        if let Some(slot) = self.entries.iter_mut().find(|(l, _)| *l == label) {
            slot.1 = spec;
        } else {
            self.entries.push((label, spec));
        }
    }

    /// Look up a label.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&SelectorSpec> {
        self.entries.iter().find(|(l, _)| l == label).map(|(_, s)| s)
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

    /// `(label, spec)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SelectorSpec)> {
        self.entries.iter().map(|(l, s)| (l.as_str(), s))
    }

    /// Build a map from the inference step's JSON.
    ///
    /// The top level must be an object; malformed leaves are kept as
    /// [`SelectorSpec::Invalid`].
    pub fn from_json(value: &Value) -> Result<Self> {
        let Value::Object(object) = value else {
            return Err(Error::InvalidSelectorMap(json_kind(value).to_string()));
        };
        Ok(Self {
            entries: object
                .iter()
                .map(|(label, spec)| (label.clone(), SelectorSpec::from_json(spec)))
                .collect(),
        })
    }

    /// Parse JSON text, then [`SelectorMap::from_json`].
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| Error::InvalidSelectorMap(format!("unparsable JSON ({e})")))?;
        Self::from_json(&value)
    }
}

impl<L: Into<String>, S: Into<SelectorSpec>> FromIterator<(L, S)> for SelectorMap {
    fn from_iter<I: IntoIterator<Item = (L, S)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (label, spec) in iter {
            map.insert(label, spec);
        }
        map
    }
}

impl Serialize for SelectorMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, spec) in &self.entries {
            map.serialize_entry(label, spec)?;
        }
        map.end()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Run one selector against `doc`, returning the trimmed text of every
/// match in document order.
///
/// Strings starting with `/` or `./` are XPath; everything else is CSS.
/// A selector that matches nothing yields an empty list; one that does not
/// compile is an error.
pub fn select_texts(doc: &Document, selector: &str) -> Result<Vec<String>> {
    if xpath::looks_like_xpath(selector) {
        return xpath::select_texts(doc, selector);
    }

    let matcher = Matcher::new(selector.trim()).map_err(|e| Error::InvalidSelector {
        selector: selector.to_string(),
        reason: format!("{e:?}"),
    })?;
    Ok(doc
        .select_matcher(&matcher)
        .nodes()
        .iter()
        .map(dom::text_content)
        .collect())
}
