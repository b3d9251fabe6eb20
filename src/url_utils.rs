//! URL helpers.
//!
//! Base-URL derivation and the link-host tally used to guess a page's origin
//! when it was supplied as a file with no URL.

use std::collections::HashMap;

use url::Url;

use crate::dom::{self, Document};

/// Parse `s` as an absolute `http(s)` URL with a host.
#[must_use]
pub fn parse_absolute(s: &str) -> Option<Url> {
    let s = s.trim();
    if !s.starts_with("http://") && !s.starts_with("https://") {
        return None;
    }
    Url::parse(s).ok().filter(|url| url.host().is_some())
}

/// `scheme://host[:port]` of an absolute URL, `None` otherwise.
#[must_use]
pub fn base_url(url: &str) -> Option<String> {
    let parsed = parse_absolute(url)?;
    let host = parsed.host_str()?;
    Some(match parsed.port() {
        Some(port) => format!("{}://{host}:{port}", parsed.scheme()),
        None => format!("{}://{host}", parsed.scheme()),
    })
}

/// The `n` most frequent base URLs among absolute `<a href>` targets.
///
/// Equal counts keep first-appearance order.
#[must_use]
pub fn top_link_hosts(doc: &Document, n: usize) -> Vec<(String, usize)> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for anchor in doc.select("a[href]").nodes() {
        let Some(base) = dom::get_attribute(anchor, "href").and_then(|href| base_url(&href)) else {
            continue;
        };
        let count = counts.entry(base.clone()).or_insert(0);
        if *count == 0 {
            order.push(base);
        }
        *count += 1;
    }

    let mut tally: Vec<(String, usize)> = order
        .into_iter()
        .map(|base| {
            let count = counts.get(&base).copied().unwrap_or_default();
            (base, count)
        })
        .collect();
    // Stable sort keeps first appearance among ties.
    tally.sort_by(|a, b| b.1.cmp(&a.1));
    tally.truncate(n);
    tally
}
