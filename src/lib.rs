//! # rs-intelliscrape
//!
//! Compact DOM fingerprints and selector-driven extraction for
//! instruction-based web scraping.
//!
//! A page is too large to hand to a selector-writing model as-is. This
//! library prunes it, summarizes what remains into a small nested
//! fingerprint keyed by selector-addressable names, and then runs whatever
//! selectors come back against the original markup.
//!
//! ## Quick Start
//!
//! ```rust
//! use rs_intelliscrape::{extract_with_selectors, fingerprint, SelectorMap};
//!
//! let html = r#"<div id="list"><div class="card"><span class="price">$5</span></div>
//! <div class="card"><span class="price">$7</span></div></div>"#;
//!
//! // What a selector-writing step gets to see
//! let fp = fingerprint(html);
//! assert_eq!(
//!     fp.to_json_string(),
//!     r##"{"#list":{"content":["$5 $7"],"children":{".card":{"content":["$5","$7"],"children":{".price":{"content":["$5","$7"]}}}}}}"##
//! );
//!
//! // Running the selectors it chose
//! let selectors = SelectorMap::new().with("prices", "#list .price");
//! let out = extract_with_selectors(html, &selectors);
//! assert_eq!(out.result.get_texts("prices"), ["$5", "$7"]);
//! ```
//!
//! ## Features
//!
//! - **Fingerprints**: `#id`/`.class` keyed or structural-path keyed summaries
//! - **Extraction**: nested label maps of CSS or XPath selectors, per-label failure isolation
//! - **Outline view**: ASCII content-node tree for human inspection
//! - **Pipeline**: pluggable fetch and selector-inference collaborators

mod error;
mod options;

/// DOM operations adapter over `dom_query`.
pub mod dom;

/// CSS identifier escaping.
pub mod escape;

/// Text sample truncation.
pub mod text;

/// Removal of non-content tags and comments.
pub mod pruning;

/// Fingerprint entries, keying strategies and cleanup.
pub mod fingerprint;

/// Content-node tree and ASCII outline.
pub mod content_tree;

/// Selector maps, CSS/XPath evaluation and extraction.
pub mod selector;

/// Character encoding detection and decoding.
pub mod encoding;

/// Base URLs, link resolution and link-host tallies.
pub mod url_utils;

/// Page fetching seam and caller-owned fetch cache.
pub mod fetch;

/// Fetch, fingerprint, infer and extract in one call.
pub mod pipeline;

// Public API - re-exports
pub use content_tree::ContentNode;
pub use error::{Error, Result};
pub use fetch::{CachedFetcher, FetchCache, Fetcher};
pub use fingerprint::{Fingerprint, FingerprintEntry, FingerprintMap};
pub use options::{FingerprintMode, Options};
pub use pipeline::{ScrapeReport, Scraper, SelectorInference};
pub use selector::extract::{ExtractedValue, Extraction, ExtractionResult, SelectorFailure};
pub use selector::{SelectorMap, SelectorSpec};

/// Fingerprints an HTML document using default options.
///
/// # Example
///
/// ```rust
/// use rs_intelliscrape::fingerprint;
///
/// let fp = fingerprint(r#"<p id="a">Hello</p><script>x()</script>"#);
/// assert_eq!(fp.to_json_string(), r##"{"#a":{"content":["Hello"]}}"##);
/// ```
#[must_use]
pub fn fingerprint(html: &str) -> Fingerprint {
    fingerprint_with_options(html, &Options::default())
}

/// Fingerprints an HTML document with custom options.
///
/// Empty or whitespace-only input yields an empty fingerprint with a warning.
///
/// # Example
///
/// ```rust
/// use rs_intelliscrape::{fingerprint_with_options, FingerprintMode, Options};
///
/// let options = Options {
///     mode: FingerprintMode::StructuralPath,
///     ..Options::default()
/// };
/// let fp = fingerprint_with_options("<main><h1>Title</h1></main>", &options);
/// assert!(fp.entries.get_path(&["/html/body", "/html/body/main", "/html/body/main/h1"]).is_some());
/// ```
#[must_use]
pub fn fingerprint_with_options(html: &str, options: &Options) -> Fingerprint {
    fingerprint::from_html(html, options)
}

/// Fingerprints HTML bytes with automatic encoding detection.
#[must_use]
pub fn fingerprint_bytes(html: &[u8], options: &Options) -> Fingerprint {
    fingerprint_with_options(&encoding::decode_html(html), options)
}

/// Builds the content-node tree of a pruned copy of `html`.
///
/// Returns `None` when the document has no elements left to show.
#[must_use]
pub fn content_tree(html: &str, options: &Options) -> Option<ContentNode> {
    if html.trim().is_empty() {
        return None;
    }
    let doc = pruning::pruned_document(html, &options.excluded_tags);
    ContentNode::from_document(&doc, options)
}

/// Renders the ASCII outline of `html`; empty for blank input.
///
/// # Example
///
/// ```rust
/// use rs_intelliscrape::{ascii_tree, Options};
///
/// let outline = ascii_tree(r#"<div id="main"><h1>Hi</h1></div>"#, &Options::default());
/// assert_eq!(outline, "body\n└── div#main\n    └── h1 - Hi");
/// ```
#[must_use]
pub fn ascii_tree(html: &str, options: &Options) -> String {
    content_tree(html, options)
        .map(|tree| tree.render())
        .unwrap_or_default()
}

/// Runs every selector in `selectors` against `html`.
///
/// Selectors resolve against the unpruned markup. Per-label problems are
/// reported in [`Extraction::failures`]; this never fails as a whole.
#[must_use]
pub fn extract_with_selectors(html: &str, selectors: &SelectorMap) -> Extraction {
    let doc = dom::parse(html);
    selector::extract::extract(&doc, selectors)
}

/// Runs `selectors` against HTML bytes with automatic encoding detection.
#[must_use]
pub fn extract_bytes(html: &[u8], selectors: &SelectorMap) -> Extraction {
    extract_with_selectors(&encoding::decode_html(html), selectors)
}
