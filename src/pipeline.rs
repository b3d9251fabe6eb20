//! Instruction-driven scraping pipeline.
//!
//! Composes the two collaborator seams with the local stages:
//!
//! 1. fetch the page ([`Fetcher`]) and decode its bytes
//! 2. fingerprint a pruned copy of the document
//! 3. ask a [`SelectorInference`] collaborator for a selector map, given the
//!    operator's instruction and the fingerprint JSON
//! 4. run the selectors against the unpruned document
//!
//! Only a failed fetch, a failed inference call or a non-object selector
//! map abort a scrape. Individual bad selectors surface as
//! [`SelectorFailure`](crate::selector::extract::SelectorFailure)s.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info_span};

use crate::dom;
use crate::encoding::decode_html;
use crate::error::Result;
use crate::fetch::Fetcher;
use crate::fingerprint::{self, Fingerprint, EMPTY_INPUT_WARNING};
use crate::options::Options;
use crate::selector::extract::{extract, Extraction};
use crate::selector::SelectorMap;
use crate::url_utils::{base_url, top_link_hosts};

/// Turns an instruction plus a fingerprint into a selector map.
///
/// The returned JSON must be an object of label → selector string, list of
/// selector fragments, or nested object.
pub trait SelectorInference {
    /// Produce selectors for `instruction` from `fingerprint`.
    ///
    /// Failures should be reported as [`crate::Error::Inference`].
    fn infer_selectors(&self, instruction: &str, fingerprint: &Value) -> Result<Value>;
}

impl<I: SelectorInference + ?Sized> SelectorInference for &I {
    fn infer_selectors(&self, instruction: &str, fingerprint: &Value) -> Result<Value> {
        (**self).infer_selectors(instruction, fingerprint)
    }
}

/// Everything one scrape produced.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeReport {
    /// `scheme://host[:port]` of the page: from the fetched or supplied URL,
    /// otherwise the most linked-to host in the markup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,

    /// Fingerprint shown to the inference step.
    pub fingerprint: Fingerprint,

    /// Selectors the inference step returned.
    pub selectors: SelectorMap,

    /// Values and per-label failures.
    pub extraction: Extraction,
}

/// Fetch + fingerprint + infer + extract.
#[derive(Debug, Clone)]
pub struct Scraper<F, I> {
    fetcher: F,
    inference: I,
    options: Options,
}

impl<F: Fetcher, I: SelectorInference> Scraper<F, I> {
    /// Build a scraper with default options.
    pub fn new(fetcher: F, inference: I) -> Self {
        Self::with_options(fetcher, inference, Options::default())
    }

    /// Build a scraper with explicit options.
    pub fn with_options(fetcher: F, inference: I, options: Options) -> Self {
        Self {
            fetcher,
            inference,
            options,
        }
    }

    /// The options fingerprints are built with.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The fetch collaborator.
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Fetch `url` and scrape it for `instruction`.
    pub fn scrape_url(&self, url: &str, instruction: &str) -> Result<ScrapeReport> {
        let span = info_span!("scrape_url", url);
        let _guard = span.enter();

        let bytes = self.fetcher.fetch(url)?;
        debug!(bytes = bytes.len(), "fetched page");
        let html = decode_html(&bytes);
        self.run(&html, instruction, base_url(url))
    }

    /// Scrape operator-supplied markup for `instruction`.
    ///
    /// `page_url`, when given and absolute, sets the report's origin. Without
    /// it the origin is guessed from the markup's links.
    pub fn scrape_html(
        &self,
        html: &str,
        page_url: Option<&str>,
        instruction: &str,
    ) -> Result<ScrapeReport> {
        let span = info_span!("scrape_html", len = html.len(), page_url);
        let _guard = span.enter();

        let origin = page_url.and_then(|url| {
            let base = base_url(url);
            if base.is_none() {
                debug!(url, "supplied page URL is not absolute, guessing origin");
            }
            base
        });
        self.run(html, instruction, origin)
    }

    fn run(&self, html: &str, instruction: &str, origin: Option<String>) -> Result<ScrapeReport> {
        let doc = dom::parse(html);
        let origin = origin.or_else(|| {
            top_link_hosts(&doc, 1)
                .into_iter()
                .next()
                .map(|(host, _)| host)
        });

        let fingerprint = if html.trim().is_empty() {
            Fingerprint::empty(self.options.mode, EMPTY_INPUT_WARNING)
        } else {
            fingerprint::from_document(&doc, &self.options)
        };

        let raw = self
            .inference
            .infer_selectors(instruction, &fingerprint.to_json())?;
        let selectors = SelectorMap::from_json(&raw)?;
        debug!(labels = selectors.len(), "inferred selectors");

        let extraction = extract(&doc, &selectors);

        Ok(ScrapeReport {
            origin,
            fingerprint,
            selectors,
            extraction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::fetch::CachedFetcher;
    use serde_json::json;
    use std::cell::RefCell;

    const PAGE: &str = r#"<html><head><script>var x;</script></head><body>
        <nav class="menu"><a href="https://shop.test/a">Home</a></nav>
        <div class="product"><h2 class="name">Lamp</h2><span class="price">$5</span></div>
        <div class="product"><h2 class="name">Desk</h2><span class="price">$70</span></div>
        </body></html>"#;

    struct StaticPage;

    impl Fetcher for StaticPage {
        fn fetch(&self, url: &str) -> Result<Vec<u8>> {
            if url.ends_with("/down") {
                return Err(Error::Fetch {
                    url: url.to_string(),
                    reason: "connection refused".into(),
                });
            }
            Ok(PAGE.as_bytes().to_vec())
        }
    }

    /// Returns a fixed answer and remembers the fingerprint it was shown.
    struct Canned {
        answer: Value,
        seen: RefCell<Option<Value>>,
    }

    impl Canned {
        fn new(answer: Value) -> Self {
            Self {
                answer,
                seen: RefCell::new(None),
            }
        }
    }

    impl SelectorInference for Canned {
        fn infer_selectors(&self, _instruction: &str, fingerprint: &Value) -> Result<Value> {
            *self.seen.borrow_mut() = Some(fingerprint.clone());
            Ok(self.answer.clone())
        }
    }

    struct Refusing;

    impl SelectorInference for Refusing {
        fn infer_selectors(&self, _instruction: &str, _fingerprint: &Value) -> Result<Value> {
            Err(Error::Inference("quota exceeded".into()))
        }
    }

    #[test]
    fn test_scrape_url_end_to_end() {
        let inference = Canned::new(json!({ "names": ".product .name", "prices": ["div.product", "span.price"] }));
        let scraper = Scraper::new(StaticPage, &inference);

        let report = scraper
            .scrape_url("https://shop.test/list?page=2", "names and prices")
            .expect("scrape should succeed");

        assert_eq!(report.origin.as_deref(), Some("https://shop.test"));
        assert_eq!(report.extraction.result.get_texts("names"), ["Lamp", "Desk"]);
        assert_eq!(report.extraction.result.get_texts("prices"), ["$5", "$70"]);

        // The inference step saw the pruned fingerprint.
        let seen = inference.seen.borrow().clone().unwrap_or_default();
        assert!(seen.get(".product").is_some());
        assert!(seen.get(".menu").is_none());
    }

    #[test]
    fn test_extraction_uses_unpruned_document() {
        let scraper = Scraper::new(StaticPage, Canned::new(json!({ "nav": "nav.menu a" })));
        let report = scraper.scrape_html(PAGE, None, "menu links");

        let texts = report.map(|r| r.extraction.result.get_texts("nav").to_vec());
        assert_eq!(texts.ok(), Some(vec!["Home".to_string()]));
    }

    #[test]
    fn test_scrape_html_origin_from_links() {
        let scraper = Scraper::new(StaticPage, Canned::new(json!({})));
        let report = scraper.scrape_html(PAGE, None, "anything");

        assert_eq!(report.ok().and_then(|r| r.origin), Some("https://shop.test".to_string()));
    }

    #[test]
    fn test_supplied_page_url_sets_origin() {
        let scraper = Scraper::new(StaticPage, Canned::new(json!({})));

        let report = scraper.scrape_html(PAGE, Some("http://mirror.test:8080/saved/page.html"), "x");
        assert_eq!(
            report.ok().and_then(|r| r.origin),
            Some("http://mirror.test:8080".to_string())
        );

        let report = scraper.scrape_html(PAGE, Some("saved/page.html"), "x");
        assert_eq!(report.ok().and_then(|r| r.origin), Some("https://shop.test".to_string()));
    }

    #[test]
    fn test_fatal_errors_propagate() {
        let scraper = Scraper::new(StaticPage, Canned::new(json!({})));
        assert!(matches!(
            scraper.scrape_url("https://shop.test/down", "x"),
            Err(Error::Fetch { .. })
        ));

        let scraper = Scraper::new(StaticPage, Refusing);
        assert!(matches!(scraper.scrape_html(PAGE, None, "x"), Err(Error::Inference(_))));

        let scraper = Scraper::new(StaticPage, Canned::new(json!(["h2"])));
        assert!(matches!(scraper.scrape_html(PAGE, None, "x"), Err(Error::InvalidSelectorMap(_))));
    }

    #[test]
    fn test_bad_selector_degrades_per_label() {
        let scraper = Scraper::new(
            StaticPage,
            Canned::new(json!({ "bad": "h2[[[", "flag": true, "names": "h2.name" })),
        );
        let report = scraper.scrape_html(PAGE, None, "x").expect("scrape should succeed");

        assert_eq!(report.extraction.failures.len(), 2);
        assert_eq!(report.extraction.result.get_texts("names"), ["Lamp", "Desk"]);
    }

    #[test]
    fn test_blank_markup() {
        let scraper = Scraper::new(StaticPage, Canned::new(json!({ "x": "p" })));
        let report = scraper.scrape_html("   ", None, "x").expect("blank markup is not fatal");

        assert!(report.fingerprint.is_empty());
        assert_eq!(report.fingerprint.warnings, vec![EMPTY_INPUT_WARNING.to_string()]);
        assert!(report.extraction.result.get_texts("x").is_empty());
    }

    #[test]
    fn test_cached_fetcher_plugs_in() {
        let scraper = Scraper::new(CachedFetcher::new(StaticPage), Canned::new(json!({})));
        let _ = scraper.scrape_url("https://shop.test/", "x");
        let _ = scraper.scrape_url("https://shop.test/", "x");

        assert_eq!(scraper.fetcher().cached_len(), 1);
    }
}
