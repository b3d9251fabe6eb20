//! Error types for rs-intelliscrape.
//!
//! Only failures that leave a request without a document (or without a
//! usable selector map) are errors. Problems local to one element or one
//! selector are reported as warnings/failures on the result types instead.

/// Error type for scraping operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The fetch collaborator could not retrieve the page.
    #[error("Fetching {url} failed: {reason}")]
    Fetch {
        /// URL that was requested.
        url: String,
        /// Collaborator-supplied reason.
        reason: String,
    },

    /// A CSS selector did not compile.
    #[error("Invalid CSS selector `{selector}`: {reason}")]
    InvalidSelector {
        /// The offending selector text.
        selector: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// An XPath expression is malformed or outside the supported subset.
    #[error("Invalid XPath `{expression}`: {reason}")]
    InvalidXPath {
        /// The offending expression.
        expression: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// The selector inference step returned something that is not a label map.
    #[error("Selector map must be a JSON object, got {0}")]
    InvalidSelectorMap(String),

    /// The selector inference collaborator failed.
    #[error("Selector inference failed: {0}")]
    Inference(String),
}

/// Result type alias for scraping operations.
pub type Result<T> = std::result::Result<T, Error>;
