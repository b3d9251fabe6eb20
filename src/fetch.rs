//! Page fetching seam.
//!
//! The crate does no network I/O itself. Callers plug in a [`Fetcher`]
//! (headless browser, HTTP client, fixture loader) and may wrap it in a
//! [`CachedFetcher`] to reuse responses across repeated scrapes of the
//! same URL. The cache is an explicit value owned by the caller; it is
//! never shared implicitly between scrapers.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::error::Result;

/// Retrieves the raw bytes of a page.
///
/// Failures should be reported as [`crate::Error::Fetch`].
pub trait Fetcher {
    /// Fetch `url`.
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

impl<F: Fetcher + ?Sized> Fetcher for &F {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        (**self).fetch(url)
    }
}

/// URL → page bytes.
#[derive(Debug, Clone, Default)]
pub struct FetchCache {
    pages: HashMap<String, Vec<u8>>,
}

impl FetchCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached bytes for `url`.
    #[must_use]
    pub fn get(&self, url: &str) -> Option<&[u8]> {
        self.pages.get(url).map(Vec::as_slice)
    }

    /// Store bytes for `url`, replacing any previous entry.
    pub fn insert(&mut self, url: impl Into<String>, bytes: Vec<u8>) {
        self.pages.insert(url.into(), bytes);
    }

    /// Drop the entry for `url`; returns whether one existed.
    pub fn invalidate(&mut self, url: &str) -> bool {
        self.pages.remove(url).is_some()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.pages.clear();
    }

    /// Number of cached pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// A [`Fetcher`] that consults a [`FetchCache`] before the inner fetcher.
///
/// Failed fetches are not cached.
#[derive(Debug, Default)]
pub struct CachedFetcher<F> {
    inner: F,
    cache: Mutex<FetchCache>,
}

impl<F: Fetcher> CachedFetcher<F> {
    /// Wrap `inner` with an empty cache.
    pub fn new(inner: F) -> Self {
        Self::with_cache(inner, FetchCache::new())
    }

    /// Wrap `inner` with a pre-populated cache.
    pub fn with_cache(inner: F, cache: FetchCache) -> Self {
        Self {
            inner,
            cache: Mutex::new(cache),
        }
    }

    /// Drop the cached page for `url`.
    pub fn invalidate(&self, url: &str) -> bool {
        self.lock().invalidate(url)
    }

    /// Drop every cached page.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of cached pages.
    pub fn cached_len(&self) -> usize {
        self.lock().len()
    }

    /// The wrapped fetcher.
    pub fn inner(&self) -> &F {
        &self.inner
    }

    /// Unwrap into the inner fetcher and the cache.
    pub fn into_parts(self) -> (F, FetchCache) {
        let cache = self.cache.into_inner().unwrap_or_else(PoisonError::into_inner);
        (self.inner, cache)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FetchCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<F: Fetcher> Fetcher for CachedFetcher<F> {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        if let Some(bytes) = self.lock().get(url) {
            debug!(url, "fetch cache hit");
            return Ok(bytes.to_vec());
        }
        // The lock is not held across the inner fetch.
        let bytes = self.inner.fetch(url)?;
        self.lock().insert(url, bytes.clone());
        Ok(bytes)
    }
}
