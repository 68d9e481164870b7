//! Book metadata lookup with primary/secondary fallback
//!
//! Open Library is consulted first, Google Books on any miss or failure.
//! Provider faults never escape this module: callers only ever see found
//! or not-found, and a failed call is logged and treated as a miss.

use crate::domain::BookPreview;
use crate::http::RateLimiter;
use crate::isbn;
use crate::sources::{GoogleBooksSource, MetadataProvider, OpenLibrarySource, SourceError};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

/// Default search result cap
pub const DEFAULT_MAX_RESULTS: usize = 5;

/// Values consumed by the coordinator; how they are loaded is the host
/// application's concern.
#[derive(Clone, Debug)]
pub struct LookupConfig {
    /// Courtesy delay between Open Library requests, in milliseconds
    pub open_library_request_delay_ms: u64,
    /// Optional Google Books API key (raises the daily quota)
    pub google_books_api_key: Option<String>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            open_library_request_delay_ms: 1000,
            google_books_api_key: None,
        }
    }
}

/// Resolves book metadata for ISBNs and title/author queries.
///
/// Constructed once per process; the Open Library rate-limit timestamp it
/// wires up is the only state that outlives a call.
pub struct BookLookupCoordinator {
    primary: Arc<dyn MetadataProvider>,
    secondary: Arc<dyn MetadataProvider>,
}

impl BookLookupCoordinator {
    pub fn new(config: LookupConfig) -> Self {
        let limiter = Arc::new(RateLimiter::new(Duration::from_millis(
            config.open_library_request_delay_ms,
        )));

        Self {
            primary: Arc::new(OpenLibrarySource::new(limiter)),
            secondary: Arc::new(GoogleBooksSource::new(config.google_books_api_key)),
        }
    }

    /// Substitute providers, used by tests and by callers that bring their
    /// own sources.
    pub fn with_providers(
        primary: Arc<dyn MetadataProvider>,
        secondary: Arc<dyn MetadataProvider>,
    ) -> Self {
        Self { primary, secondary }
    }

    /// Resolve one ISBN to a book preview, or `None` if neither provider
    /// knows it.
    ///
    /// Input that fails normalization is rejected before any network call.
    pub async fn lookup_by_isbn(&self, raw: &str) -> Option<BookPreview> {
        let Some(isbn) = isbn::normalize_to_isbn13(raw) else {
            warn!(raw, "not a valid ISBN, skipping lookup");
            return None;
        };

        if let Some(preview) = self.try_lookup(self.primary.as_ref(), &isbn).await {
            return Some(preview);
        }
        self.try_lookup(self.secondary.as_ref(), &isbn).await
    }

    /// Title/author search across both providers.
    ///
    /// Primary results come first in their native relevance order; when the
    /// primary returns fewer than `max_results`, the secondary fills the
    /// remainder. Search confidence is a fixed 0.9 — neither provider
    /// exposes a ranking signal to do better with.
    pub async fn search(
        &self,
        title: &str,
        author: Option<&str>,
        max_results: usize,
    ) -> Vec<BookPreview> {
        let mut results = match self.primary.search(title, author, max_results).await {
            Ok(results) => results,
            Err(e) => {
                self.log_failure(self.primary.as_ref(), &e);
                Vec::new()
            }
        };

        if results.len() < max_results {
            let remaining = max_results - results.len();
            match self.secondary.search(title, author, remaining).await {
                Ok(more) => results.extend(more),
                Err(e) => self.log_failure(self.secondary.as_ref(), &e),
            }
        }

        results.truncate(max_results);
        results
    }

    /// Look up a batch of ISBNs sequentially, respecting the primary
    /// provider's courtesy delay.
    ///
    /// Duplicates are looked up once regardless of their position. When the
    /// token fires, remaining iterations are skipped and the results already
    /// gathered are returned as-is.
    pub async fn lookup_multiple_isbns(
        &self,
        isbns: &[String],
        cancel: &CancellationToken,
    ) -> Vec<BookPreview> {
        let mut seen = HashSet::new();
        let mut results = Vec::new();

        for raw in isbns {
            if cancel.is_cancelled() {
                debug!(
                    resolved = results.len(),
                    "batch lookup cancelled, returning partial results"
                );
                break;
            }

            // Duplicates are detected on the normalized form so that dashed
            // and ISBN-10 spellings of the same book collapse together.
            let key = isbn::normalize_to_isbn13(raw).unwrap_or_else(|| raw.clone());
            if !seen.insert(key) {
                continue;
            }

            if let Some(preview) = self.lookup_by_isbn(raw).await {
                results.push(preview);
            }
        }

        results
    }

    async fn try_lookup(&self, provider: &dyn MetadataProvider, isbn: &str) -> Option<BookPreview> {
        match provider.lookup_by_isbn(isbn).await {
            Ok(Some(preview)) => Some(preview),
            Ok(None) => {
                debug!(source = provider.metadata().id, isbn, "no result");
                None
            }
            Err(e) => {
                self.log_failure(provider, &e);
                None
            }
        }
    }

    fn log_failure(&self, provider: &dyn MetadataProvider, error: &SourceError) {
        error!(
            source = provider.metadata().id,
            error = %error,
            "provider call failed, treating as a miss"
        );
    }
}

impl Default for BookLookupCoordinator {
    fn default() -> Self {
        Self::new(LookupConfig::default())
    }
}
