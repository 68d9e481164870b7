//! Common traits for metadata providers

use crate::domain::BookPreview;
use crate::http::HttpError;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error(transparent)]
    Http(HttpError),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Rate limited")]
    RateLimit,
}

impl From<HttpError> for SourceError {
    fn from(e: HttpError) -> Self {
        match e {
            HttpError::RateLimited => SourceError::RateLimit,
            other => SourceError::Http(other),
        }
    }
}

/// Metadata about a provider
pub struct SourceMetadata {
    pub id: &'static str,
    pub name: &'static str,
    pub base_url: &'static str,
    pub rate_limit_per_second: f32,
    pub requires_api_key: bool,
}

/// Capability interface over an external book-metadata source.
///
/// Both operations are best-effort from the caller's point of view: a clean
/// not-found is `Ok(None)` / an empty vec, a transport or decode fault is an
/// `Err` that the lookup coordinator absorbs and logs.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    fn metadata(&self) -> SourceMetadata;

    /// Resolve one normalized ISBN-13 to a book preview.
    async fn lookup_by_isbn(&self, isbn: &str) -> Result<Option<BookPreview>, SourceError>;

    /// Free-text title/author search, in the provider's native relevance
    /// order, at most `max_results` entries.
    async fn search(
        &self,
        title: &str,
        author: Option<&str>,
        max_results: usize,
    ) -> Result<Vec<BookPreview>, SourceError>;
}
