//! Open Library provider (primary source)
//!
//! API docs: https://openlibrary.org/developers/api
//! No enforced quota; a courtesy delay is applied before every request,
//! including the follow-up work and author requests of one ISBN lookup.

use super::traits::{MetadataProvider, SourceError, SourceMetadata};
use super::parse_leading_year;
use crate::domain::{BookPreview, BookSource};
use crate::http::{HttpClient, HttpError, RateLimiter};
use crate::isbn;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

/// Author display names are resolved one request each; more than this many
/// referenced authors are left unresolved.
const MAX_AUTHOR_LOOKUPS: usize = 3;

/// Direct ISBN hits are exact; search matches are inherently fuzzier.
const DIRECT_CONFIDENCE: f32 = 1.0;
const SEARCH_CONFIDENCE: f32 = 0.9;

#[derive(Debug, Deserialize)]
struct KeyRef {
    key: String,
}

#[derive(Debug, Deserialize)]
struct EditionRecord {
    key: Option<String>,
    title: Option<String>,
    #[serde(default)]
    authors: Vec<KeyRef>,
    #[serde(default)]
    publishers: Vec<String>,
    publish_date: Option<String>,
    number_of_pages: Option<u32>,
    #[serde(default)]
    covers: Vec<i64>,
    #[serde(default)]
    works: Vec<KeyRef>,
}

#[derive(Debug, Deserialize)]
struct WorkRecord {
    description: Option<WorkDescription>,
}

/// Work descriptions come back either as a plain string or as a typed
/// object with a nested value field; both shapes must be handled.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WorkDescription {
    Text(String),
    Object { value: String },
}

impl WorkDescription {
    fn into_text(self) -> String {
        match self {
            WorkDescription::Text(text) => text,
            WorkDescription::Object { value } => value,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AuthorRecord {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<SearchDoc>,
}

#[derive(Debug, Deserialize)]
struct SearchDoc {
    key: Option<String>,
    title: Option<String>,
    author_name: Option<Vec<String>>,
    isbn: Option<Vec<String>>,
    first_publish_year: Option<i32>,
    cover_i: Option<i64>,
}

pub struct OpenLibrarySource {
    client: HttpClient,
    limiter: Arc<RateLimiter>,
    base_url: String,
}

impl OpenLibrarySource {
    pub fn new(limiter: Arc<RateLimiter>) -> Self {
        Self {
            client: HttpClient::default(),
            limiter,
            base_url: "https://openlibrary.org".to_string(),
        }
    }

    #[cfg(test)]
    fn with_base_url(limiter: Arc<RateLimiter>, base_url: &str) -> Self {
        Self {
            client: HttpClient::default(),
            limiter,
            base_url: base_url.to_string(),
        }
    }

    async fn throttled_get(&self, url: &str) -> Result<crate::http::HttpResponse, SourceError> {
        self.limiter.throttle().await;
        Ok(self.client.get(url).await?)
    }

    /// One follow-up request for the work-level description. Best effort: a
    /// failure here degrades to no description, never to a failed lookup.
    async fn fetch_work_description(&self, work_key: &str) -> Option<String> {
        let url = format!("{}{}.json", self.base_url, work_key);
        match self.throttled_get(&url).await {
            Ok(response) if response.is_success() => {
                serde_json::from_str::<WorkRecord>(&response.body)
                    .ok()
                    .and_then(|work| work.description)
                    .map(WorkDescription::into_text)
            }
            Ok(response) => {
                debug!(status = response.status, work_key, "work fetch returned non-success");
                None
            }
            Err(e) => {
                debug!(error = %e, work_key, "work fetch failed");
                None
            }
        }
    }

    /// Resolve referenced author keys to display names, capped at
    /// [`MAX_AUTHOR_LOOKUPS`] requests, joined with `", "`.
    async fn fetch_author_names(&self, authors: &[KeyRef]) -> Option<String> {
        let mut names = Vec::new();

        for author_ref in authors.iter().take(MAX_AUTHOR_LOOKUPS) {
            let url = format!("{}{}.json", self.base_url, author_ref.key);
            match self.throttled_get(&url).await {
                Ok(response) if response.is_success() => {
                    if let Some(name) = serde_json::from_str::<AuthorRecord>(&response.body)
                        .ok()
                        .and_then(|record| record.name)
                    {
                        names.push(name);
                    }
                }
                Ok(response) => {
                    debug!(status = response.status, "author fetch returned non-success");
                }
                Err(e) => {
                    debug!(error = %e, "author fetch failed");
                }
            }
        }

        if names.is_empty() {
            None
        } else {
            Some(names.join(", "))
        }
    }
}

#[async_trait]
impl MetadataProvider for OpenLibrarySource {
    fn metadata(&self) -> SourceMetadata {
        SourceMetadata {
            id: "openlibrary",
            name: "Open Library",
            base_url: "https://openlibrary.org",
            rate_limit_per_second: 1.0,
            requires_api_key: false,
        }
    }

    async fn lookup_by_isbn(&self, isbn: &str) -> Result<Option<BookPreview>, SourceError> {
        let url = format!("{}/isbn/{}.json", self.base_url, isbn);
        let response = self.throttled_get(&url).await?;

        if response.status == 404 {
            return Ok(None);
        }
        if !response.is_success() {
            return Err(SourceError::Http(HttpError::RequestFailed {
                message: format!("Status {}", response.status),
            }));
        }

        let edition: EditionRecord = serde_json::from_str(&response.body)
            .map_err(|e| SourceError::Parse(format!("Invalid Open Library JSON: {}", e)))?;

        let description = match edition.works.first() {
            Some(work) => self.fetch_work_description(&work.key).await,
            None => None,
        };
        let author = self.fetch_author_names(&edition.authors).await;

        Ok(preview_from_edition(edition, isbn, author, description))
    }

    async fn search(
        &self,
        title: &str,
        author: Option<&str>,
        max_results: usize,
    ) -> Result<Vec<BookPreview>, SourceError> {
        let mut query = title.to_string();
        if let Some(author) = author {
            query.push(' ');
            query.push_str(author);
        }

        let url = format!("{}/search.json", self.base_url);
        let limit = max_results.to_string();
        self.limiter.throttle().await;
        let response = self
            .client
            .get_with_params(&url, &[("q", &query), ("limit", &limit)])
            .await?;

        if !response.is_success() {
            return Err(SourceError::Http(HttpError::RequestFailed {
                message: format!("Status {}", response.status),
            }));
        }

        let parsed: SearchResponse = serde_json::from_str(&response.body)
            .map_err(|e| SourceError::Parse(format!("Invalid Open Library JSON: {}", e)))?;

        Ok(parsed
            .docs
            .into_iter()
            .filter_map(preview_from_doc)
            .take(max_results)
            .collect())
    }
}

/// Deterministic cover URL for a numeric Open Library cover id.
fn cover_url(cover_id: i64) -> String {
    format!("https://covers.openlibrary.org/b/id/{}-L.jpg", cover_id)
}

fn preview_from_edition(
    edition: EditionRecord,
    isbn: &str,
    author: Option<String>,
    description: Option<String>,
) -> Option<BookPreview> {
    let title = edition.title?;

    Some(BookPreview {
        title,
        author,
        isbn: Some(isbn.to_string()),
        publisher: edition.publishers.into_iter().next(),
        published_year: edition.publish_date.as_deref().and_then(parse_leading_year),
        description,
        cover_image_url: edition
            .covers
            .iter()
            .find(|id| **id > 0)
            .map(|id| cover_url(*id)),
        genre: None,
        page_count: edition.number_of_pages,
        source: BookSource::OpenLibrary,
        confidence: DIRECT_CONFIDENCE,
        external_id: edition.key,
    })
}

fn preview_from_doc(doc: SearchDoc) -> Option<BookPreview> {
    let title = doc.title?;

    Some(BookPreview {
        title,
        author: doc.author_name.map(|names| names.join(", ")),
        isbn: doc
            .isbn
            .iter()
            .flatten()
            .find_map(|raw| isbn::normalize_to_isbn13(raw)),
        publisher: None,
        published_year: doc.first_publish_year,
        description: None,
        cover_image_url: doc.cover_i.filter(|id| *id > 0).map(cover_url),
        genre: None,
        page_count: None,
        source: BookSource::OpenLibrary,
        confidence: SEARCH_CONFIDENCE,
        external_id: doc.key,
    })
}
