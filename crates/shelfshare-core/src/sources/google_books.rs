//! Google Books provider (secondary source)
//!
//! API docs: https://developers.google.com/books/docs/v1/using
//! Direct ISBN lookups and free-text queries both go through the one
//! volumes search endpoint. An API key is optional.

use super::traits::{MetadataProvider, SourceError, SourceMetadata};
use super::parse_leading_year;
use crate::domain::{BookPreview, BookSource};
use crate::http::{HttpClient, HttpError};
use crate::isbn;
use async_trait::async_trait;
use serde::Deserialize;

const DIRECT_CONFIDENCE: f32 = 1.0;
const SEARCH_CONFIDENCE: f32 = 0.9;

#[derive(Debug, Deserialize)]
struct VolumesResponse {
    #[serde(default)]
    items: Vec<Volume>,
}

#[derive(Debug, Deserialize)]
struct Volume {
    id: Option<String>,
    #[serde(rename = "volumeInfo")]
    volume_info: VolumeInfo,
}

#[derive(Debug, Deserialize, Default)]
struct VolumeInfo {
    title: Option<String>,
    #[serde(default)]
    authors: Vec<String>,
    publisher: Option<String>,
    #[serde(rename = "publishedDate")]
    published_date: Option<String>,
    description: Option<String>,
    #[serde(rename = "pageCount")]
    page_count: Option<u32>,
    #[serde(default)]
    categories: Vec<String>,
    #[serde(rename = "imageLinks")]
    image_links: Option<ImageLinks>,
    #[serde(rename = "industryIdentifiers", default)]
    industry_identifiers: Vec<IndustryIdentifier>,
}

#[derive(Debug, Deserialize)]
struct ImageLinks {
    thumbnail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IndustryIdentifier {
    #[serde(rename = "type")]
    id_type: String,
    identifier: String,
}

pub struct GoogleBooksSource {
    client: HttpClient,
    base_url: String,
    api_key: Option<String>,
}

impl GoogleBooksSource {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: HttpClient::default(),
            base_url: "https://www.googleapis.com/books/v1".to_string(),
            api_key,
        }
    }

    async fn query_volumes(
        &self,
        query: &str,
        max_results: Option<usize>,
    ) -> Result<VolumesResponse, SourceError> {
        let url = format!("{}/volumes", self.base_url);

        let max_results = max_results.map(|n| n.to_string());
        let mut params: Vec<(&str, &str)> = vec![("q", query)];
        if let Some(ref n) = max_results {
            params.push(("maxResults", n));
        }
        if let Some(ref key) = self.api_key {
            params.push(("key", key));
        }

        let response = self.client.get_with_params(&url, &params).await?;
        if !response.is_success() {
            return Err(SourceError::Http(HttpError::RequestFailed {
                message: format!("Status {}", response.status),
            }));
        }

        serde_json::from_str(&response.body)
            .map_err(|e| SourceError::Parse(format!("Invalid Google Books JSON: {}", e)))
    }
}

#[async_trait]
impl MetadataProvider for GoogleBooksSource {
    fn metadata(&self) -> SourceMetadata {
        SourceMetadata {
            id: "googlebooks",
            name: "Google Books",
            base_url: "https://www.googleapis.com/books/v1",
            rate_limit_per_second: 10.0,
            requires_api_key: false, // Optional, raises the daily quota
        }
    }

    async fn lookup_by_isbn(&self, isbn: &str) -> Result<Option<BookPreview>, SourceError> {
        let response = self.query_volumes(&format!("isbn:{}", isbn), None).await?;
        Ok(response
            .items
            .into_iter()
            .next()
            .and_then(|volume| preview_from_volume(volume, DIRECT_CONFIDENCE)))
    }

    async fn search(
        &self,
        title: &str,
        author: Option<&str>,
        max_results: usize,
    ) -> Result<Vec<BookPreview>, SourceError> {
        let mut query = title.to_string();
        if let Some(author) = author {
            query.push_str(&format!(" inauthor:{}", author));
        }

        let response = self.query_volumes(&query, Some(max_results)).await?;
        Ok(response
            .items
            .into_iter()
            .filter_map(|volume| preview_from_volume(volume, SEARCH_CONFIDENCE))
            .take(max_results)
            .collect())
    }
}

/// Pick the volume's ISBN, preferring the identifier tagged ISBN_13, else
/// the first one present. Providers can return non-13 or malformed codes,
/// so the chosen identifier is re-normalized before use.
fn pick_isbn(identifiers: &[IndustryIdentifier]) -> Option<String> {
    identifiers
        .iter()
        .find(|id| id.id_type == "ISBN_13")
        .or_else(|| identifiers.first())
        .and_then(|id| isbn::normalize_to_isbn13(&id.identifier))
}

/// Thumbnails are served over plaintext HTTP; rewrite to HTTPS.
fn secure_thumbnail_url(url: String) -> String {
    match url.strip_prefix("http://") {
        Some(rest) => format!("https://{}", rest),
        None => url,
    }
}

fn preview_from_volume(volume: Volume, confidence: f32) -> Option<BookPreview> {
    let info = volume.volume_info;
    let title = info.title?;

    Some(BookPreview {
        title,
        author: if info.authors.is_empty() {
            None
        } else {
            Some(info.authors.join(", "))
        },
        isbn: pick_isbn(&info.industry_identifiers),
        publisher: info.publisher,
        published_year: info.published_date.as_deref().and_then(parse_leading_year),
        description: info.description,
        cover_image_url: info
            .image_links
            .and_then(|links| links.thumbnail)
            .map(secure_thumbnail_url),
        genre: info.categories.into_iter().next(),
        page_count: info.page_count,
        source: BookSource::GoogleBooks,
        confidence,
        external_id: volume.id,
    })
}
