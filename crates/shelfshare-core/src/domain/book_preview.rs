//! Unsaved candidate book records produced by lookup or OCR

use serde::{Deserialize, Serialize};

/// Where a book candidate came from
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum BookSource {
    Local,
    OpenLibrary,
    GoogleBooks,
    OcrText,
}

impl BookSource {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            BookSource::Local => "local",
            BookSource::OpenLibrary => "openlibrary",
            BookSource::GoogleBooks => "googlebooks",
            BookSource::OcrText => "ocrtext",
        }
    }
}

/// An unsaved candidate book description assembled from an external source
/// or OCR text.
///
/// Immutable once produced; a confirmation step outside this crate decides
/// whether to persist it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BookPreview {
    pub title: String,
    pub author: Option<String>,
    /// Normalized 13-digit ISBN, when known
    pub isbn: Option<String>,
    pub publisher: Option<String>,
    pub published_year: Option<i32>,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    pub genre: Option<String>,
    pub page_count: Option<u32>,
    pub source: BookSource,
    /// How confident the originating lookup is, in [0, 1]
    pub confidence: f32,
    /// Opaque provider-side id used for de-duplication against the source
    pub external_id: Option<String>,
}

impl BookPreview {
    /// Minimal preview with only a title and source; everything else absent.
    pub fn with_title(title: impl Into<String>, source: BookSource, confidence: f32) -> Self {
        Self {
            title: title.into(),
            author: None,
            isbn: None,
            publisher: None,
            published_year: None,
            description: None,
            cover_image_url: None,
            genre: None,
            page_count: None,
            source,
            confidence,
            external_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_as_str() {
        assert_eq!(BookSource::OpenLibrary.as_str(), "openlibrary");
        assert_eq!(BookSource::GoogleBooks.as_str(), "googlebooks");
        assert_eq!(BookSource::OcrText.as_str(), "ocrtext");
    }

    #[test]
    fn test_with_title_defaults() {
        let preview = BookPreview::with_title("Dune", BookSource::Local, 1.0);
        assert_eq!(preview.title, "Dune");
        assert!(preview.isbn.is_none());
        assert_eq!(preview.confidence, 1.0);
    }
}
