//! shelfshare-core: core library for the shelfshare book-lending app
//!
//! This library provides pure Rust implementations of:
//! - ISBN-10/ISBN-13 cleaning, checksum validation, and 10→13 conversion
//! - ISBN and title-candidate mining from OCR text
//! - Multi-source book metadata lookup (Open Library primary, Google Books
//!   fallback) with courtesy rate limiting toward the primary source
//!
//! Persistence, HTTP routing, auth, and the OCR image-analysis call itself
//! all live in the host application, not here.

pub mod domain;
pub mod http;
pub mod isbn;
pub mod lookup;
pub mod ocr;
pub mod sources;

// Re-export main types for convenience
pub use domain::{BookPreview, BookSource, OcrExtractionResult, RecognizedWord};
pub use lookup::{BookLookupCoordinator, LookupConfig, DEFAULT_MAX_RESULTS};
pub use ocr::ScanMode;
pub use sources::{MetadataProvider, SourceError, SourceMetadata};

/// Returns the version of shelfshare-core
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
