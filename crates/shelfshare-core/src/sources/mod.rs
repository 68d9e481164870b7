//! Metadata providers for resolving book details from online sources

pub mod google_books;
pub mod open_library;
pub mod traits;

pub use google_books::GoogleBooksSource;
pub use open_library::OpenLibrarySource;
pub use traits::{MetadataProvider, SourceError, SourceMetadata};

/// Parse a publication year from the leading 4 characters of a date-like
/// string. Anything outside [1000, 9999] is an unknown year, not an error.
pub(crate) fn parse_leading_year(date: &str) -> Option<i32> {
    let prefix: String = date.trim().chars().take(4).collect();
    if prefix.chars().count() != 4 {
        return None;
    }
    prefix.parse::<i32>().ok().filter(|y| (1000..=9999).contains(y))
}
