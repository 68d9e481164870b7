//! ISBN codec: validation, normalization, and text mining
//!
//! All functions are pure and perform no I/O. Inputs may carry hyphens and
//! whitespace; they are cleaned at the boundary. The only case-insensitive
//! character is the trailing ISBN-10 check character 'X'.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

lazy_static! {
    // Shape checks applied after cleaning
    static ref ISBN10_SHAPE: Regex = Regex::new(r"^\d{9}[\dXx]$").unwrap();
    static ref ISBN13_SHAPE: Regex = Regex::new(r"^\d{13}$").unwrap();

    // ISBN-shaped token: 10-18 raw characters of digits, hyphens, and spaces,
    // bounded by word boundaries, optionally ending in the ISBN-10 check 'X'
    static ref ISBN_CANDIDATE: Regex = Regex::new(r"\b\d[\d\-\s]{8,16}\d[Xx]?\b").unwrap();
}

/// Contract violations in ISBN conversion
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IsbnError {
    #[error("expected a cleaned 10-character ISBN-10, got {length} characters")]
    InvalidLength { length: usize },
}

/// Remove all whitespace and hyphens from a trimmed input.
///
/// Returns an empty string for blank input. Never fails.
pub fn clean(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}

/// Validate an ISBN-10 by recomputing its check character.
///
/// The all-zero string satisfies the raw checksum arithmetic but is not an
/// assignable ISBN and is rejected.
pub fn is_valid_isbn10(raw: &str) -> bool {
    let isbn = clean(raw);
    if !ISBN10_SHAPE.is_match(&isbn) || isbn.bytes().all(|b| b == b'0') {
        return false;
    }

    let expected = isbn10_check_char(&isbn);
    isbn.chars()
        .nth(9)
        .map(|c| c.to_ascii_uppercase() == expected)
        .unwrap_or(false)
}

/// Validate an ISBN-13 by recomputing its check digit.
pub fn is_valid_isbn13(raw: &str) -> bool {
    let isbn = clean(raw);
    if !ISBN13_SHAPE.is_match(&isbn) || isbn.bytes().all(|b| b == b'0') {
        return false;
    }

    let expected = isbn13_check_digit(&isbn[..12]);
    isbn.chars()
        .nth(12)
        .and_then(|c| c.to_digit(10))
        .map(|d| d == expected)
        .unwrap_or(false)
}

/// True iff the input is a valid ISBN-10 or ISBN-13.
pub fn is_valid(raw: &str) -> bool {
    is_valid_isbn10(raw) || is_valid_isbn13(raw)
}

/// Normalize any valid ISBN to its cleaned 13-digit form.
///
/// Valid ISBN-13 inputs are returned cleaned; valid ISBN-10 inputs are
/// converted. Anything else yields `None` — absence is the failure signal,
/// malformed check digits never raise.
pub fn normalize_to_isbn13(raw: &str) -> Option<String> {
    let isbn = clean(raw);
    if is_valid_isbn13(&isbn) {
        Some(isbn)
    } else if is_valid_isbn10(&isbn) {
        convert_isbn10_to_isbn13(&isbn).ok()
    } else {
        None
    }
}

/// Convert a cleaned 10-character ISBN-10 to ISBN-13.
///
/// Callers are expected to have validated via [`is_valid_isbn10`] first;
/// a non-10-character input is a contract violation and errors.
pub fn convert_isbn10_to_isbn13(isbn10: &str) -> Result<String, IsbnError> {
    if isbn10.chars().count() != 10 {
        return Err(IsbnError::InvalidLength {
            length: isbn10.chars().count(),
        });
    }

    let mut isbn13 = String::with_capacity(13);
    isbn13.push_str("978");
    isbn13.extend(isbn10.chars().take(9));

    let check = isbn13_check_digit(&isbn13);
    isbn13.push(char::from_digit(check, 10).unwrap_or('0'));
    Ok(isbn13)
}

/// Lazily extract all valid ISBNs from free text, normalized to ISBN-13.
///
/// Scans for ISBN-shaped tokens and yields only those that pass checksum
/// validation, in order of first occurrence. Each call performs a fresh scan.
pub fn extract_isbns_from_text(text: &str) -> impl Iterator<Item = String> + '_ {
    ISBN_CANDIDATE
        .find_iter(text)
        .filter_map(|m| normalize_to_isbn13(m.as_str()))
}

/// Check character for a cleaned ISBN-10, computed from the first 9 digits.
fn isbn10_check_char(isbn10: &str) -> char {
    let sum: u32 = isbn10
        .bytes()
        .take(9)
        .enumerate()
        .map(|(i, b)| (10 - i as u32) * (b - b'0') as u32)
        .sum();

    match (11 - sum % 11) % 11 {
        10 => 'X',
        d => char::from_digit(d, 10).unwrap_or('0'),
    }
}

/// Check digit for an ISBN-13, computed from the first 12 digits.
///
/// Weights alternate 1,3,1,3,... with weight 3 on odd 0-based positions.
fn isbn13_check_digit(first12: &str) -> u32 {
    let sum: u32 = first12
        .bytes()
        .take(12)
        .enumerate()
        .map(|(i, b)| {
            let value = (b - b'0') as u32;
            if i % 2 == 0 {
                value
            } else {
                value * 3
            }
        })
        .sum();

    (10 - sum % 10) % 10
}
