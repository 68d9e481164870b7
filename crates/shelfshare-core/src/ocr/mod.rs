//! Mining ISBNs and title candidates from recognized cover/shelf text
//!
//! The image-analysis call lives outside this crate; what arrives here is
//! its raw text plus per-word confidences. ISBN mining runs an explicit
//! `ISBN:`-label pass before the general token scan; title mining filters
//! and scores lines with a small heuristic tuned for cover typography.

use crate::domain::{OcrExtractionResult, RecognizedWord};
use crate::isbn;
use lazy_static::lazy_static;
use regex::Regex;
use std::cmp::Ordering;
use std::collections::HashSet;

lazy_static! {
    // Explicitly labeled ISBNs; the label itself is optional so this pass
    // also picks up bare numbers printed next to barcodes
    static ref LABELED_ISBN: Regex =
        Regex::new(r"(?i)(?:ISBN[:\-\s]*)?(\d[\d\-\s]{8,16}[\dXx])").unwrap();
}

/// Cover-text lines containing any of these are never title candidates.
const NOT_A_TITLE_MARKERS: [&str; 17] = [
    "isbn",
    "barcode",
    "price",
    "copyright",
    "published",
    "printed",
    "all rights reserved",
    "edition",
    "www.",
    "http",
    ".com",
    ".org",
    "chapter",
    "page",
    "index",
    "contents",
    "acknowledgments",
];

const TITLE_MIN_LEN: usize = 3;
const TITLE_MAX_LEN: usize = 200;

/// Single-book scans keep this many of the best-scoring lines.
const SINGLE_BOOK_TOP: usize = 3;
/// Bookshelf scans keep every line above this score, capped below.
const BOOKSHELF_SCORE_FLOOR: f32 = 0.3;
const BOOKSHELF_CAP: usize = 50;

/// What kind of photo the text came from; drives how many title candidates
/// are kept and how they are ordered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanMode {
    /// One cover: the few best-scoring lines, best first
    SingleBook,
    /// A whole shelf: every plausible spine, in encounter order
    Bookshelf,
}

/// Mine one OCR pass into an immutable extraction result.
pub fn extract_from_text(
    text: &str,
    words: &[RecognizedWord],
    mode: ScanMode,
) -> OcrExtractionResult {
    OcrExtractionResult {
        detected_isbns: extract_isbn_candidates(text),
        detected_titles: extract_title_candidates(text, mode),
        raw_text: text.to_string(),
        confidence: mean_word_confidence(words),
    }
}

/// All valid ISBNs in the text, normalized to ISBN-13, duplicates removed.
///
/// The labeled pass runs first, then the general token scan; label hits
/// keep their position at the front of the result.
pub fn extract_isbn_candidates(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut isbns = Vec::new();

    for cap in LABELED_ISBN.captures_iter(text) {
        if let Some(m) = cap.get(1) {
            if let Some(normalized) = isbn::normalize_to_isbn13(m.as_str()) {
                if seen.insert(normalized.clone()) {
                    isbns.push(normalized);
                }
            }
        }
    }

    for normalized in isbn::extract_isbns_from_text(text) {
        if seen.insert(normalized.clone()) {
            isbns.push(normalized);
        }
    }

    isbns
}

/// Candidate title lines per the scan mode, duplicates removed preserving
/// first occurrence.
pub fn extract_title_candidates(text: &str, mode: ScanMode) -> Vec<String> {
    let mut seen = HashSet::new();
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| looks_like_title(line))
        .filter(|line| seen.insert(line.to_string()))
        .collect();

    match mode {
        ScanMode::SingleBook => {
            let mut scored: Vec<(&str, f32)> = lines
                .into_iter()
                .map(|line| (line, score_title_line(line)))
                .collect();
            // Stable sort keeps encounter order among equal scores
            scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
            scored
                .into_iter()
                .take(SINGLE_BOOK_TOP)
                .map(|(line, _)| line.to_string())
                .collect()
        }
        ScanMode::Bookshelf => lines
            .into_iter()
            .filter(|line| score_title_line(line) > BOOKSHELF_SCORE_FLOOR)
            .take(BOOKSHELF_CAP)
            .map(str::to_string)
            .collect(),
    }
}

/// Heuristic title score in [0, 1]. Favors mid-length mixed-case lines,
/// penalizes shouty and digit-heavy ones.
pub fn score_title_line(line: &str) -> f32 {
    let len = line.chars().count();
    let starts_upper = line.chars().next().map_or(false, char::is_uppercase);
    let has_lower = line.chars().any(char::is_lowercase);
    let has_upper = line.chars().any(char::is_uppercase);
    let has_alpha = line.chars().any(char::is_alphabetic);
    let digits = line.chars().filter(|c| c.is_ascii_digit()).count();

    let mut score: f32 = 0.5;
    if (10..=100).contains(&len) {
        score += 0.2;
    }
    if starts_upper && has_lower {
        score += 0.1;
    }
    if has_alpha {
        score += 0.1;
    }
    if has_upper && !has_lower && len > 10 {
        score -= 0.1;
    }
    if len > 0 && digits as f32 / len as f32 > 0.3 {
        score -= 0.2;
    }

    score.clamp(0.0, 1.0)
}

fn looks_like_title(line: &str) -> bool {
    let len = line.chars().count();
    if !(TITLE_MIN_LEN..=TITLE_MAX_LEN).contains(&len) {
        return false;
    }

    let lower = line.to_lowercase();
    if NOT_A_TITLE_MARKERS
        .iter()
        .any(|marker| lower.contains(marker))
    {
        return false;
    }

    // Prices and barcode digits
    if line.chars().all(|c| {
        c.is_ascii_digit() || c.is_whitespace() || matches!(c, '$' | '€' | '£' | '¥' | '.' | ',' | '-')
    }) {
        return false;
    }

    // Short shouty tokens: spine codes, publisher marks
    if len <= 5 && line.chars().any(char::is_alphabetic) && !line.chars().any(char::is_lowercase) {
        return false;
    }

    true
}

fn mean_word_confidence(words: &[RecognizedWord]) -> f32 {
    if words.is_empty() {
        return 0.0;
    }
    words.iter().map(|w| w.confidence).sum::<f32>() / words.len() as f32
}
