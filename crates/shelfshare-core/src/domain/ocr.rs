//! OCR extraction results and the recognized-text input shape
//!
//! The image-analysis call itself lives outside this crate; it hands us raw
//! recognized text plus per-word confidences, and we hand back the mined
//! identifiers and title candidates.

use serde::{Deserialize, Serialize};

/// One recognized word with the confidence reported by the OCR engine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecognizedWord {
    pub text: String,
    /// Engine-reported confidence in [0, 1]
    pub confidence: f32,
}

/// Everything mined from one OCR pass. Immutable once produced.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OcrExtractionResult {
    /// Normalized ISBN-13 strings, duplicates removed, first-seen order
    pub detected_isbns: Vec<String>,
    /// Candidate title lines, duplicates removed
    pub detected_titles: Vec<String>,
    /// Full extracted text as supplied by the OCR engine
    pub raw_text: String,
    /// Mean of the word-level confidences; 0 when nothing was recognized
    pub confidence: f32,
}
