//! Domain models shared across the core

mod book_preview;
mod ocr;

pub use book_preview::{BookPreview, BookSource};
pub use ocr::{OcrExtractionResult, RecognizedWord};
