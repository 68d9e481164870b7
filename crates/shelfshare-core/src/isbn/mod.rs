//! ISBN handling: cleaning, checksum validation, format conversion, and
//! extraction of ISBN-shaped tokens from free text

mod codec;

pub use codec::*;
