//! Carelog Document Text Extractor
//!
//! Converts an uploaded document's binary payload into plain text for
//! downstream context assembly. Extraction is attempted only for the
//! recognized container format (`.pdf`, case-insensitive); any other
//! suffix yields empty text without touching the payload.
//!
//! The extractor never raises past its own boundary: any parse failure is
//! downgraded to an empty-string result plus a warning log entry. A
//! document with unextractable text is still stored successfully.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod engine;
pub mod error;
pub mod extractor;

pub use config::ExtractorConfig;
pub use engine::{LopdfEngine, MockPdfEngine, PdfEngine};
pub use error::ExtractError;
pub use extractor::TextExtractor;
