//! Error types for text extraction

use thiserror::Error;

/// Errors that can occur while parsing a document payload
///
/// These never escape the extractor boundary; [`crate::TextExtractor`]
/// converts them into an empty-string result.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Payload could not be parsed as the recognized container format
    #[error("Corrupt or unreadable payload: {0}")]
    CorruptPayload(String),

    /// A logical unit (page) could not be decoded
    #[error("Unreadable page {0}: {1}")]
    UnreadablePage(u32, String),
}

impl From<lopdf::Error> for ExtractError {
    fn from(e: lopdf::Error) -> Self {
        ExtractError::CorruptPayload(e.to_string())
    }
}
