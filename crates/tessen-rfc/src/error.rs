use thiserror::Error;

use crate::rfc::vcard::text::ParseError;

/// Fatal errors that abort a whole read or write.
///
/// Property-level problems never surface here; they are returned as warnings
/// next to the result.
#[derive(Error, Debug)]
pub enum RfcError {
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("XML error: {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("XML encoding error: {0}")]
    XmlEncodingError(#[from] quick_xml::encoding::EncodingError),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    CoreError(#[from] tessen_core::error::CoreError),
}

pub type RfcResult<T> = std::result::Result<T, RfcError>;
