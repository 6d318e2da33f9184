//! Error types for curriculum extraction.

use std::io;
use thiserror::Error;

/// Result type alias for curriculum-pdf operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting a curriculum.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// A mandatory numeric or token pattern is absent.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A discipline heading does not split into the expected fields.
    #[error("Malformed heading: {0}")]
    Format(String),

    /// Error while serializing the curriculum record.
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::PdfParse(err.to_string()),
        }
    }
}
