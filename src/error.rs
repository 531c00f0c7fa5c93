//! Error types for unoutline library.

use std::io;
use thiserror::Error;

/// Result type alias for unoutline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised at the input and output boundary.
///
/// Classification itself never fails; a document with no usable text yields
/// an empty result instead.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not a valid block dump.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Extraction options are out of range.
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// Error during rendering.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidInput(err.to_string())
    }
}
