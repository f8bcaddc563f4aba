//! Error types for the ncj library.

use std::io;
use thiserror::Error;

/// Result type alias for ncj operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during conversion.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading media or writing assets.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input element stream is absent or unusable.
    ///
    /// This is the fatal all-or-nothing path: no partial output is
    /// produced when the stream itself cannot be consumed.
    #[error("Invalid input stream: {0}")]
    Input(String),

    /// Error during rendering (JSON serialization).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}
