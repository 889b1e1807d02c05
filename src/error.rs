//! Error types for the capture pipeline.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// `OpenCV` operation failed
    #[error("OpenCV error: {0}")]
    OpenCV(#[from] opencv::Error),

    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Camera could not be opened or a frame could not be read
    #[error("Capture error: {0}")]
    Capture(String),

    /// Video writer could not be allocated for a new recording session
    #[error("Recording open error: {0}")]
    RecordingOpen(String),

    /// Appending a frame to an open recording failed
    #[error("Recording write error: {0}")]
    RecordingWrite(String),

    /// Screenshot could not be encoded or stored
    #[error("Screenshot error: {0}")]
    Screenshot(String),

    /// Display window could not be created or updated
    #[error("Display error: {0}")]
    Display(String),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::ConfigError(err.to_string())
    }
}
