//! Error types for the opentrack crates.

use thiserror::Error;

/// Errors that can occur in opentrack operations.
#[derive(Error, Debug)]
pub enum OpenTrackError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Geocoding provider error: {0}")]
    Provider(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for opentrack operations.
pub type OpenTrackResult<T> = Result<T, OpenTrackError>;
