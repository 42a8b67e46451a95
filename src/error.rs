//! Unified error handling for the exposure-matcher library.
//!
//! Loading either input feed can fail; the matching core itself cannot. A gap
//! in the location history is not an error (see [`crate::matching`]), so the
//! variants here all describe load-time failures.

use thiserror::Error;

/// Unified error type for exposure-matcher operations.
#[derive(Debug, Error)]
pub enum CheckerError {
    /// Reading an input file failed.
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be decoded into the expected shape.
    #[error("failed to decode {what}: {source}")]
    Json {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A locations-of-interest time string did not match the feed format.
    #[error("invalid time string '{value}' (expected \"DD/MM/YYYY, H:MM am|pm\"): {source}")]
    InvalidTime {
        value: String,
        #[source]
        source: chrono::format::ParseError,
    },

    /// The locations-of-interest feed is structurally broken.
    #[error("malformed locations-of-interest feed: {message}")]
    MalformedFeed { message: String },

    /// Caller-supplied configuration is unusable.
    #[error("invalid configuration: {message}")]
    Config { message: String },

    /// Downloading the locations-of-interest feed failed.
    #[cfg(feature = "http")]
    #[error("failed to fetch locations-of-interest feed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for exposure-matcher operations.
pub type Result<T> = std::result::Result<T, CheckerError>;
