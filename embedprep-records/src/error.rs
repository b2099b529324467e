//! Record fetching errors

use thiserror::Error;

/// Errors raised while fetching, joining or writing records
#[derive(Error, Debug)]
pub enum RecordsError {
    /// No API key was configured
    #[error("API key not set (expected in AIRTABLE_API_KEY or the config file)")]
    MissingApiKey,

    /// Request could not be sent or the body could not be read
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("request to {url} failed with status {status}: {body}")]
    Status {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
        /// Response body, as far as it could be read
        body: String,
    },

    /// Client configuration is unusable
    #[error("configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for record operations
pub type Result<T> = std::result::Result<T, RecordsError>;
