//! Core error types

use thiserror::Error;

/// Errors raised while tokenizing or chunking text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Requested tokenization scheme is not supported or failed to load
    #[error("tokenization scheme '{name}' unavailable: {reason}")]
    SchemeUnavailable {
        /// The model or encoding name that was requested
        name: String,
        /// Why the scheme could not be loaded
        reason: String,
    },

    /// Chunking parameters are out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A token window could not be decoded back to text
    #[error("failed to decode tokens {start}..{end}: {reason}")]
    Decode {
        /// First token of the window
        start: usize,
        /// One past the last token of the window
        end: usize,
        /// Decoder message
        reason: String,
    },
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
