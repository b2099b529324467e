//! Error handling for the CLI application

use embedprep_core::CoreError;
use std::fmt;

/// Custom error type for CLI-specific errors
#[derive(Debug)]
pub enum CliError {
    /// Input file not found or inaccessible
    FileNotFound(String),
    /// Bridge request named an action that does not exist
    UnknownAction(String),
    /// Bridge request could not be parsed
    InvalidRequest(String),
    /// Tokenization or chunking error from core
    Core(CoreError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::FileNotFound(path) => write!(f, "File not found: {path}"),
            CliError::UnknownAction(action) => write!(f, "Unknown action: {action}"),
            CliError::InvalidRequest(msg) => write!(f, "Invalid request: {msg}"),
            CliError::Core(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Core(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        CliError::Core(err)
    }
}

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, anyhow::Error>;
