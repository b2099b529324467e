//! embedprep CLI library
//!
//! This library provides the command-line interface over the token
//! chunking core and the transcript record pipeline.

pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod progress;

pub use error::{CliError, CliResult};
