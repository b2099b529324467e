//! Output formatting module

use anyhow::Result;
use embedprep_core::Chunk;

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format and output a single chunk
    fn format_chunk(&mut self, chunk: &Chunk) -> Result<()>;

    /// Finalize output (e.g., close JSON array)
    fn finish(&mut self) -> Result<()>;
}

pub mod json;
pub mod markdown;
pub mod text;

pub use json::JsonFormatter;
pub use markdown::MarkdownFormatter;
pub use text::TextFormatter;
