//! Token-bounded text chunking for embedding models
//!
//! This crate tokenizes text with a named BPE scheme, counts tokens, and
//! splits text into overlapping chunks that each fit a token budget.

#![warn(missing_docs)]

pub mod chunker;
pub mod config;
pub mod error;
pub mod scheme;

// Re-export key types
pub use chunker::{Chunk, TokenChunker};
pub use config::{ChunkConfig, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_OVERLAP_TOKENS};
pub use error::{CoreError, Result};
pub use scheme::{supported_encodings, SchemeRegistry, TiktokenScheme, TokenScheme};

use std::sync::Arc;

/// Count the tokens `text` encodes to under the named scheme
pub fn count_tokens(text: &str, scheme_name: &str) -> Result<usize> {
    let scheme = TiktokenScheme::load(scheme_name)?;
    Ok(scheme.count(text))
}

/// Chunk `text` under the named scheme and return the chunk texts
pub fn chunk_text(
    text: &str,
    scheme_name: &str,
    max_tokens: usize,
    overlap_tokens: usize,
) -> Result<Vec<String>> {
    let scheme = Arc::new(TiktokenScheme::load(scheme_name)?);
    let chunker = TokenChunker::new(scheme, ChunkConfig::new(max_tokens, overlap_tokens)?);
    chunker.chunk_text(text)
}
