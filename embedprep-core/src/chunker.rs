//! Token-bounded chunking with overlap

use crate::{
    config::ChunkConfig,
    error::Result,
    scheme::TokenScheme,
};
use std::ops::Range;
use std::sync::Arc;

/// Most tokens a window edge is moved to land on a decodable boundary.
/// One UTF-8 character spans at most four bytes, so at most three tokens.
const MAX_EDGE_RETRACT: usize = 3;

/// A chunk of text with its token range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Position in the chunk set
    pub index: usize,
    /// First token of the chunk in the source sequence
    pub start: usize,
    /// One past the last token of the chunk
    pub end: usize,
    /// Decoded text
    pub text: String,
}

impl Chunk {
    /// Number of tokens covered by the chunk
    pub fn token_len(&self) -> usize {
        self.end - self.start
    }

    /// Token range in the source sequence
    pub fn token_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Splits text into overlapping windows of at most `max_tokens` tokens
pub struct TokenChunker {
    scheme: Arc<dyn TokenScheme>,
    config: ChunkConfig,
}

impl std::fmt::Debug for TokenChunker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenChunker")
            .field("scheme", &self.scheme.name())
            .field("config", &self.config)
            .finish()
    }
}

impl TokenChunker {
    /// Create a new chunker
    pub fn new(scheme: Arc<dyn TokenScheme>, config: ChunkConfig) -> Self {
        Self { scheme, config }
    }

    /// The configuration in use
    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }

    /// The scheme in use
    pub fn scheme(&self) -> &dyn TokenScheme {
        self.scheme.as_ref()
    }

    /// Chunk text and return only the chunk texts
    pub fn chunk_text(&self, text: &str) -> Result<Vec<String>> {
        Ok(self
            .chunk(text)?
            .into_iter()
            .map(|chunk| chunk.text)
            .collect())
    }

    /// Tokenize and chunk text
    pub fn chunk(&self, text: &str) -> Result<Vec<Chunk>> {
        let tokens = self.scheme.encode(text);
        self.chunk_tokens(&tokens)
    }

    /// Chunk an already tokenized sequence
    pub fn chunk_tokens(&self, tokens: &[u32]) -> Result<Vec<Chunk>> {
        self.config.validate()?;

        let total = tokens.len();
        let max_tokens = self.config.max_tokens;
        let overlap = self.config.overlap_tokens;

        let mut chunks = Vec::new();
        let mut start = 0;
        let mut stalled = false;

        while start < total {
            let end = start.saturating_add(max_tokens).min(total);
            let (range, text) = self.decode_window(tokens, start, end);
            let window_end = range.end;

            chunks.push(Chunk {
                index: chunks.len(),
                start: range.start,
                end: range.end,
                text,
            });

            if window_end >= total {
                break;
            }

            // Move with overlap
            let next_start = window_end.saturating_sub(overlap);
            if next_start > start {
                start = next_start;
            } else {
                if !stalled {
                    log::warn!(
                        "overlap of {overlap} tokens leaves no forward stride at token {start}; \
                         continuing without overlap"
                    );
                    stalled = true;
                }
                start = window_end;
            }
        }

        log::debug!(
            "Chunked {} tokens into {} chunks (max {}, overlap {})",
            total,
            chunks.len(),
            max_tokens,
            overlap
        );

        Ok(chunks)
    }

    /// Decode `tokens[start..end]`, nudging the edges onto decodable
    /// boundaries when the window splits a character
    ///
    /// A window that cannot be nudged onto whole characters (a budget
    /// smaller than one character's tokens) is decoded lossily as is.
    fn decode_window(&self, tokens: &[u32], start: usize, end: usize) -> (Range<usize>, String) {
        let end_slack = if end < tokens.len() {
            MAX_EDGE_RETRACT
        } else {
            0
        };
        let start_slack = if start > 0 { MAX_EDGE_RETRACT } else { 0 };

        for trim_end in 0..=end_slack {
            let Some(hi) = end.checked_sub(trim_end) else {
                break;
            };
            for trim_start in 0..=start_slack {
                let lo = start + trim_start;
                if lo >= hi {
                    break;
                }
                if let Ok(text) = self.scheme.decode(&tokens[lo..hi]) {
                    if lo != start || hi != end {
                        log::debug!("Window {start}..{end} adjusted to {lo}..{hi}");
                    }
                    return (lo..hi, text);
                }
            }
        }

        log::debug!("Window {start}..{end} splits a character; decoding lossily");
        (start..end, self.scheme.decode_lossy(&tokens[start..end]))
    }
}
