//! Chunking configuration

use crate::error::{CoreError, Result};

/// Default embedding model whose encoding is used when none is given
pub const DEFAULT_MODEL: &str = "text-embedding-3-small";

/// Context limit of the default embedding model
pub const DEFAULT_MAX_TOKENS: usize = 8191;

/// Tokens repeated between consecutive chunks by default
pub const DEFAULT_OVERLAP_TOKENS: usize = 50;

/// Token budget and overlap for a chunking run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkConfig {
    /// Maximum tokens per chunk
    pub max_tokens: usize,
    /// Tokens shared between the end of one chunk and the start of the next
    pub overlap_tokens: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            overlap_tokens: DEFAULT_OVERLAP_TOKENS,
        }
    }
}

impl ChunkConfig {
    /// Create a validated configuration
    ///
    /// `overlap_tokens >= max_tokens` is accepted; the chunker then falls
    /// back to disjoint windows so that every step makes progress.
    pub fn new(max_tokens: usize, overlap_tokens: usize) -> Result<Self> {
        let config = Self {
            max_tokens,
            overlap_tokens,
        };
        config.validate()?;
        Ok(config)
    }

    /// Configuration with no overlap between chunks
    pub fn disjoint(max_tokens: usize) -> Result<Self> {
        Self::new(max_tokens, 0)
    }

    /// Check that the token budget is usable
    pub fn validate(&self) -> Result<()> {
        if self.max_tokens == 0 {
            return Err(CoreError::InvalidConfig(
                "max_tokens must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether the overlap leaves room for the window to advance
    pub fn has_forward_stride(&self) -> bool {
        self.overlap_tokens < self.max_tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_embedding_model_limits() {
        let config = ChunkConfig::default();
        assert_eq!(config.max_tokens, 8191);
        assert_eq!(config.overlap_tokens, 50);
        assert!(config.has_forward_stride());
    }

    #[test]
    fn test_zero_max_tokens_rejected() {
        let result = ChunkConfig::new(0, 0);
        assert!(matches!(result, Err(CoreError::InvalidConfig(_))));
    }

    #[test]
    fn test_overlap_at_or_above_budget_is_accepted() {
        let config = ChunkConfig::new(10, 10).unwrap();
        assert!(!config.has_forward_stride());

        let config = ChunkConfig::new(10, 25).unwrap();
        assert!(!config.has_forward_stride());
    }

    #[test]
    fn test_disjoint() {
        let config = ChunkConfig::disjoint(40).unwrap();
        assert_eq!(config.overlap_tokens, 0);
        assert_eq!(config.max_tokens, 40);
    }
}
