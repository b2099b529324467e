//! Integration tests for token counting and chunking

use embedprep_core::*;
use std::sync::Arc;

const PARAGRAPH: &str = "Rust is a multi-paradigm, general-purpose programming language \
that emphasizes performance, type safety, and concurrency. It enforces memory safety, \
meaning that all references point to valid memory, without a garbage collector. To \
simultaneously enforce memory safety and prevent data races, its borrow checker tracks \
the object lifetime of all references in a program during compilation.";

fn cl100k() -> Arc<TiktokenScheme> {
    Arc::new(TiktokenScheme::load("cl100k_base").unwrap())
}

#[test]
fn test_count_tokens_default_model() {
    let count = count_tokens("hello world", DEFAULT_MODEL).unwrap();
    assert_eq!(count, 2);
}

#[test]
fn test_count_tokens_empty() {
    assert_eq!(count_tokens("", DEFAULT_MODEL).unwrap(), 0);
}

#[test]
fn test_count_tokens_unknown_scheme() {
    let err = count_tokens("hello", "not-a-model").unwrap_err();
    assert!(matches!(err, CoreError::SchemeUnavailable { .. }));
}

#[test]
fn test_chunk_text_unknown_scheme() {
    let err = chunk_text("hello", "not-a-model", 10, 2).unwrap_err();
    assert!(matches!(err, CoreError::SchemeUnavailable { .. }));
}

#[test]
fn test_chunk_text_empty() {
    let chunks = chunk_text("", DEFAULT_MODEL, 10, 2).unwrap();
    assert!(chunks.is_empty());
}

#[test]
fn test_text_within_budget_returns_itself() {
    let total = count_tokens(PARAGRAPH, "cl100k_base").unwrap();
    let chunks = chunk_text(PARAGRAPH, "cl100k_base", total, 10).unwrap();
    assert_eq!(chunks, vec![PARAGRAPH.to_string()]);

    let chunks = chunk_text(PARAGRAPH, "cl100k_base", DEFAULT_MAX_TOKENS, 50).unwrap();
    assert_eq!(chunks, vec![PARAGRAPH.to_string()]);
}

#[test]
fn test_chunks_stay_within_budget() {
    let scheme = cl100k();
    let chunker = TokenChunker::new(scheme.clone(), ChunkConfig::new(16, 4).unwrap());
    let chunks = chunker.chunk(PARAGRAPH).unwrap();

    assert!(chunks.len() > 1);
    for chunk in &chunks {
        assert!(chunk.token_len() <= 16);
        assert!(scheme.count(&chunk.text) <= 16, "chunk {:?}", chunk.text);
    }
}

#[test]
fn test_consecutive_chunks_share_overlap() {
    let chunker = TokenChunker::new(cl100k(), ChunkConfig::new(20, 5).unwrap());
    let chunks = chunker.chunk(PARAGRAPH).unwrap();

    for pair in chunks.windows(2) {
        assert_eq!(pair[1].start, pair[0].end - 5);
    }
}

#[test]
fn test_disjoint_chunks_reassemble_text() {
    let chunker = TokenChunker::new(cl100k(), ChunkConfig::disjoint(12).unwrap());
    let chunks = chunker.chunk(PARAGRAPH).unwrap();

    let joined: String = chunks.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(joined, PARAGRAPH);
}

#[test]
fn test_registry_backed_chunker() {
    let mut registry = SchemeRegistry::new();
    let scheme = registry.get(DEFAULT_MODEL).unwrap();
    let chunker = TokenChunker::new(scheme, ChunkConfig::default());

    assert_eq!(chunker.scheme().name(), DEFAULT_MODEL);
    assert_eq!(chunker.chunk_text("hello").unwrap(), vec!["hello"]);
}

#[test]
fn test_emoji_under_tiny_budgets() {
    let total = count_tokens("🌍", "cl100k_base").unwrap();
    assert!(total > 2);

    for max_tokens in [1, 2] {
        let chunks = chunk_text("🌍", "cl100k_base", max_tokens, 0).unwrap();
        assert_eq!(chunks.len(), total.div_ceil(max_tokens));
        assert!(chunks.iter().all(|c| !c.is_empty()));
    }
}

#[test]
fn test_mixed_script_under_tiny_budget() {
    let text = "東京 🌍 ok";
    let chunker = TokenChunker::new(cl100k(), ChunkConfig::disjoint(2).unwrap());
    let chunks = chunker.chunk(text).unwrap();

    assert!(chunks.iter().all(|c| c.token_len() <= 2));
    assert_eq!(chunks.last().unwrap().end, count_tokens(text, "cl100k_base").unwrap());
    assert!(chunks.last().unwrap().text.ends_with("ok"));
    // Windows that split a character carry a replacement marker, not an error
    assert!(chunks
        .iter()
        .any(|c| c.text.contains(char::REPLACEMENT_CHARACTER)));
}
