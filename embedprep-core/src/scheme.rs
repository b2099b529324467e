//! Tokenization schemes
//!
//! A scheme is a reversible mapping between text and token ids, identified
//! by an encoding name (`cl100k_base`) or by the name of a model that uses
//! one (`text-embedding-3-small`).

use crate::error::{CoreError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tiktoken_rs::CoreBPE;

/// Encoding names that resolve without a model lookup
const ENCODINGS: &[&str] = &[
    "cl100k_base",
    "o200k_base",
    "p50k_base",
    "p50k_edit",
    "r50k_base",
];

/// List the built-in encoding names
pub fn supported_encodings() -> &'static [&'static str] {
    ENCODINGS
}

/// Text <-> token id mapping used by the chunker
pub trait TokenScheme: Send + Sync {
    /// Name the scheme was loaded under
    fn name(&self) -> &str;

    /// Tokenize text
    fn encode(&self, text: &str) -> Vec<u32>;

    /// Turn a token sequence back into text
    ///
    /// Fails when the sequence starts or ends inside a multi-byte character.
    fn decode(&self, tokens: &[u32]) -> Result<String>;

    /// Turn a token sequence back into text, replacing partial characters
    /// with U+FFFD
    ///
    /// The default decodes token by token and replaces each token that
    /// does not decode on its own.
    fn decode_lossy(&self, tokens: &[u32]) -> String {
        if let Ok(text) = self.decode(tokens) {
            return text;
        }
        tokens
            .iter()
            .map(|&t| {
                self.decode(&[t])
                    .unwrap_or_else(|_| char::REPLACEMENT_CHARACTER.to_string())
            })
            .collect()
    }

    /// Number of tokens `text` encodes to
    fn count(&self, text: &str) -> usize {
        self.encode(text).len()
    }
}

/// BPE scheme backed by `tiktoken-rs`
pub struct TiktokenScheme {
    name: String,
    bpe: CoreBPE,
}

impl std::fmt::Debug for TiktokenScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TiktokenScheme")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl TiktokenScheme {
    /// Load a scheme by encoding name or model name
    pub fn load(name: &str) -> Result<Self> {
        let bpe = match name {
            "cl100k_base" => tiktoken_rs::cl100k_base(),
            "o200k_base" => tiktoken_rs::o200k_base(),
            "p50k_base" => tiktoken_rs::p50k_base(),
            "p50k_edit" => tiktoken_rs::p50k_edit(),
            "r50k_base" | "gpt2" => tiktoken_rs::r50k_base(),
            model => tiktoken_rs::get_bpe_from_model(model),
        }
        .map_err(|e| CoreError::SchemeUnavailable {
            name: name.to_string(),
            reason: e.to_string(),
        })?;

        log::debug!("Loaded tokenization scheme '{name}'");

        Ok(Self {
            name: name.to_string(),
            bpe,
        })
    }
}

impl TokenScheme for TiktokenScheme {
    fn name(&self) -> &str {
        &self.name
    }

    fn encode(&self, text: &str) -> Vec<u32> {
        self.bpe.encode_ordinary(text)
    }

    fn decode(&self, tokens: &[u32]) -> Result<String> {
        self.bpe
            .decode(tokens.to_vec())
            .map_err(|e| CoreError::Decode {
                start: 0,
                end: tokens.len(),
                reason: e.to_string(),
            })
    }

    fn decode_lossy(&self, tokens: &[u32]) -> String {
        if let Ok(text) = self.decode(tokens) {
            return text;
        }
        // Ids come from `encode`, so every one has a byte sequence
        let bytes: Vec<u8> = self
            .bpe
            ._decode_native_and_split(tokens.to_vec())
            .flatten()
            .collect();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

/// Loaded schemes keyed by the name they were requested under
///
/// Loading a BPE table is far more expensive than using it, so callers that
/// serve many requests keep one registry and resolve names through it.
/// Failed loads are not remembered.
#[derive(Default)]
pub struct SchemeRegistry {
    schemes: HashMap<String, Arc<dyn TokenScheme>>,
}

impl std::fmt::Debug for SchemeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.schemes.keys().collect();
        names.sort();
        f.debug_struct("SchemeRegistry")
            .field("loaded", &names)
            .finish()
    }
}

impl SchemeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the scheme for `name`, loading it on first use
    pub fn get(&mut self, name: &str) -> Result<Arc<dyn TokenScheme>> {
        if let Some(scheme) = self.schemes.get(name) {
            return Ok(Arc::clone(scheme));
        }

        let scheme: Arc<dyn TokenScheme> = Arc::new(TiktokenScheme::load(name)?);
        self.schemes.insert(name.to_string(), Arc::clone(&scheme));
        Ok(scheme)
    }

    /// Register a scheme under its own name, replacing any previous entry
    pub fn insert(&mut self, scheme: Arc<dyn TokenScheme>) {
        self.schemes.insert(scheme.name().to_string(), scheme);
    }

    /// Whether `name` is already loaded
    pub fn contains(&self, name: &str) -> bool {
        self.schemes.contains_key(name)
    }

    /// Number of loaded schemes
    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    /// Whether nothing has been loaded yet
    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_by_model_name() {
        let scheme = TiktokenScheme::load("text-embedding-3-small").unwrap();
        assert_eq!(scheme.name(), "text-embedding-3-small");
        assert!(scheme.count("hello world") > 0);
    }

    #[test]
    fn test_load_by_encoding_name() {
        for name in supported_encodings() {
            let scheme = TiktokenScheme::load(name).unwrap();
            assert_eq!(scheme.name(), *name);
        }
    }

    #[test]
    fn test_unknown_scheme_is_unavailable() {
        let err = TiktokenScheme::load("definitely-not-a-model").unwrap_err();
        match err {
            CoreError::SchemeUnavailable { name, .. } => {
                assert_eq!(name, "definitely-not-a-model")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_round_trip() {
        let scheme = TiktokenScheme::load("cl100k_base").unwrap();
        let text = "The quick brown fox jumps over the lazy dog. 東京 🌍";
        let tokens = scheme.encode(text);
        assert_eq!(scheme.decode(&tokens).unwrap(), text);
    }

    #[test]
    fn test_lossy_decode_of_split_character() {
        let scheme = TiktokenScheme::load("cl100k_base").unwrap();
        let tokens = scheme.encode("🌍");
        assert!(tokens.len() > 1);

        assert!(scheme.decode(&tokens[..1]).is_err());
        assert!(scheme
            .decode_lossy(&tokens[..1])
            .contains(char::REPLACEMENT_CHARACTER));
        assert_eq!(scheme.decode_lossy(&tokens), "🌍");
    }

    #[test]
    fn test_special_token_text_is_plain_text() {
        let scheme = TiktokenScheme::load("cl100k_base").unwrap();
        let text = "before <|endoftext|> after";
        let tokens = scheme.encode(text);
        assert_eq!(scheme.decode(&tokens).unwrap(), text);
    }

    #[test]
    fn test_empty_text_has_no_tokens() {
        let scheme = TiktokenScheme::load("cl100k_base").unwrap();
        assert_eq!(scheme.count(""), 0);
        assert_eq!(scheme.decode(&[]).unwrap(), "");
    }

    #[test]
    fn test_registry_caches_loaded_schemes() {
        let mut registry = SchemeRegistry::new();
        assert!(registry.is_empty());

        let first = registry.get("cl100k_base").unwrap();
        let second = registry.get("cl100k_base").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("cl100k_base"));
    }

    #[test]
    fn test_registry_does_not_cache_failures() {
        let mut registry = SchemeRegistry::new();
        assert!(registry.get("no-such-scheme").is_err());
        assert!(!registry.contains("no-such-scheme"));
        assert!(registry.is_empty());
    }
}
