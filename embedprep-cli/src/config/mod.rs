//! Configuration module
//!
//! Every section is optional in the file; missing keys take the defaults
//! below and command-line flags override both.

use anyhow::{Context, Result};
use embedprep_core::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_OVERLAP_TOKENS};
use embedprep_records::output::DEFAULT_OUTPUT_FILE;
use embedprep_records::source::{DEFAULT_API_URL, DEFAULT_REQUEST_DELAY};
use embedprep_records::{ProductFields, TranscriptFields};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct CliConfig {
    /// Tokenizer defaults
    #[serde(default)]
    pub tokenizer: TokenizerConfig,

    /// Remote table settings
    #[serde(default)]
    pub airtable: AirtableSettings,

    /// Field names in the remote tables
    #[serde(default)]
    pub fields: FieldsConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

impl CliConfig {
    /// Load configuration from `path`, or defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: CliConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}

/// Tokenizer defaults used when a request or flag leaves them out
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct TokenizerConfig {
    /// Model or encoding name
    pub model: String,

    /// Maximum tokens per chunk
    pub max_tokens: usize,

    /// Tokens shared between consecutive chunks
    pub overlap_tokens: usize,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            overlap_tokens: DEFAULT_OVERLAP_TOKENS,
        }
    }
}

/// Remote table settings
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct AirtableSettings {
    /// REST endpoint root
    pub api_url: String,

    /// API key; the AIRTABLE_API_KEY environment variable takes precedence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base identifier
    pub base_id: String,

    /// Transcripts table id or name
    pub transcripts_table: String,

    /// Products table id or name
    pub products_table: String,

    /// View used to scan transcripts (empty = whole table)
    pub view: String,

    /// Delay between requests in milliseconds
    pub request_delay_ms: u64,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for AirtableSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            base_id: "apph2kIrj3y6zyvLi".to_string(),
            transcripts_table: "tblTfxNoB0YcfFjOi".to_string(),
            products_table: "tblRl7dnmPfHDfzh7".to_string(),
            view: "viw2ngMXPguZjul6z".to_string(),
            request_delay_ms: DEFAULT_REQUEST_DELAY.as_millis() as u64,
            timeout_secs: 30,
        }
    }
}

/// Field names for both tables
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct FieldsConfig {
    /// Transcripts table fields
    #[serde(default)]
    pub transcripts: TranscriptFields,

    /// Products table fields
    #[serde(default)]
    pub products: ProductFields,
}

/// Output-related configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputConfig {
    /// Where the transcript export is written
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_OUTPUT_FILE),
        }
    }
}
