//! Bridge command implementation
//!
//! Reads a JSON request, answers with `{"result": ...}` on stdout. Failures
//! become `{"result": {"error": "..."}}` and the process still exits 0.

use crate::config::{CliConfig, TokenizerConfig};
use crate::error::CliError;
use anyhow::{Context, Result};
use clap::Args;
use embedprep_core::{ChunkConfig, SchemeRegistry, TokenChunker};
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};

/// Arguments for the bridge command
#[derive(Debug, Args)]
pub struct BridgeArgs {
    /// Answer one request per input line instead of one per process
    #[arg(long)]
    pub lines: bool,
}

/// A single bridge request
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct BridgeRequest {
    /// `count_tokens` or `chunk_text`
    #[serde(default)]
    pub action: Option<String>,
    /// Text to tokenize
    #[serde(default)]
    pub text: Option<String>,
    /// Model or encoding name
    #[serde(default)]
    pub model: Option<String>,
    /// Chunk budget
    #[serde(default)]
    pub max_tokens: Option<usize>,
    /// Tokens shared between consecutive chunks
    #[serde(default)]
    pub overlap_tokens: Option<usize>,
}

/// The response envelope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BridgeResponse {
    /// Payload of the response
    pub result: BridgeResult,
}

/// Payload of a response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum BridgeResult {
    /// Token count
    Count(usize),
    /// Chunk texts in order
    Chunks(Vec<String>),
    /// Failure description
    Error {
        /// Human-readable message
        error: String,
    },
}

impl BridgeResponse {
    fn error(err: &CliError) -> Self {
        Self {
            result: BridgeResult::Error {
                error: err.to_string(),
            },
        }
    }
}

impl BridgeArgs {
    /// Execute the bridge command
    pub fn execute(&self, config: &CliConfig) -> Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        let mut registry = SchemeRegistry::new();

        run_bridge(
            stdin.lock(),
            stdout.lock(),
            self.lines,
            &mut registry,
            &config.tokenizer,
        )
    }
}

/// Answer requests from `reader` on `writer`
///
/// Only I/O failures are returned as errors; request failures, including
/// input that is not UTF-8, are written as error responses.
pub fn run_bridge<R: BufRead, W: Write>(
    mut reader: R,
    mut writer: W,
    lines: bool,
    registry: &mut SchemeRegistry,
    defaults: &TokenizerConfig,
) -> Result<()> {
    if lines {
        let mut answered = 0usize;
        for line in reader.split(b'\n') {
            let line = line.context("Failed to read from stdin")?;
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            let response = respond_bytes(&line, registry, defaults);
            write_response(&mut writer, &response)?;
            answered += 1;
        }
        log::info!("Answered {answered} requests");
    } else {
        let mut input = Vec::new();
        reader
            .read_to_end(&mut input)
            .context("Failed to read from stdin")?;
        let response = respond_bytes(&input, registry, defaults);
        write_response(&mut writer, &response)?;
    }

    Ok(())
}

/// Answer one raw request given as bytes
pub fn respond_bytes(
    raw: &[u8],
    registry: &mut SchemeRegistry,
    defaults: &TokenizerConfig,
) -> BridgeResponse {
    match std::str::from_utf8(raw) {
        Ok(text) => respond(text, registry, defaults),
        Err(e) => {
            let err = CliError::InvalidRequest(format!("input is not valid UTF-8: {e}"));
            log::warn!("Request failed: {err}");
            BridgeResponse::error(&err)
        }
    }
}

/// Parse and answer one raw request
pub fn respond(
    raw: &str,
    registry: &mut SchemeRegistry,
    defaults: &TokenizerConfig,
) -> BridgeResponse {
    let outcome = serde_json::from_str::<BridgeRequest>(raw)
        .map_err(|e| CliError::InvalidRequest(e.to_string()))
        .and_then(|request| handle(&request, registry, defaults));

    match outcome {
        Ok(result) => BridgeResponse { result },
        Err(err) => {
            log::warn!("Request failed: {err}");
            BridgeResponse::error(&err)
        }
    }
}

/// Answer a parsed request
pub fn handle(
    request: &BridgeRequest,
    registry: &mut SchemeRegistry,
    defaults: &TokenizerConfig,
) -> std::result::Result<BridgeResult, CliError> {
    let text = request.text.as_deref().unwrap_or("");
    let model = request.model.as_deref().unwrap_or(&defaults.model);

    match request.action.as_deref() {
        Some("count_tokens") => {
            let scheme = registry.get(model)?;
            Ok(BridgeResult::Count(scheme.count(text)))
        }
        Some("chunk_text") => {
            let config = ChunkConfig::new(
                request.max_tokens.unwrap_or(defaults.max_tokens),
                request.overlap_tokens.unwrap_or(defaults.overlap_tokens),
            )?;
            let scheme = registry.get(model)?;
            let chunks = TokenChunker::new(scheme, config).chunk_text(text)?;
            log::debug!("Chunked {} bytes into {} chunks", text.len(), chunks.len());
            Ok(BridgeResult::Chunks(chunks))
        }
        Some(other) => Err(CliError::UnknownAction(other.to_string())),
        None => Err(CliError::UnknownAction("(none)".to_string())),
    }
}

fn write_response<W: Write>(writer: &mut W, response: &BridgeResponse) -> Result<()> {
    serde_json::to_writer(&mut *writer, response).context("Failed to write response")?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
