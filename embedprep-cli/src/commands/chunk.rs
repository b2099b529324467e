//! Chunk command implementation

use super::OutputFormat;
use crate::config::CliConfig;
use crate::input;
use crate::output::{JsonFormatter, MarkdownFormatter, OutputFormatter, TextFormatter};
use anyhow::{Context, Result};
use clap::Args;
use embedprep_core::{ChunkConfig, TiktokenScheme, TokenChunker};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the chunk command
#[derive(Debug, Args)]
pub struct ChunkArgs {
    /// Input file (default: stdin)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Model or encoding name
    #[arg(short, long, value_name = "NAME")]
    pub model: Option<String>,

    /// Maximum tokens per chunk
    #[arg(long, value_name = "N")]
    pub max_tokens: Option<usize>,

    /// Tokens shared between consecutive chunks
    #[arg(long, value_name = "N")]
    pub overlap_tokens: Option<usize>,
}

impl ChunkArgs {
    /// Execute the chunk command
    pub fn execute(&self, config: &CliConfig) -> Result<()> {
        let tokenizer = &config.tokenizer;
        let model = self.model.as_deref().unwrap_or(&tokenizer.model);
        let chunk_config = ChunkConfig::new(
            self.max_tokens.unwrap_or(tokenizer.max_tokens),
            self.overlap_tokens.unwrap_or(tokenizer.overlap_tokens),
        )?;

        let text = input::read_input(self.input.as_deref())?;
        let chunker = TokenChunker::new(Arc::new(TiktokenScheme::load(model)?), chunk_config);
        let chunks = chunker.chunk(&text)?;
        log::info!(
            "Split {} characters into {} chunks (max {}, overlap {})",
            text.chars().count(),
            chunks.len(),
            chunk_config.max_tokens,
            chunk_config.overlap_tokens
        );

        let writer: Box<dyn Write> = match &self.output {
            Some(path) => Box::new(BufWriter::new(
                File::create(path)
                    .with_context(|| format!("Failed to create output file: {}", path.display()))?,
            )),
            None => Box::new(io::stdout().lock()),
        };

        let mut formatter: Box<dyn OutputFormatter> = match self.format {
            OutputFormat::Text => Box::new(TextFormatter::new(writer)),
            OutputFormat::Json => Box::new(JsonFormatter::new(writer)),
            OutputFormat::Markdown => Box::new(MarkdownFormatter::new(writer)),
        };

        for chunk in &chunks {
            formatter.format_chunk(chunk)?;
        }
        formatter.finish()?;

        Ok(())
    }
}
