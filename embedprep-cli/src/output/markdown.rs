//! Markdown output formatter

use super::OutputFormatter;
use anyhow::Result;
use embedprep_core::Chunk;
use std::io::Write;

/// Markdown formatter - outputs chunks as numbered sections
pub struct MarkdownFormatter<W: Write> {
    writer: W,
    chunk_count: usize,
    token_total: usize,
}

impl<W: Write> MarkdownFormatter<W> {
    /// Create a new markdown formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            chunk_count: 0,
            token_total: 0,
        }
    }
}

impl<W: Write> OutputFormatter for MarkdownFormatter<W> {
    fn format_chunk(&mut self, chunk: &Chunk) -> Result<()> {
        self.chunk_count += 1;
        self.token_total += chunk.token_len();
        writeln!(self.writer, "## Chunk {}", self.chunk_count)?;
        writeln!(self.writer)?;
        writeln!(self.writer, "*Tokens {}..{}*", chunk.start, chunk.end)?;
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", chunk.text)?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        writeln!(self.writer, "---")?;
        writeln!(
            self.writer,
            "*Total chunks: {} ({} tokens including overlap)*",
            self.chunk_count, self.token_total
        )?;
        self.writer.flush()?;
        Ok(())
    }
}
