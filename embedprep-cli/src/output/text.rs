//! Plain text output formatter

use super::OutputFormatter;
use anyhow::Result;
use embedprep_core::Chunk;
use std::io::Write;

/// Plain text formatter - each chunk preceded by a marker line
pub struct TextFormatter<W: Write> {
    writer: W,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputFormatter for TextFormatter<W> {
    fn format_chunk(&mut self, chunk: &Chunk) -> Result<()> {
        writeln!(
            self.writer,
            "--- chunk {} [tokens {}..{}] ---",
            chunk.index, chunk.start, chunk.end
        )?;
        writeln!(self.writer, "{}", chunk.text)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
