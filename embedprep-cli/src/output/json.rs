//! JSON output formatter

use super::OutputFormatter;
use anyhow::Result;
use embedprep_core::Chunk;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// JSON formatter - outputs chunks as a JSON array
pub struct JsonFormatter<W: Write> {
    writer: W,
    chunks: Vec<ChunkData>,
}

/// Data structure for JSON output
#[derive(Debug, Serialize, Deserialize)]
pub struct ChunkData {
    /// Position of the chunk
    pub index: usize,
    /// First token of the chunk
    pub start_token: usize,
    /// One past the last token of the chunk
    pub end_token: usize,
    /// Number of tokens in the chunk
    pub token_count: usize,
    /// The chunk text
    pub text: String,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            chunks: Vec::new(),
        }
    }
}

impl<W: Write> OutputFormatter for JsonFormatter<W> {
    fn format_chunk(&mut self, chunk: &Chunk) -> Result<()> {
        self.chunks.push(ChunkData {
            index: chunk.index,
            start_token: chunk.start,
            end_token: chunk.end,
            token_count: chunk.token_len(),
            text: chunk.text.clone(),
        });
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, &self.chunks)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_output() {
        let mut buffer = Vec::new();
        {
            let mut formatter = JsonFormatter::new(&mut buffer);
            formatter
                .format_chunk(&Chunk {
                    index: 0,
                    start: 0,
                    end: 3,
                    text: "abc".to_string(),
                })
                .unwrap();
            formatter.finish().unwrap();
        }

        let parsed: Vec<ChunkData> = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].token_count, 3);
        assert_eq!(parsed[0].text, "abc");
    }

    #[test]
    fn test_empty_output_is_empty_array() {
        let mut buffer = Vec::new();
        JsonFormatter::new(&mut buffer).finish().unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap().trim(), "[]");
    }
}
