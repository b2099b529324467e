//! JSON output for joined transcripts

use crate::error::Result;
use crate::pipeline::TranscriptRecord;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Default output file name
pub const DEFAULT_OUTPUT_FILE: &str = "processed_transcripts_with_products.json";

/// Characters of transcript text kept in a preview
pub const PREVIEW_CHARS: usize = 300;

/// Serialize `records` with four-space indentation
pub fn write_json<W: Write>(writer: W, records: &[TranscriptRecord]) -> Result<()> {
    let mut serializer =
        serde_json::Serializer::with_formatter(writer, PrettyFormatter::with_indent(b"    "));
    records.serialize(&mut serializer)?;
    Ok(())
}

/// Write `records` to a file at `path`
pub fn write_json_file(path: &Path, records: &[TranscriptRecord]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_json(&mut writer, records)?;
    writer.flush()?;
    Ok(())
}

/// Copy of `record` with the transcript cut to `max_chars` characters
pub fn preview(record: &TranscriptRecord, max_chars: usize) -> TranscriptRecord {
    let mut sample = record.clone();
    if sample.transcript_text.chars().count() > max_chars {
        let cut: String = sample.transcript_text.chars().take(max_chars).collect();
        sample.transcript_text = format!("{cut}...");
    }
    sample
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ProductDetails;

    fn sample(text: &str) -> TranscriptRecord {
        TranscriptRecord {
            airtable_transcript_record_id: "recT".to_string(),
            transcript_text: text.to_string(),
            mentioned_products: vec![ProductDetails {
                tool_name: Some("Widget".to_string()),
                link: None,
                description: Some("Does things: très bien".to_string()),
                images: vec![],
                airtable_product_record_id: "recP".to_string(),
            }],
        }
    }

    #[test]
    fn test_write_json_uses_four_space_indent() {
        let mut buffer = Vec::new();
        write_json(&mut buffer, &[sample("hello")]).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.starts_with("[\n    {\n        \"airtable_transcript_record_id\""));
        assert!(text.contains("\"link\": null"));
        // Non-ASCII is written as-is
        assert!(text.contains("très bien"));
    }

    #[test]
    fn test_written_json_round_trips() {
        let mut buffer = Vec::new();
        let records = vec![sample("one"), sample("two")];
        write_json(&mut buffer, &records).unwrap();

        let parsed: Vec<TranscriptRecord> = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed, records);
    }

    #[test]
    fn test_write_json_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_OUTPUT_FILE);

        write_json_file(&path, &[sample("on disk")]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<TranscriptRecord> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed[0].transcript_text, "on disk");
    }

    #[test]
    fn test_write_json_file_missing_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.json");

        assert!(matches!(
            write_json_file(&path, &[]),
            Err(crate::RecordsError::Io(_))
        ));
    }

    #[test]
    fn test_preview_truncates_long_transcripts() {
        let long = "é".repeat(400);
        let short = preview(&sample(&long), PREVIEW_CHARS);
        assert_eq!(short.transcript_text.chars().count(), PREVIEW_CHARS + 3);
        assert!(short.transcript_text.ends_with("..."));
    }

    #[test]
    fn test_preview_keeps_short_transcripts() {
        let record = sample("brief");
        assert_eq!(preview(&record, PREVIEW_CHARS), record);
    }
}
