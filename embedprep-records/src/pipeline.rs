//! Transcript scan, product fetch and join

use crate::cache::{FetchProgress, FetchSummary, ProductCache, ProductDetails};
use crate::error::Result;
use crate::schema::{is_present, string_list, text_value, ProductFields, TranscriptFields};
use crate::source::{Record, RecordSource};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Where the pipeline reads from
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Transcripts table id or name
    pub transcripts_table: String,
    /// Products table id or name
    pub products_table: String,
    /// View used to scan the transcripts table
    pub view: Option<String>,
    /// Transcript field names
    pub transcript_fields: TranscriptFields,
    /// Product field names
    pub product_fields: ProductFields,
}

/// A transcript that mentions products, before product lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptCandidate {
    /// Transcript record id
    pub record_id: String,
    /// Transcript body
    pub transcript_text: String,
    /// Linked product ids in mention order
    pub product_ids: Vec<String>,
}

impl TranscriptCandidate {
    /// Build a candidate from a transcript record
    ///
    /// Returns `None` unless the record has an id, a transcript, linked
    /// product names and linked product ids.
    pub fn from_record(record: &Record, fields: &TranscriptFields) -> Option<Self> {
        if record.id.is_empty() {
            return None;
        }

        let transcript_text = record
            .field(&fields.text)
            .filter(|value| is_present(value))
            .and_then(text_value)?;

        if !record.field(&fields.product_names).is_some_and(is_present) {
            return None;
        }

        let product_ids = record
            .field(&fields.product_ids)
            .map(string_list)
            .unwrap_or_default();
        if product_ids.is_empty() {
            return None;
        }

        Some(Self {
            record_id: record.id.clone(),
            transcript_text,
            product_ids,
        })
    }
}

/// Outcome of scanning the transcripts table
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    /// Records returned by the table
    pub scanned: usize,
    /// Transcripts with product mentions
    pub candidates: Vec<TranscriptCandidate>,
    /// Unique product ids across all candidates, first-seen order
    pub product_ids: Vec<String>,
}

/// A transcript joined with the products it mentions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptRecord {
    /// Transcript record id
    pub airtable_transcript_record_id: String,
    /// Transcript body
    pub transcript_text: String,
    /// Details of the mentioned products that could be fetched
    pub mentioned_products: Vec<ProductDetails>,
}

/// Scan the transcripts table for records that mention products
pub fn scan_transcripts<S: RecordSource + ?Sized>(
    source: &S,
    config: &PipelineConfig,
) -> Result<ScanResult> {
    info!(
        "Scanning transcripts from '{}'{}",
        config.transcripts_table,
        config
            .view
            .as_deref()
            .map(|v| format!(" (view: {v})"))
            .unwrap_or_default()
    );

    let records = source.list_records(
        &config.transcripts_table,
        config.view.as_deref(),
        &config.transcript_fields.requested(),
    )?;

    let mut result = ScanResult {
        scanned: records.len(),
        ..Default::default()
    };
    let mut seen = HashSet::new();

    for record in &records {
        let Some(candidate) = TranscriptCandidate::from_record(record, &config.transcript_fields)
        else {
            continue;
        };
        for id in &candidate.product_ids {
            if seen.insert(id.clone()) {
                result.product_ids.push(id.clone());
            }
        }
        result.candidates.push(candidate);
    }

    info!(
        "Scanned {} transcripts: {} mention products, {} unique product ids",
        result.scanned,
        result.candidates.len(),
        result.product_ids.len()
    );

    Ok(result)
}

/// Attach cached product details to each candidate
///
/// Candidates without any resolvable product are dropped.
pub fn join_transcripts(
    candidates: &[TranscriptCandidate],
    cache: &ProductCache,
) -> Vec<TranscriptRecord> {
    candidates
        .iter()
        .filter_map(|candidate| {
            let mentioned_products = cache.resolve(&candidate.product_ids);
            if mentioned_products.is_empty() {
                debug!(
                    "Skipping transcript {}: no product details available",
                    candidate.record_id
                );
                return None;
            }
            Some(TranscriptRecord {
                airtable_transcript_record_id: candidate.record_id.clone(),
                transcript_text: candidate.transcript_text.clone(),
                mentioned_products,
            })
        })
        .collect()
}

/// Counts from a full pipeline run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Transcript records scanned
    pub scanned: usize,
    /// Transcripts that mention products
    pub candidates: usize,
    /// Unique product ids mentioned
    pub product_ids: usize,
    /// Product fetch counts
    pub fetch: FetchSummary,
    /// Transcripts in the output
    pub joined: usize,
}

/// Scan, fetch and join in one pass
pub fn run_pipeline<S: RecordSource + ?Sized>(
    source: &S,
    config: &PipelineConfig,
    cache: &mut ProductCache,
    progress: &dyn FetchProgress,
) -> Result<(Vec<TranscriptRecord>, PipelineStats)> {
    let scan = scan_transcripts(source, config)?;
    let mut stats = PipelineStats {
        scanned: scan.scanned,
        candidates: scan.candidates.len(),
        product_ids: scan.product_ids.len(),
        ..Default::default()
    };

    if scan.product_ids.is_empty() {
        info!("No product ids found; nothing to fetch");
        return Ok((Vec::new(), stats));
    }

    stats.fetch = cache.fetch_missing(
        source,
        &config.products_table,
        &scan.product_ids,
        &config.product_fields,
        progress,
    );

    let joined = join_transcripts(&scan.candidates, cache);
    stats.joined = joined.len();
    info!(
        "Joined {} transcripts with product details",
        stats.joined
    );

    Ok((joined, stats))
}
