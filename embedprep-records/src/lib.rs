//! Transcript and product records for embedding
//!
//! Scans a transcripts table for rows that link to products, fetches each
//! product once through an explicit cache, and joins the two into records
//! ready to be vectorized.

#![warn(missing_docs)]

pub mod cache;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod schema;
pub mod source;

// Re-export key types
pub use cache::{CacheEntry, FetchProgress, FetchSummary, ProductCache, ProductDetails};
pub use error::{RecordsError, Result};
pub use pipeline::{
    join_transcripts, run_pipeline, scan_transcripts, PipelineConfig, PipelineStats, ScanResult,
    TranscriptCandidate, TranscriptRecord,
};
pub use schema::{ProductFields, TranscriptFields};
pub use source::{AirtableClient, AirtableConfig, Record, RecordSource};
