//! Transcripts command implementation

use crate::config::CliConfig;
use crate::progress::ProgressReporter;
use anyhow::{Context, Result};
use clap::Args;
use embedprep_records::output::{preview, write_json_file, PREVIEW_CHARS};
use embedprep_records::{
    run_pipeline, AirtableClient, AirtableConfig, PipelineConfig, ProductCache, TranscriptRecord,
};
use std::path::PathBuf;
use std::time::Duration;

/// Arguments for the transcripts command
#[derive(Debug, Args)]
pub struct TranscriptsArgs {
    /// API key for the remote tables
    #[arg(long, env = "AIRTABLE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base identifier
    #[arg(long, value_name = "ID")]
    pub base_id: Option<String>,

    /// View used to scan transcripts (empty string scans the whole table)
    #[arg(long, value_name = "VIEW")]
    pub view: Option<String>,

    /// Output file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Delay between requests in milliseconds
    #[arg(long, value_name = "MS")]
    pub request_delay_ms: Option<u64>,
}

impl TranscriptsArgs {
    /// Execute the transcripts command
    pub fn execute(&self, config: &CliConfig, quiet: bool) -> Result<()> {
        let settings = &config.airtable;

        let api_key = self
            .api_key
            .clone()
            .or_else(|| settings.api_key.clone())
            .unwrap_or_default();
        let airtable = AirtableConfig {
            api_url: settings.api_url.clone(),
            base_id: self.base_id.clone().unwrap_or_else(|| settings.base_id.clone()),
            api_key,
            request_delay: Duration::from_millis(
                self.request_delay_ms.unwrap_or(settings.request_delay_ms),
            ),
            timeout_secs: settings.timeout_secs,
        };
        let client = AirtableClient::new(airtable)
            .context("Cannot connect to Airtable (set AIRTABLE_API_KEY or --api-key)")?;

        let view = self.view.clone().unwrap_or_else(|| settings.view.clone());
        let pipeline = PipelineConfig {
            transcripts_table: settings.transcripts_table.clone(),
            products_table: settings.products_table.clone(),
            view: (!view.is_empty()).then_some(view),
            transcript_fields: config.fields.transcripts.clone(),
            product_fields: config.fields.products.clone(),
        };

        log::info!("Starting transcript export");
        let mut cache = ProductCache::new();
        let progress = ProgressReporter::new(quiet);
        let (records, stats) = run_pipeline(&client, &pipeline, &mut cache, &progress)
            .context("Failed to process transcripts")?;

        log::info!(
            "Scanned {} transcripts, {} with products, {} unique products ({} found, {} unavailable)",
            stats.scanned,
            stats.candidates,
            stats.product_ids,
            stats.fetch.found,
            stats.fetch.unavailable
        );

        let Some(first) = records.first() else {
            log::warn!("No transcripts with product details were produced; nothing written");
            return Ok(());
        };

        if !quiet {
            println!("Sample record:\n{}", render_sample(first)?);
        }

        let output = self.output.as_ref().unwrap_or(&config.output.path);
        write_json_file(output, &records)
            .with_context(|| format!("Failed to write {}", output.display()))?;

        if !quiet {
            println!(
                "✓ Wrote {} transcripts to {}",
                records.len(),
                output.display()
            );
        }

        Ok(())
    }
}

/// Pretty JSON of `record` with its transcript shortened for display
fn render_sample(record: &TranscriptRecord) -> Result<String> {
    serde_json::to_string_pretty(&preview(record, PREVIEW_CHARS))
        .context("Failed to render sample record")
}
