//! Product detail cache
//!
//! The cache is an explicit value handed to the fetch routine. A key that is
//! absent is a miss; a key mapped to [`CacheEntry::Unavailable`] records a
//! fetch that failed or found nothing, and is never fetched again.

use crate::schema::{is_present, text_value, ProductFields};
use crate::source::{Record, RecordSource};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Product fields attached to a transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetails {
    /// Product name
    pub tool_name: Option<String>,
    /// Affiliate link, or the website address when there is none
    pub link: Option<String>,
    /// Product description
    pub description: Option<String>,
    /// Non-empty image URLs
    pub images: Vec<String>,
    /// Id of the product record
    pub airtable_product_record_id: String,
}

impl ProductDetails {
    /// Map a product record onto its details
    pub fn from_record(id: &str, record: &Record, fields: &ProductFields) -> Self {
        let text = |name: &str| record.field(name).and_then(text_value);

        let link = record
            .field(&fields.affiliate_link)
            .filter(|value| is_present(value))
            .and_then(text_value)
            .or_else(|| text(fields.website.as_str()));

        let images = fields
            .images
            .iter()
            .filter_map(|name| text(name.as_str()))
            .filter(|url| !url.is_empty())
            .collect();

        Self {
            tool_name: text(fields.name.as_str()),
            link,
            description: text(fields.description.as_str()),
            images,
            airtable_product_record_id: id.to_string(),
        }
    }
}

/// Cached outcome for one product id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEntry {
    /// Details were fetched
    Found(ProductDetails),
    /// The record was missing or the fetch failed
    Unavailable,
}

/// Hooks for reporting fetch progress
pub trait FetchProgress {
    /// Fetching is about to start for `total` ids
    fn start(&self, _total: usize) {}

    /// One id has been processed
    fn advance(&self, _id: &str) {}

    /// Fetching is done
    fn finish(&self) {}
}

impl FetchProgress for () {}

/// Counts from one fetch pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchSummary {
    /// Ids that were fetched in this pass
    pub requested: usize,
    /// Ids whose details were stored
    pub found: usize,
    /// Ids stored as unavailable
    pub unavailable: usize,
}

/// Product details keyed by record id
#[derive(Debug, Default)]
pub struct ProductCache {
    entries: HashMap<String, CacheEntry>,
}

impl ProductCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached entry for `id`, `None` on a miss
    pub fn get(&self, id: &str) -> Option<&CacheEntry> {
        self.entries.get(id)
    }

    /// Cached details for `id`, if it was found
    pub fn details(&self, id: &str) -> Option<&ProductDetails> {
        match self.entries.get(id) {
            Some(CacheEntry::Found(details)) => Some(details),
            _ => None,
        }
    }

    /// Store an entry
    pub fn insert(&mut self, id: impl Into<String>, entry: CacheEntry) {
        self.entries.insert(id.into(), entry);
    }

    /// Ids from `ids` that have no entry yet, first occurrence only
    pub fn missing<'a>(&self, ids: &'a [String]) -> Vec<&'a str> {
        let mut seen = std::collections::HashSet::new();
        ids.iter()
            .map(String::as_str)
            .filter(|id| !self.entries.contains_key(*id) && seen.insert(*id))
            .collect()
    }

    /// Number of entries of any kind
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fetch every id in `ids` that is not cached yet
    ///
    /// Per-record failures are logged and stored as unavailable; this
    /// function itself does not fail.
    pub fn fetch_missing<S: RecordSource + ?Sized>(
        &mut self,
        source: &S,
        table: &str,
        ids: &[String],
        fields: &ProductFields,
        progress: &dyn FetchProgress,
    ) -> FetchSummary {
        let missing: Vec<String> = self.missing(ids).into_iter().map(str::to_string).collect();
        let mut summary = FetchSummary {
            requested: missing.len(),
            ..Default::default()
        };

        if missing.is_empty() {
            debug!("All {} product ids already cached", ids.len());
            return summary;
        }

        info!("Fetching details for {} new product ids", missing.len());
        progress.start(missing.len());

        for (i, id) in missing.iter().enumerate() {
            debug!("Fetching product {}/{}: {}", i + 1, missing.len(), id);

            let entry = match source.get_record(table, id) {
                Ok(Some(record)) => {
                    CacheEntry::Found(ProductDetails::from_record(id, &record, fields))
                }
                Ok(None) => {
                    warn!("Product record {id} not found");
                    CacheEntry::Unavailable
                }
                Err(e) => {
                    error!("Error fetching product details for {id}: {e}");
                    CacheEntry::Unavailable
                }
            };

            match entry {
                CacheEntry::Found(_) => summary.found += 1,
                CacheEntry::Unavailable => summary.unavailable += 1,
            }
            self.entries.insert(id.clone(), entry);
            progress.advance(id);
        }

        progress.finish();
        summary
    }

    /// Details for `ids` in order, skipping ids that are not found
    pub fn resolve(&self, ids: &[String]) -> Vec<ProductDetails> {
        ids.iter()
            .filter_map(|id| self.details(id))
            .cloned()
            .collect()
    }
}
