//! Record sources
//!
//! The pipeline reads rows through [`RecordSource`]; [`AirtableClient`] is
//! the HTTP implementation against the Airtable REST API.

use crate::error::{RecordsError, Result};
use log::{debug, info};
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cell::Cell;
use std::time::{Duration, Instant};

/// Default REST endpoint
pub const DEFAULT_API_URL: &str = "https://api.airtable.com/v0";

/// Delay between consecutive requests; the API allows about five per second
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(250);

/// One table row
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Record {
    /// Record identifier (empty when the server omitted it)
    #[serde(default)]
    pub id: String,
    /// Field values keyed by field name; empty fields are absent
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// Create a record from an id and field map
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Look up a field value
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

/// Read access to a tabular record store
pub trait RecordSource {
    /// List every record of `table`, optionally through a view, restricted
    /// to the named fields (all fields when `fields` is empty)
    fn list_records(&self, table: &str, view: Option<&str>, fields: &[&str])
        -> Result<Vec<Record>>;

    /// Fetch one record by id; `None` when it does not exist
    fn get_record(&self, table: &str, id: &str) -> Result<Option<Record>>;
}

/// Connection settings for [`AirtableClient`]
#[derive(Debug, Clone)]
pub struct AirtableConfig {
    /// REST endpoint root
    pub api_url: String,
    /// Base identifier (`app...`)
    pub base_id: String,
    /// Personal access token
    pub api_key: String,
    /// Minimum spacing between requests
    pub request_delay: Duration,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl AirtableConfig {
    /// Settings for `base_id` with default endpoint, delay and timeout
    pub fn new(base_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            base_id: base_id.into(),
            api_key: api_key.into(),
            request_delay: DEFAULT_REQUEST_DELAY,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    records: Vec<Record>,
    #[serde(default)]
    offset: Option<String>,
}

/// Blocking HTTP client for the Airtable REST API
///
/// Requests are spaced by a fixed delay and never retried.
#[derive(Debug)]
pub struct AirtableClient {
    client: Client,
    config: AirtableConfig,
    last_request: Cell<Option<Instant>>,
}

impl AirtableClient {
    /// Create a client, failing when no API key is configured
    pub fn new(config: AirtableConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(RecordsError::MissingApiKey);
        }

        let mut headers = HeaderMap::new();
        let auth_value = format!("Bearer {}", config.api_key.trim());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth_value)
                .map_err(|e| RecordsError::Config(format!("Invalid API key format: {e}")))?,
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()?;

        info!(
            "Airtable client ready: base={}, delay={}ms",
            config.base_id,
            config.request_delay.as_millis()
        );

        Ok(Self {
            client,
            config,
            last_request: Cell::new(None),
        })
    }

    /// The settings in use
    pub fn config(&self) -> &AirtableConfig {
        &self.config
    }

    /// Build `{api_url}/{base}/{table}[/{record}]` with each segment escaped
    pub fn table_url(&self, table: &str, record_id: Option<&str>) -> Result<Url> {
        let mut url = Url::parse(&self.config.api_url).map_err(|e| {
            RecordsError::Config(format!("invalid API URL {}: {e}", self.config.api_url))
        })?;
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                RecordsError::Config(format!("API URL cannot be a base: {}", self.config.api_url))
            })?;
            segments
                .pop_if_empty()
                .push(&self.config.base_id)
                .push(table);
            if let Some(id) = record_id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    /// Sleep until the configured delay has passed since the last request
    fn pace(&self) {
        if let Some(last) = self.last_request.get() {
            let elapsed = last.elapsed();
            if elapsed < self.config.request_delay {
                std::thread::sleep(self.config.request_delay - elapsed);
            }
        }
        self.last_request.set(Some(Instant::now()));
    }

    fn check_status(url: &Url, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(RecordsError::Status {
            url: url.to_string(),
            status: status.as_u16(),
            body,
        })
    }
}

impl RecordSource for AirtableClient {
    fn list_records(
        &self,
        table: &str,
        view: Option<&str>,
        fields: &[&str],
    ) -> Result<Vec<Record>> {
        let url = self.table_url(table, None)?;
        let mut records = Vec::new();
        let mut offset: Option<String> = None;
        let mut page_count = 0usize;

        loop {
            let mut query: Vec<(&str, &str)> = Vec::new();
            if let Some(view) = view {
                query.push(("view", view));
            }
            for field in fields {
                query.push(("fields[]", *field));
            }
            if let Some(cursor) = offset.as_deref() {
                query.push(("offset", cursor));
            }

            self.pace();
            let response = self.client.get(url.clone()).query(&query).send()?;
            let page: ListResponse = Self::check_status(&url, response)?.json()?;
            page_count += 1;

            debug!(
                "Fetched page {} of '{}' ({} records)",
                page_count,
                table,
                page.records.len()
            );
            records.extend(page.records);

            match page.offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        Ok(records)
    }

    fn get_record(&self, table: &str, id: &str) -> Result<Option<Record>> {
        let url = self.table_url(table, Some(id))?;

        self.pace();
        let response = self.client.get(url.clone()).send()?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!("Record {id} not found in '{table}'");
            return Ok(None);
        }

        let record: Record = Self::check_status(&url, response)?.json()?;
        Ok(Some(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> AirtableClient {
        AirtableClient::new(AirtableConfig::new("appBase", "key123")).unwrap()
    }

    #[test]
    fn test_missing_api_key() {
        let result = AirtableClient::new(AirtableConfig::new("appBase", "  "));
        assert!(matches!(result, Err(RecordsError::MissingApiKey)));
    }

    #[test]
    fn test_table_url() {
        let url = client().table_url("tblTranscripts", None).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.airtable.com/v0/appBase/tblTranscripts"
        );
    }

    #[test]
    fn test_record_url_escapes_segments() {
        let url = client()
            .table_url("Video Transcripts", Some("rec1"))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.airtable.com/v0/appBase/Video%20Transcripts/rec1"
        );
    }

    #[test]
    fn test_trailing_slash_in_api_url() {
        let mut config = AirtableConfig::new("appBase", "key123");
        config.api_url = "http://localhost:9000/v0/".to_string();
        let client = AirtableClient::new(config).unwrap();
        let url = client.table_url("tbl", None).unwrap();
        assert_eq!(url.as_str(), "http://localhost:9000/v0/appBase/tbl");
    }

    #[test]
    fn test_record_deserializes_without_fields() {
        let record: Record = serde_json::from_str(r#"{"id": "rec1"}"#).unwrap();
        assert_eq!(record.id, "rec1");
        assert!(record.fields.is_empty());
    }
}
