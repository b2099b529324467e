//! Field names and value helpers
//!
//! Remote tables are addressed by field display name. Defaults match the
//! video transcript and product tables this tool was written for; all of
//! them can be overridden from the CLI config file.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field names in the transcripts table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptFields {
    /// Transcript body
    pub text: String,
    /// Lookup of product names; populated only when a product is mentioned
    pub product_names: String,
    /// Linked product record ids
    pub product_ids: String,
}

impl Default for TranscriptFields {
    fn default() -> Self {
        Self {
            text: "Video Transcript".to_string(),
            product_names: "Product Name (from Use Case) 2".to_string(),
            product_ids: "Record ID (from Use Case)".to_string(),
        }
    }
}

impl TranscriptFields {
    /// Fields requested when scanning the table
    pub fn requested(&self) -> [&str; 3] {
        [
            self.text.as_str(),
            self.product_names.as_str(),
            self.product_ids.as_str(),
        ]
    }
}

/// Field names in the products table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductFields {
    /// Product name
    pub name: String,
    /// Preferred link
    pub affiliate_link: String,
    /// Fallback link when there is no affiliate link
    pub website: String,
    /// Product description
    pub description: String,
    /// Image URL fields in display order
    pub images: Vec<String>,
}

impl Default for ProductFields {
    fn default() -> Self {
        Self {
            name: "Product Name".to_string(),
            affiliate_link: "Affiliate Link".to_string(),
            website: "Website Address".to_string(),
            description: "Description".to_string(),
            images: vec![
                "Main Image URL".to_string(),
                "Image 2 URL".to_string(),
                "Image 3 URL".to_string(),
                "Image 4 URL".to_string(),
            ],
        }
    }
}

/// Whether a field value carries content
///
/// Null, `false`, zero, empty strings and empty collections count as empty.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Text form of a field value
///
/// Lookup fields arrive as arrays; their first element is used.
pub fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Object(_) => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => items.first().and_then(text_value),
    }
}

/// Non-empty strings of a value that may be a single string or a list
pub fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) if !s.is_empty() => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}
