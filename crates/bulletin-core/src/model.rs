//! Feed documents as published under `/data/`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A PDF attachment linked from a bulletin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pdf {
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub label: String,
}

impl Pdf {
    /// Label shown for the link; blank labels read as "PDF".
    pub fn display_label(&self) -> &str {
        let label = self.label.trim();
        if label.is_empty() { "PDF" } else { label }
    }
}

/// One bulletin as listed in the index document.
///
/// `prid` is coerced to a string while deserialising: numbers are rendered,
/// null or missing ids become the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default, deserialize_with = "coerce_prid")]
    pub prid: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub ministry: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub snippet: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub posted_on_raw: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub source_url: String,
    #[serde(default, deserialize_with = "lenient_pdfs")]
    pub pdfs: Vec<Pdf>,
}

/// The index document (`/data/index.json`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexDocument {
    #[serde(default, deserialize_with = "lenient_string")]
    pub updated_at_utc: String,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default, deserialize_with = "lenient_items")]
    pub items: Vec<Item>,
}

impl IndexDocument {
    /// Parsed `updated_at_utc`, if it is valid RFC 3339.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(self.updated_at_utc.trim())
            .ok()
            .map(|ts| ts.with_timezone(&Utc))
    }

    /// Human-readable update stamp, falling back to the raw value.
    pub fn updated_label(&self) -> String {
        match self.updated_at() {
            Some(ts) => ts.format("%Y-%m-%d %H:%M UTC").to_string(),
            None => self.updated_at_utc.trim().to_string(),
        }
    }
}

/// Full text of a bulletin (`/data/items/<prid>.json`).
///
/// The generator writes more fields than this; only `text` is read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub text: String,
}

fn coerce_prid<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

/// Scalars are rendered as text so one odd field cannot sink the whole
/// document; null, arrays and objects read as empty.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    })
}

fn lenient_pdfs<'de, D>(deserializer: D) -> Result<Vec<Pdf>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Pdf>>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_items<'de, D>(deserializer: D) -> Result<Vec<Item>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Item>>::deserialize(deserializer)?.unwrap_or_default())
}
