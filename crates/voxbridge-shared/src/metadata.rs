//! Tagged metadata values attached to ledger records.
//!
//! The ledger stores an open string-keyed list of tagged values. Text and
//! integer tags round-trip losslessly; binary blobs travel as hex strings
//! and are recovered best-effort on the way back.

use serde::{Deserialize, Serialize};

/// A single tagged metadata value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireValue", into = "WireValue")]
pub enum MetadataValue {
    Text(String),
    Int(i64),
    Nat(u64),
    Blob(Vec<u8>),
}

impl MetadataValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Map a floating point number the way UI layers hand numbers over:
    /// whole non-negative values become `Nat`, anything else floors into
    /// `Int`.
    pub fn from_f64(value: f64) -> Self {
        if value.fract() == 0.0 && value >= 0.0 && value <= u64::MAX as f64 {
            Self::Nat(value as u64)
        } else {
            Self::Int(value.floor() as i64)
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Wire shape of a tagged value. Blob payloads are hex strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
enum WireValue {
    Text(String),
    Int(i64),
    Nat(u64),
    Blob(String),
}

impl From<WireValue> for MetadataValue {
    fn from(wire: WireValue) -> Self {
        match wire {
            WireValue::Text(s) => Self::Text(s),
            WireValue::Int(v) => Self::Int(v),
            WireValue::Nat(v) => Self::Nat(v),
            WireValue::Blob(s) => match hex::decode(&s) {
                Ok(bytes) => Self::Blob(bytes),
                Err(e) => {
                    tracing::warn!(error = %e, "Undecodable blob metadata, keeping empty");
                    Self::Blob(Vec::new())
                }
            },
        }
    }
}

impl From<MetadataValue> for WireValue {
    fn from(value: MetadataValue) -> Self {
        match value {
            MetadataValue::Text(s) => Self::Text(s),
            MetadataValue::Int(v) => Self::Int(v),
            MetadataValue::Nat(v) => Self::Nat(v),
            MetadataValue::Blob(bytes) => Self::Blob(hex::encode(bytes)),
        }
    }
}

/// Ordered, string-keyed metadata list attached to a voice record.
///
/// Kept as a list of pairs rather than a map so the wire order is
/// preserved exactly as the ledger stores it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoiceMetadata(Vec<(String, MetadataValue)>);

impl VoiceMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any existing entry with the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: MetadataValue) {
        let key = key.into();
        if let Some(entry) = self.0.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.0.push((key, value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Text value under `key`, if present and text-tagged.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(MetadataValue::as_text)
    }

    pub fn title(&self) -> Option<&str> {
        self.text("title")
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, MetadataValue)> {
        self.0.iter()
    }

    /// Metadata captured alongside a fresh recording.
    pub fn recording(title: &str, description: &str, duration_secs: u64, tags: &[String]) -> Self {
        let mut meta = Self::new();
        meta.insert("title", MetadataValue::text(title));
        meta.insert("description", MetadataValue::text(description));
        meta.insert("duration", MetadataValue::Nat(duration_secs));
        if !tags.is_empty() {
            let joined = serde_json::to_string(tags).unwrap_or_default();
            meta.insert("tags", MetadataValue::Text(joined));
        }
        meta
    }
}
