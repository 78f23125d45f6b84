//! Chunk payload normalization.
//!
//! The storage service does not guarantee a stable wire shape for chunk
//! content. Depending on gateway version the payload arrives as a JSON
//! byte array, as a map of numeric string keys to byte values, or under a
//! field other than the conventional `content`. Reconstruction therefore
//! runs a fixed chain of pure decoders over each chunk and degrades per
//! chunk instead of failing the whole file.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Conventional field carrying a chunk's payload.
pub const CONTENT_FIELD: &str = "content";

/// One chunk as returned by the storage service.
///
/// Only the sequence index is fixed; every other field is kept as raw
/// JSON so the payload decoders can sniff the actual shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkRecord {
    #[serde(default)]
    pub index: u64,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, Value>,
}

impl ChunkRecord {
    /// Chunk with its payload under the conventional content field.
    pub fn with_content(index: u64, payload: Value) -> Self {
        let mut fields = serde_json::Map::new();
        fields.insert(CONTENT_FIELD.to_string(), payload);
        Self { index, fields }
    }
}

/// Decode a JSON value shaped like a byte buffer.
///
/// Accepts an array of integers in `0..=255`, or a map of numeric string
/// keys to such integers (converted positionally by key). Anything else
/// is `None`.
pub fn value_to_bytes(value: &Value) -> Option<Vec<u8>> {
    match value {
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                let byte = item.as_u64().filter(|n| *n <= u64::from(u8::MAX))?;
                out.push(byte as u8);
            }
            Some(out)
        }
        Value::Object(map) => {
            if map.is_empty() {
                return None;
            }
            let mut pairs = Vec::with_capacity(map.len());
            for (key, item) in map {
                let position: usize = key.parse().ok()?;
                let byte = item.as_u64().filter(|n| *n <= u64::from(u8::MAX))?;
                pairs.push((position, byte as u8));
            }
            pairs.sort_unstable_by_key(|(position, _)| *position);
            Some(pairs.into_iter().map(|(_, byte)| byte).collect())
        }
        _ => None,
    }
}

/// Find the field name carrying payload bytes for this file.
///
/// The conventional content field wins if any chunk exposes it. Otherwise
/// the first chunk's own fields are scanned (in the map's deterministic
/// order) and the first byte-shaped one is used for every chunk of the
/// file.
pub fn locate_payload_field(chunks: &[ChunkRecord]) -> Option<String> {
    if chunks.iter().any(|c| c.fields.contains_key(CONTENT_FIELD)) {
        return Some(CONTENT_FIELD.to_string());
    }
    let first = chunks.first()?;
    for (name, value) in &first.fields {
        if value_to_bytes(value).is_some() {
            debug!(field = %name, "Payload field sniffed from first chunk");
            return Some(name.clone());
        }
    }
    None
}

/// Concatenate all normalizable chunk payloads in arrival order.
///
/// Chunks that fail to normalize are skipped with a warning. `None` means
/// no chunk yielded bytes and the caller should fall back to the silent
/// clip.
pub fn reassemble(chunks: &[ChunkRecord]) -> Option<Bytes> {
    let field = locate_payload_field(chunks)?;

    let mut out = Vec::new();
    let mut decoded = 0usize;
    for chunk in chunks {
        match chunk.fields.get(&field).and_then(value_to_bytes) {
            Some(bytes) => {
                out.extend_from_slice(&bytes);
                decoded += 1;
            }
            None => {
                warn!(index = chunk.index, field = %field, "Skipping chunk with unreadable payload");
            }
        }
    }

    if decoded == 0 {
        return None;
    }
    Some(Bytes::from(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_array_payload() {
        assert_eq!(value_to_bytes(&json!([1, 2, 255])), Some(vec![1, 2, 255]));
        assert_eq!(value_to_bytes(&json!([])), Some(Vec::new()));
    }

    #[test]
    fn test_array_rejects_non_bytes() {
        assert_eq!(value_to_bytes(&json!([1, 256])), None);
        assert_eq!(value_to_bytes(&json!([1, -1])), None);
        assert_eq!(value_to_bytes(&json!([1.5])), None);
        assert_eq!(value_to_bytes(&json!(["a"])), None);
    }

    #[test]
    fn test_numeric_map_is_positional() {
        let value = json!({"2": 30, "0": 10, "1": 20});
        assert_eq!(value_to_bytes(&value), Some(vec![10, 20, 30]));
    }

    #[test]
    fn test_map_rejects_non_numeric_keys() {
        assert_eq!(value_to_bytes(&json!({"buffer": 1})), None);
        assert_eq!(value_to_bytes(&json!({})), None);
    }

    #[test]
    fn test_scalars_are_not_buffers() {
        assert_eq!(value_to_bytes(&json!("AAEC")), None);
        assert_eq!(value_to_bytes(&json!(7)), None);
        assert_eq!(value_to_bytes(&json!(null)), None);
    }

    #[test]
    fn test_content_field_wins_if_any_chunk_has_it() {
        let mut bare = serde_json::Map::new();
        bare.insert("size".to_string(), json!(2));
        let chunks = vec![
            ChunkRecord { index: 0, fields: bare },
            ChunkRecord::with_content(1, json!([1, 2])),
        ];
        assert_eq!(locate_payload_field(&chunks), Some("content".to_string()));
    }

    #[test]
    fn test_alternate_field_sniffed_from_first_chunk() {
        let mut fields = serde_json::Map::new();
        fields.insert("size".to_string(), json!(3));
        fields.insert("payload".to_string(), json!([7, 8, 9]));
        let chunks = vec![ChunkRecord { index: 0, fields }];
        assert_eq!(locate_payload_field(&chunks), Some("payload".to_string()));
    }

    #[test]
    fn test_no_usable_field() {
        let mut fields = serde_json::Map::new();
        fields.insert("note".to_string(), json!("hello"));
        let chunks = vec![ChunkRecord { index: 0, fields }];
        assert_eq!(locate_payload_field(&chunks), None);
        assert_eq!(locate_payload_field(&[]), None);
    }

    #[test]
    fn test_reassemble_concatenates_in_order() {
        let chunks = vec![
            ChunkRecord::with_content(0, json!([1, 2])),
            ChunkRecord::with_content(1, json!({"0": 3, "1": 4})),
            ChunkRecord::with_content(2, json!([5])),
        ];
        assert_eq!(reassemble(&chunks).unwrap().as_ref(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_reassemble_skips_bad_chunks() {
        let chunks = vec![
            ChunkRecord::with_content(0, json!([1, 2])),
            ChunkRecord::with_content(1, json!("garbled")),
            ChunkRecord::with_content(2, json!([3])),
        ];
        assert_eq!(reassemble(&chunks).unwrap().as_ref(), &[1, 2, 3]);
    }

    #[test]
    fn test_reassemble_total_failure_is_none() {
        let chunks = vec![
            ChunkRecord::with_content(0, json!("zzz")),
            ChunkRecord::with_content(1, json!(true)),
        ];
        assert_eq!(reassemble(&chunks), None);
        assert_eq!(reassemble(&[]), None);
    }

    #[test]
    fn test_chunk_record_wire_shape() {
        let chunk: ChunkRecord = serde_json::from_str(r#"{"index":3,"content":[9]}"#).unwrap();
        assert_eq!(chunk.index, 3);
        assert_eq!(chunk.fields.get("content"), Some(&json!([9])));

        // Index may be absent on some gateways
        let bare: ChunkRecord = serde_json::from_str(r#"{"content":[9]}"#).unwrap();
        assert_eq!(bare.index, 0);
    }
}
