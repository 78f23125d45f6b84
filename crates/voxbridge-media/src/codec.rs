//! Data-URL transport encoding for audio payloads.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bytes::Bytes;
use tracing::warn;

use voxbridge_shared::constants::AUDIO_DATA_URL_PREFIX;

/// Encode raw audio bytes into a browser-playable data URL.
pub fn encode_data_url(bytes: &[u8]) -> String {
    format!("{}{}", AUDIO_DATA_URL_PREFIX, BASE64.encode(bytes))
}

/// Decode a data URL or bare base64 string back into raw bytes.
///
/// Fails soft: malformed input (non-base64 text, JSON-shaped payloads)
/// yields an empty buffer with a logged warning instead of an error.
pub fn decode_data_url(input: &str) -> Bytes {
    let payload = match input.split_once(',') {
        Some((head, rest)) if head.starts_with("data:") => rest,
        _ => input,
    };
    let payload = payload.trim();

    if payload.is_empty() {
        return Bytes::new();
    }
    // A JSON body sometimes leaks through where audio was expected.
    if payload.starts_with('{') || payload.starts_with('[') {
        warn!(len = payload.len(), "JSON-shaped payload where base64 audio was expected");
        return Bytes::new();
    }

    match BASE64.decode(payload) {
        Ok(bytes) => Bytes::from(bytes),
        Err(e) => {
            warn!(error = %e, len = payload.len(), "Malformed base64 audio payload");
            Bytes::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let payload = vec![0u8, 1, 2, 250, 255];
        let url = encode_data_url(&payload);
        assert!(url.starts_with("data:audio/wav;base64,"));
        assert_eq!(decode_data_url(&url).as_ref(), payload.as_slice());
    }

    #[test]
    fn test_bare_base64_accepted() {
        let bare = BASE64.encode(b"voice");
        assert_eq!(decode_data_url(&bare).as_ref(), b"voice");
    }

    #[test]
    fn test_malformed_input_degrades_to_empty() {
        assert!(decode_data_url("not base64 at all!!").is_empty());
        assert!(decode_data_url(r#"{"Err":"no such file"}"#).is_empty());
        assert!(decode_data_url("[1,2,3]").is_empty());
        assert!(decode_data_url("").is_empty());
    }

    #[test]
    fn test_empty_payload_round_trip() {
        let url = encode_data_url(&[]);
        assert!(decode_data_url(&url).is_empty());
    }
}
