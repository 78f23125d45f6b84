//! Storage access credentials and token-encoding detection.
//!
//! The ledger hands back an access token as an opaque string. The storage
//! service tolerates base64, hex and raw-text tokens, so the wire encoding
//! has to be inferred from the string itself before the byte form can be
//! recovered.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::types::Principal;

/// Wire encoding inferred for an access token string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenEncoding {
    Base64,
    Hex,
    Raw,
}

/// Classify how a token string is encoded.
///
/// Base64 is attempted first: every hex string also matches the base64
/// character class, so the call is decided by an actual decode attempt,
/// not by pattern alone. A token that fails the decode falls through to
/// hex, then raw UTF-8.
pub fn classify_token_encoding(token: &str) -> TokenEncoding {
    if !token.is_empty() && token.bytes().all(is_base64_char) && BASE64.decode(token).is_ok() {
        return TokenEncoding::Base64;
    }
    if !token.is_empty() && token.bytes().all(|b| b.is_ascii_hexdigit()) {
        return TokenEncoding::Hex;
    }
    TokenEncoding::Raw
}

fn is_base64_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'+' || b == b'/' || b == b'='
}

/// Recover the raw token bytes for a classified encoding.
///
/// Decode failures fall back to the UTF-8 bytes of the string so callers
/// always have something to present to the storage service.
pub fn decode_token(token: &str, encoding: TokenEncoding) -> Vec<u8> {
    match encoding {
        TokenEncoding::Base64 => match BASE64.decode(token) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(error = %e, "Base64 token failed to decode, using raw bytes");
                token.as_bytes().to_vec()
            }
        },
        TokenEncoding::Hex => match hex::decode(token) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(error = %e, "Hex token failed to decode, using raw bytes");
                token.as_bytes().to_vec()
            }
        },
        TokenEncoding::Raw => token.as_bytes().to_vec(),
    }
}

/// A scoped storage credential issued by the ledger for one identity.
///
/// Request-scoped: fetched fresh per operation and never cached, so a
/// stale token can only ever fail the single call that carried it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessCredential {
    /// Decoded token bytes presented to the storage service.
    pub token: Vec<u8>,
    /// Encoding the token string arrived in.
    pub encoding: TokenEncoding,
    /// Logical folder the credential is scoped to.
    pub folder: String,
    /// Identity the credential was issued for.
    pub issued_for: Principal,
}

impl AccessCredential {
    /// Build a credential from the raw token string the ledger returned.
    pub fn issue(raw_token: &str, folder: impl Into<String>, issued_for: Principal) -> Self {
        let encoding = classify_token_encoding(raw_token);
        let token = decode_token(raw_token, encoding);
        Self {
            token,
            encoding,
            folder: folder.into(),
            issued_for,
        }
    }
}
