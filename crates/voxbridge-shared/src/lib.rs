//! # voxbridge-shared
//!
//! Common domain types for the voice storage bridge: principals, file and
//! folder handles, ledger records, tagged metadata, wallet sessions and
//! storage access credentials.
//!
//! Everything here derives `Serialize`/`Deserialize` so the same structs
//! travel over the ledger wire format and can be handed to a UI layer
//! unchanged.

pub mod constants;
pub mod credential;
pub mod metadata;
pub mod session;
pub mod types;

pub use credential::{classify_token_encoding, decode_token, AccessCredential, TokenEncoding};
pub use metadata::{MetadataValue, VoiceMetadata};
pub use session::{Session, WalletKind};
pub use types::*;
