//! # voxbridge-ledger
//!
//! Contract and HTTP bindings for the backend voice ledger: access token
//! grants, authoritative voice-file records, status transitions and
//! paginated listing.

pub mod http;
#[cfg(feature = "mock-data")]
pub mod mock;
pub mod service;

mod error;

pub use error::LedgerError;
pub use http::HttpLedger;
pub use service::{AccessGrant, LedgerService, RecordId};
