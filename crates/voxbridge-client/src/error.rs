//! Bridge-level error taxonomy.
//!
//! Each variant marks a distinct failure class with its own propagation
//! policy: credential and storage-write failures abort the operation,
//! ledger-record failures after a completed upload are logged and
//! swallowed at the facade, and read-side failures prefer degradation
//! over propagation wherever a playable fallback exists.

use thiserror::Error;

use voxbridge_ledger::LedgerError;
use voxbridge_oss::OssError;
use voxbridge_shared::types::FileId;

/// Errors surfaced by the bridge pipelines.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The ledger refused to issue an access credential. The session is
    /// probably stale; the UI should prompt a wallet reconnect.
    #[error("Access credential unavailable: {0}")]
    CredentialUnavailable(#[source] LedgerError),

    /// A storage-side write (folder create, file register, chunk put,
    /// delete) failed before completion. No file handle exists.
    #[error("Storage write failed: {0}")]
    StorageWriteFailed(#[source] OssError),

    /// A storage-side read (bucket connect, chunk fetch) failed.
    #[error("Storage read failed: {0}")]
    StorageReadFailed(#[source] OssError),

    /// The ledger rejected the record for an already-completed upload.
    /// Non-fatal: the storage object is real and its id is returned to
    /// the caller; this variant exists for the divergence log.
    #[error("Ledger record failed after a completed upload: {0}")]
    LedgerRecordFailed(#[source] LedgerError),

    /// The ledger has no active record for this file id.
    #[error("No voice file {0}")]
    FileNotFound(FileId),

    /// Payload rejected before any network call.
    #[error("Payload of {size} bytes exceeds the {max} byte limit")]
    PayloadTooLarge { size: usize, max: usize },

    /// The ledger could not serve a listing or lookup.
    #[error("Ledger unavailable: {0}")]
    LedgerUnavailable(#[source] LedgerError),
}
