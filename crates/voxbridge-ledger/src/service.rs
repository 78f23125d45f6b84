//! Ledger service contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use voxbridge_shared::metadata::VoiceMetadata;
use voxbridge_shared::types::{FileId, FolderId, Principal, VoiceFileInfo, VoiceRecord};

use crate::error::LedgerError;

/// Access grant returned by the ledger: an opaque token string plus the
/// logical folder the grant is scoped to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessGrant {
    pub access_token: String,
    pub folder: String,
}

/// Position of a row in the ledger, returned by the record operation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordId(pub u64);

/// The backend ledger holding the authoritative voice-file records.
///
/// All operations are remote calls that fail independently of the storage
/// service; callers decide per operation whether a failure is fatal.
#[async_trait]
pub trait LedgerService: Send + Sync {
    /// Issue a storage access token scoped to `principal`.
    async fn get_access_token(&self, principal: &Principal) -> Result<AccessGrant, LedgerError>;

    /// Record an uploaded file. Upserts on `file`: recording the same
    /// storage id twice updates the existing row instead of creating a
    /// duplicate.
    async fn record_voice_file(
        &self,
        principal: &Principal,
        folder: FolderId,
        file: FileId,
        metadata: Option<VoiceMetadata>,
    ) -> Result<RecordId, LedgerError>;

    /// Flip a record to deleted. Only called after the storage-side delete
    /// succeeded, so the ledger never points at content that still exists.
    async fn mark_voice_file_deleted(&self, file: FileId) -> Result<(), LedgerError>;

    /// One page of voice files, oldest first. Pages are 1-based; deleted
    /// records are filtered out.
    async fn list_voice_files(
        &self,
        principal: Option<&Principal>,
        folder: Option<FolderId>,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<VoiceFileInfo>, LedgerError>;

    /// Full record for one file, regardless of status.
    async fn get_voice_file(&self, file: FileId) -> Result<Option<VoiceRecord>, LedgerError>;
}
