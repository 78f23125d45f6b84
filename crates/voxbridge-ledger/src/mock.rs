//! In-memory ledger used by tests and offline development.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use voxbridge_shared::constants::DEFAULT_PAGE_SIZE;
use voxbridge_shared::metadata::VoiceMetadata;
use voxbridge_shared::types::{
    FileId, FileStatus, FolderId, Principal, VoiceFileInfo, VoiceRecord,
};

use crate::error::LedgerError;
use crate::service::{AccessGrant, LedgerService, RecordId};

struct LedgerState {
    rows: Vec<VoiceRecord>,
    grant_folder: String,
    fail_token: bool,
    fail_record: bool,
    fail_mark: bool,
    fail_list: bool,
}

impl Default for LedgerState {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            grant_folder: "voices".to_string(),
            fail_token: false,
            fail_record: false,
            fail_mark: false,
            fail_list: false,
        }
    }
}

/// Shared in-memory ledger. Clones share the same state, so a clone can
/// be wired into a bridge while the test keeps its own handle for
/// assertions and failure injection.
#[derive(Clone, Default)]
pub struct MemoryLedger {
    state: Arc<Mutex<LedgerState>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn now_nanos() -> u64 {
        Utc::now().timestamp_nanos_opt().unwrap_or_default() as u64
    }

    pub fn set_grant_folder(&self, folder: impl Into<String>) {
        self.lock().grant_folder = folder.into();
    }

    pub fn set_fail_token(&self, fail: bool) {
        self.lock().fail_token = fail;
    }

    pub fn set_fail_record(&self, fail: bool) {
        self.lock().fail_record = fail;
    }

    pub fn set_fail_mark(&self, fail: bool) {
        self.lock().fail_mark = fail;
    }

    pub fn set_fail_list(&self, fail: bool) {
        self.lock().fail_list = fail;
    }

    /// Snapshot of every row, including deleted ones.
    pub fn records(&self) -> Vec<VoiceRecord> {
        self.lock().rows.clone()
    }

    pub fn record_for(&self, file: FileId) -> Option<VoiceRecord> {
        self.lock().rows.iter().find(|r| r.file_id == file).cloned()
    }
}

#[async_trait]
impl LedgerService for MemoryLedger {
    async fn get_access_token(&self, principal: &Principal) -> Result<AccessGrant, LedgerError> {
        let state = self.lock();
        if state.fail_token {
            return Err(LedgerError::Api("token refused".to_string()));
        }
        Ok(AccessGrant {
            access_token: format!("grant:{principal}"),
            folder: state.grant_folder.clone(),
        })
    }

    async fn record_voice_file(
        &self,
        principal: &Principal,
        folder: FolderId,
        file: FileId,
        metadata: Option<VoiceMetadata>,
    ) -> Result<RecordId, LedgerError> {
        let mut state = self.lock();
        if state.fail_record {
            return Err(LedgerError::Api("record refused".to_string()));
        }
        let now = Self::now_nanos();
        let metadata = metadata.unwrap_or_default();
        if let Some(position) = state.rows.iter().position(|r| r.file_id == file) {
            let row = &mut state.rows[position];
            row.folder_id = folder;
            row.principal = principal.clone();
            row.metadata = metadata;
            row.updated_at = Some(now);
            // A fresh record revives a row that was marked deleted.
            row.status = FileStatus::Active;
            return Ok(RecordId(position as u64));
        }
        state.rows.push(VoiceRecord {
            file_id: file,
            folder_id: folder,
            principal: principal.clone(),
            created_at: now,
            updated_at: None,
            status: FileStatus::Active,
            metadata,
        });
        Ok(RecordId((state.rows.len() - 1) as u64))
    }

    async fn mark_voice_file_deleted(&self, file: FileId) -> Result<(), LedgerError> {
        let mut state = self.lock();
        if state.fail_mark {
            return Err(LedgerError::Api("mark refused".to_string()));
        }
        match state.rows.iter_mut().find(|r| r.file_id == file) {
            Some(row) => {
                row.status = FileStatus::Deleted;
                row.updated_at = Some(Self::now_nanos());
                Ok(())
            }
            None => Err(LedgerError::Api(format!("no record for file {file}"))),
        }
    }

    async fn list_voice_files(
        &self,
        principal: Option<&Principal>,
        folder: Option<FolderId>,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<VoiceFileInfo>, LedgerError> {
        let state = self.lock();
        if state.fail_list {
            return Err(LedgerError::Api("list refused".to_string()));
        }
        let page = page.max(1);
        let page_size = if page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            page_size
        };
        let skip = ((page - 1) * page_size) as usize;
        Ok(state
            .rows
            .iter()
            .filter(|r| !r.is_deleted())
            .filter(|r| principal.map_or(true, |p| r.principal == *p))
            .filter(|r| folder.map_or(true, |f| r.folder_id == f))
            .skip(skip)
            .take(page_size as usize)
            .map(VoiceRecord::info)
            .collect())
    }

    async fn get_voice_file(&self, file: FileId) -> Result<Option<VoiceRecord>, LedgerError> {
        Ok(self.lock().rows.iter().find(|r| r.file_id == file).cloned())
    }
}
