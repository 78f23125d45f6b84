use serde::{Deserialize, Serialize};

use crate::metadata::VoiceMetadata;

// Identity principal as issued by the wallet provider (opaque string)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Principal(pub String);

impl Principal {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Abbreviated form for logs and UI labels: first five and last three
    /// characters with an ellipsis in between.
    pub fn short(&self) -> String {
        const HEAD: usize = 5;
        const TAIL: usize = 3;
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= HEAD + TAIL {
            return self.0.clone();
        }
        let head: String = chars[..HEAD].iter().collect();
        let tail: String = chars[chars.len() - TAIL..].iter().collect();
        format!("{head}...{tail}")
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Storage-service-assigned identifiers
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub u32);

impl std::fmt::Display for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FolderId(pub u32);

impl FolderId {
    /// Root folder of a storage bucket.
    pub const ROOT: FolderId = FolderId(0);
}

impl std::fmt::Display for FolderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ledger status of a stored file. The wire format is a signed integer:
/// `0` for active, `-1` for deleted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "i32", into = "i32")]
pub enum FileStatus {
    Active,
    Deleted,
}

impl From<i32> for FileStatus {
    fn from(raw: i32) -> Self {
        if raw == -1 {
            Self::Deleted
        } else {
            Self::Active
        }
    }
}

impl From<FileStatus> for i32 {
    fn from(status: FileStatus) -> Self {
        match status {
            FileStatus::Active => 0,
            FileStatus::Deleted => -1,
        }
    }
}

/// Handle produced once the storage service acknowledges a complete upload.
/// Immutable afterwards; the sole key used to address the file in download,
/// delete and ledger operations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadedFileHandle {
    pub file_id: FileId,
    pub folder_id: FolderId,
}

/// Authoritative ledger row describing one stored voice file.
///
/// Owned by the backend ledger; the bridge only reads it, or writes it
/// through the sanctioned record / mark-deleted operations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoiceRecord {
    pub file_id: FileId,
    pub folder_id: FolderId,
    pub principal: Principal,
    /// Creation time in epoch nanoseconds as reported by the ledger.
    pub created_at: u64,
    pub updated_at: Option<u64>,
    pub status: FileStatus,
    #[serde(default)]
    pub metadata: VoiceMetadata,
}

impl VoiceRecord {
    pub fn is_deleted(&self) -> bool {
        self.status == FileStatus::Deleted
    }

    /// Listing view of this record, without the owner fields.
    pub fn info(&self) -> VoiceFileInfo {
        VoiceFileInfo {
            file_id: self.file_id,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
            metadata: self.metadata.clone(),
        }
    }
}

/// Per-file view returned by the ledger's listing operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoiceFileInfo {
    pub file_id: FileId,
    pub status: FileStatus,
    pub created_at: u64,
    pub updated_at: Option<u64>,
    #[serde(default)]
    pub metadata: VoiceMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_principal_short() {
        let p = Principal::new("k5ze6-4pnsf-aaaaa-qqqqq-cai");
        assert_eq!(p.short(), "k5ze6...cai");
        let tiny = Principal::new("abc");
        assert_eq!(tiny.short(), "abc");
    }

    #[test]
    fn test_status_wire_values() {
        assert_eq!(FileStatus::from(0), FileStatus::Active);
        assert_eq!(FileStatus::from(-1), FileStatus::Deleted);
        assert_eq!(FileStatus::from(7), FileStatus::Active);
        assert_eq!(i32::from(FileStatus::Deleted), -1);
    }

    #[test]
    fn test_status_serde_as_integer() {
        let json = serde_json::to_string(&FileStatus::Deleted).unwrap();
        assert_eq!(json, "-1");
        let back: FileStatus = serde_json::from_str("0").unwrap();
        assert_eq!(back, FileStatus::Active);
    }

    #[test]
    fn test_record_info_projection() {
        let record = VoiceRecord {
            file_id: FileId(7),
            folder_id: FolderId(3),
            principal: Principal::new("abc"),
            created_at: 1_700_000_000_000_000_000,
            updated_at: None,
            status: FileStatus::Active,
            metadata: VoiceMetadata::new(),
        };
        let info = record.info();
        assert_eq!(info.file_id, FileId(7));
        assert_eq!(info.created_at, record.created_at);
    }
}
