use bytes::Bytes;
use serde::{Deserialize, Serialize};

use voxbridge_shared::constants::VOICE_CONTENT_TYPE;
use voxbridge_shared::types::{FileId, FolderId};

/// A folder visible in the bucket tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FolderInfo {
    pub id: FolderId,
    pub name: String,
    pub parent: FolderId,
}

/// Descriptor the bucket keeps for a stored file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileInfo {
    pub id: FileId,
    pub parent: FolderId,
    pub name: String,
    pub content_type: String,
    pub size: u64,
}

/// Everything the bucket needs to accept a new file.
#[derive(Debug, Clone)]
pub struct FileConfig {
    pub name: String,
    pub content_type: String,
    pub parent: FolderId,
    pub content: Bytes,
}

impl FileConfig {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        parent: FolderId,
        content: Bytes,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            parent,
            content,
        }
    }

    /// Config for a voice clip with the default audio content type.
    pub fn voice(name: impl Into<String>, parent: FolderId, content: Bytes) -> Self {
        Self::new(name, VOICE_CONTENT_TYPE, parent, content)
    }
}

/// Progress snapshot reported after each uploaded chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    pub bytes_sent: u64,
    pub bytes_total: u64,
}

/// Callback signature for upload progress reporting. The lifetime lets
/// callers hand in a closure borrowing their own state for the duration
/// of one upload.
pub type ProgressFn<'a> = dyn Fn(UploadProgress) + Send + Sync + 'a;
