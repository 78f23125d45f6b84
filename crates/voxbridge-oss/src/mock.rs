//! In-memory bucket used by tests and offline development.
//!
//! Shape injection mirrors the chunk drift seen from real gateways so the
//! normalization chain can be exercised end to end without a network.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::{Map, Value};

use voxbridge_shared::credential::AccessCredential;
use voxbridge_shared::types::{FileId, FolderId};

use crate::bucket::{BucketConnector, BucketService};
use crate::chunks::{ChunkRecord, CONTENT_FIELD};
use crate::error::OssError;
use crate::types::{FileConfig, FileInfo, FolderInfo};

/// Largest chunk batch the mock returns per read, to exercise the
/// offset-paging loop in downloads.
const MAX_CHUNK_BATCH: usize = 8;

/// Wire shapes the mock can serve chunks in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkShape {
    /// `{"content": [b0, b1, ...]}`
    ContentArray,
    /// `{"content": {"0": b0, "1": b1, ...}}`
    ContentNumericMap,
    /// Payload under a non-conventional field name.
    NamedField(String),
    /// Payload no decoder can read.
    Garbage,
}

struct StoredFile {
    name: String,
    content_type: String,
    parent: FolderId,
    content: Vec<u8>,
}

struct BucketState {
    next_folder: u32,
    next_file: u32,
    folders: Vec<FolderInfo>,
    files: HashMap<u32, StoredFile>,
    chunk_shape: ChunkShape,
    read_chunk_size: usize,
    fail_create_folder: bool,
    fail_put_chunk: bool,
}

impl Default for BucketState {
    fn default() -> Self {
        Self {
            next_folder: 0,
            next_file: 0,
            folders: Vec::new(),
            files: HashMap::new(),
            chunk_shape: ChunkShape::ContentArray,
            read_chunk_size: 1024,
            fail_create_folder: false,
            fail_put_chunk: false,
        }
    }
}

/// Shared in-memory bucket. Clones share the same state, so one clone can
/// be handed to a connector while the test keeps its own handle for
/// assertions.
#[derive(Clone, Default)]
pub struct MemoryBucket {
    state: Arc<Mutex<BucketState>>,
}

impl MemoryBucket {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BucketState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Switch the wire shape served by [`get_file_chunks`](BucketService::get_file_chunks).
    pub fn set_chunk_shape(&self, shape: ChunkShape) {
        self.lock().chunk_shape = shape;
    }

    /// Shrink the read chunk granularity, so small payloads still span
    /// several chunks.
    pub fn set_read_chunk_size(&self, size: usize) {
        self.lock().read_chunk_size = size.max(1);
    }

    pub fn set_fail_create_folder(&self, fail: bool) {
        self.lock().fail_create_folder = fail;
    }

    pub fn set_fail_put_chunk(&self, fail: bool) {
        self.lock().fail_put_chunk = fail;
    }

    pub fn folder_named(&self, name: &str) -> Option<FolderInfo> {
        self.lock().folders.iter().find(|f| f.name == name).cloned()
    }

    pub fn folder_count(&self) -> usize {
        self.lock().folders.len()
    }

    pub fn file_count(&self) -> usize {
        self.lock().files.len()
    }

    /// Raw stored bytes for a file, if it exists.
    pub fn stored_content(&self, file: FileId) -> Option<Vec<u8>> {
        self.lock().files.get(&file.0).map(|f| f.content.clone())
    }
}

fn shape_chunk(shape: &ChunkShape, index: u64, piece: &[u8]) -> ChunkRecord {
    let payload: Value = match shape {
        ChunkShape::ContentArray | ChunkShape::NamedField(_) => {
            Value::Array(piece.iter().map(|b| Value::from(*b)).collect())
        }
        ChunkShape::ContentNumericMap => {
            let mut map = Map::new();
            for (i, b) in piece.iter().enumerate() {
                map.insert(i.to_string(), Value::from(*b));
            }
            Value::Object(map)
        }
        ChunkShape::Garbage => Value::String("zzzz-not-bytes".to_string()),
    };
    let field = match shape {
        ChunkShape::NamedField(name) => name.clone(),
        _ => CONTENT_FIELD.to_string(),
    };
    let mut fields = Map::new();
    fields.insert(field, payload);
    ChunkRecord { index, fields }
}

#[async_trait]
impl BucketService for MemoryBucket {
    async fn list_folders(&self, parent: FolderId) -> Result<Vec<FolderInfo>, OssError> {
        Ok(self
            .lock()
            .folders
            .iter()
            .filter(|f| f.parent == parent)
            .cloned()
            .collect())
    }

    async fn create_folder(&self, name: &str, parent: FolderId) -> Result<FolderInfo, OssError> {
        let mut state = self.lock();
        if state.fail_create_folder {
            return Err(OssError::Rejected {
                status: 503,
                message: "folder create refused".to_string(),
            });
        }
        state.next_folder += 1;
        let info = FolderInfo {
            id: FolderId(state.next_folder),
            name: name.to_string(),
            parent,
        };
        state.folders.push(info.clone());
        Ok(info)
    }

    async fn create_file(&self, config: &FileConfig) -> Result<FileId, OssError> {
        let mut state = self.lock();
        state.next_file += 1;
        let id = state.next_file;
        state.files.insert(
            id,
            StoredFile {
                name: config.name.clone(),
                content_type: config.content_type.clone(),
                parent: config.parent,
                content: Vec::new(),
            },
        );
        Ok(FileId(id))
    }

    async fn put_chunk(&self, file: FileId, _index: u32, data: Bytes) -> Result<(), OssError> {
        let mut state = self.lock();
        if state.fail_put_chunk {
            return Err(OssError::Rejected {
                status: 503,
                message: "chunk refused".to_string(),
            });
        }
        match state.files.get_mut(&file.0) {
            Some(stored) => {
                stored.content.extend_from_slice(&data);
                Ok(())
            }
            None => Err(OssError::Rejected {
                status: 404,
                message: format!("no file {file}"),
            }),
        }
    }

    async fn get_file_info(&self, file: FileId) -> Result<FileInfo, OssError> {
        let state = self.lock();
        match state.files.get(&file.0) {
            Some(stored) => Ok(FileInfo {
                id: file,
                parent: stored.parent,
                name: stored.name.clone(),
                content_type: stored.content_type.clone(),
                size: stored.content.len() as u64,
            }),
            None => Err(OssError::Rejected {
                status: 404,
                message: format!("no file {file}"),
            }),
        }
    }

    async fn delete_file(&self, file: FileId) -> Result<bool, OssError> {
        Ok(self.lock().files.remove(&file.0).is_some())
    }

    async fn get_file_chunks(
        &self,
        file: FileId,
        offset: u64,
    ) -> Result<Vec<ChunkRecord>, OssError> {
        let state = self.lock();
        let stored = match state.files.get(&file.0) {
            Some(s) => s,
            None => {
                return Err(OssError::Rejected {
                    status: 404,
                    message: format!("no file {file}"),
                })
            }
        };
        let size = state.read_chunk_size.max(1);
        Ok(stored
            .content
            .chunks(size)
            .enumerate()
            .skip(offset as usize)
            .take(MAX_CHUNK_BATCH)
            .map(|(i, piece)| shape_chunk(&state.chunk_shape, i as u64, piece))
            .collect())
    }
}

/// Connector that always hands out the same shared bucket.
#[derive(Clone, Default)]
pub struct MemoryConnector {
    bucket: MemoryBucket,
}

impl MemoryConnector {
    pub fn new(bucket: MemoryBucket) -> Self {
        Self { bucket }
    }

    pub fn bucket(&self) -> &MemoryBucket {
        &self.bucket
    }
}

#[async_trait]
impl BucketConnector for MemoryConnector {
    type Bucket = MemoryBucket;

    async fn connect(&self, _credential: &AccessCredential) -> Result<MemoryBucket, OssError> {
        Ok(self.bucket.clone())
    }
}
