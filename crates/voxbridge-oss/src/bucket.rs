//! Service traits for the object-storage bucket.

use async_trait::async_trait;
use bytes::Bytes;

use voxbridge_shared::credential::AccessCredential;
use voxbridge_shared::types::{FileId, FolderId};

use crate::chunks::ChunkRecord;
use crate::error::OssError;
use crate::types::{FileConfig, FileInfo, FolderInfo};

/// Operations one storage bucket exposes.
///
/// Every call is an independent suspension point with no retry; a failure
/// surfaces immediately and the caller decides whether to re-run the whole
/// operation.
#[async_trait]
pub trait BucketService: Send + Sync {
    /// List the folders directly under `parent`.
    async fn list_folders(&self, parent: FolderId) -> Result<Vec<FolderInfo>, OssError>;

    /// Create a folder under `parent`. The service does not reject
    /// duplicate names; two racing creators end up with two folders.
    async fn create_folder(&self, name: &str, parent: FolderId) -> Result<FolderInfo, OssError>;

    /// Register a new file and receive its id. Content follows through
    /// [`put_chunk`](Self::put_chunk).
    async fn create_file(&self, config: &FileConfig) -> Result<FileId, OssError>;

    /// Append one chunk of file content at `index`.
    async fn put_chunk(&self, file: FileId, index: u32, data: Bytes) -> Result<(), OssError>;

    /// Descriptor for a stored file.
    async fn get_file_info(&self, file: FileId) -> Result<FileInfo, OssError>;

    /// Delete a file. Returns `false` when there was nothing to delete.
    async fn delete_file(&self, file: FileId) -> Result<bool, OssError>;

    /// Read a batch of chunks starting at chunk `offset`. An empty batch
    /// means the end of the file was reached.
    async fn get_file_chunks(&self, file: FileId, offset: u64)
        -> Result<Vec<ChunkRecord>, OssError>;
}

/// Resolves an access credential to a concrete bucket.
#[async_trait]
pub trait BucketConnector: Send + Sync {
    type Bucket: BucketService;

    /// Pick a bucket willing to serve this credential, usually the first
    /// one the cluster advertises.
    async fn connect(&self, credential: &AccessCredential) -> Result<Self::Bucket, OssError>;
}
