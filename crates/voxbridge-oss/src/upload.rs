//! Chunked upload driver.

use tracing::{debug, info};

use voxbridge_shared::constants::UPLOAD_CHUNK_SIZE;
use voxbridge_shared::types::FileId;

use crate::bucket::BucketService;
use crate::error::OssError;
use crate::types::{FileConfig, ProgressFn, UploadProgress};

/// Drives a complete file upload over any [`BucketService`].
///
/// The payload is cut into fixed-size chunks and sent strictly in order.
/// A failed chunk aborts the upload with no cleanup of already-sent data;
/// the partial object is unreachable by anyone until a ledger record
/// exists, so it can only leak storage, not state.
pub struct Uploader<'a, B> {
    bucket: &'a B,
}

impl<'a, B: BucketService> Uploader<'a, B> {
    pub fn new(bucket: &'a B) -> Self {
        Self { bucket }
    }

    /// Upload the configured file, reporting progress after every chunk.
    pub async fn upload(
        &self,
        config: FileConfig,
        on_progress: Option<&ProgressFn<'_>>,
    ) -> Result<FileId, OssError> {
        let total = config.content.len() as u64;
        let file_id = self.bucket.create_file(&config).await?;

        let mut index = 0u32;
        let mut sent = 0u64;
        let mut offset = 0usize;
        while offset < config.content.len() {
            let end = (offset + UPLOAD_CHUNK_SIZE).min(config.content.len());
            let chunk = config.content.slice(offset..end);
            let len = chunk.len() as u64;
            self.bucket.put_chunk(file_id, index, chunk).await?;
            sent += len;
            debug!(file = %file_id, index, sent, total, "Chunk stored");
            if let Some(report) = on_progress {
                report(UploadProgress {
                    bytes_sent: sent,
                    bytes_total: total,
                });
            }
            index += 1;
            offset = end;
        }

        info!(file = %file_id, bytes = total, chunks = index, "Upload complete");
        Ok(file_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use async_trait::async_trait;
    use bytes::Bytes;

    use voxbridge_shared::types::FolderId;

    use crate::chunks::ChunkRecord;
    use crate::types::{FileInfo, FolderInfo};

    #[derive(Default)]
    struct SpyBucket {
        chunks: Mutex<Vec<(u32, Bytes)>>,
        fail_chunk: Option<u32>,
    }

    #[async_trait]
    impl BucketService for SpyBucket {
        async fn list_folders(&self, _parent: FolderId) -> Result<Vec<FolderInfo>, OssError> {
            Ok(Vec::new())
        }

        async fn create_folder(
            &self,
            name: &str,
            parent: FolderId,
        ) -> Result<FolderInfo, OssError> {
            Ok(FolderInfo {
                id: FolderId(1),
                name: name.to_string(),
                parent,
            })
        }

        async fn create_file(&self, _config: &FileConfig) -> Result<FileId, OssError> {
            Ok(FileId(7))
        }

        async fn put_chunk(&self, _file: FileId, index: u32, data: Bytes) -> Result<(), OssError> {
            if self.fail_chunk == Some(index) {
                return Err(OssError::Rejected {
                    status: 503,
                    message: "chunk refused".to_string(),
                });
            }
            self.chunks.lock().unwrap().push((index, data));
            Ok(())
        }

        async fn get_file_info(&self, file: FileId) -> Result<FileInfo, OssError> {
            Ok(FileInfo {
                id: file,
                parent: FolderId::ROOT,
                name: String::new(),
                content_type: String::new(),
                size: 0,
            })
        }

        async fn delete_file(&self, _file: FileId) -> Result<bool, OssError> {
            Ok(false)
        }

        async fn get_file_chunks(
            &self,
            _file: FileId,
            _offset: u64,
        ) -> Result<Vec<ChunkRecord>, OssError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_payload_is_chunked_in_order() {
        let bucket = SpyBucket::default();
        let payload = Bytes::from(vec![9u8; UPLOAD_CHUNK_SIZE * 2 + 5]);
        let config = FileConfig::voice("clip.wav", FolderId::ROOT, payload.clone());

        let id = Uploader::new(&bucket).upload(config, None).await.unwrap();
        assert_eq!(id, FileId(7));

        let chunks = bucket.chunks.lock().unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].0, 0);
        assert_eq!(chunks[1].0, 1);
        assert_eq!(chunks[0].1.len(), UPLOAD_CHUNK_SIZE);
        assert_eq!(chunks[2].1.len(), 5);

        let rebuilt: Vec<u8> = chunks.iter().flat_map(|(_, c)| c.to_vec()).collect();
        assert_eq!(rebuilt, payload.to_vec());
    }

    #[tokio::test]
    async fn test_progress_is_monotonic_and_complete() {
        let bucket = SpyBucket::default();
        let total = (UPLOAD_CHUNK_SIZE * 2 + 1) as u64;
        let config = FileConfig::voice(
            "clip.wav",
            FolderId::ROOT,
            Bytes::from(vec![0u8; total as usize]),
        );

        let seen = Mutex::new(Vec::new());
        let report = |p: UploadProgress| seen.lock().unwrap().push(p);
        Uploader::new(&bucket)
            .upload(config, Some(&report))
            .await
            .unwrap();

        let seen = seen.into_inner().unwrap();
        assert_eq!(seen.len(), 3);
        assert!(seen.windows(2).all(|w| w[0].bytes_sent < w[1].bytes_sent));
        assert_eq!(seen.last().unwrap().bytes_sent, total);
        assert!(seen.iter().all(|p| p.bytes_total == total));
    }

    #[tokio::test]
    async fn test_failed_chunk_aborts() {
        let bucket = SpyBucket {
            fail_chunk: Some(1),
            ..Default::default()
        };
        let config = FileConfig::voice(
            "clip.wav",
            FolderId::ROOT,
            Bytes::from(vec![0u8; UPLOAD_CHUNK_SIZE * 2]),
        );

        let err = Uploader::new(&bucket).upload(config, None).await.unwrap_err();
        assert!(matches!(err, OssError::Rejected { .. }));
        assert_eq!(bucket.chunks.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_payload_creates_file_without_chunks() {
        let bucket = SpyBucket::default();
        let config = FileConfig::voice("empty.wav", FolderId::ROOT, Bytes::new());

        let id = Uploader::new(&bucket).upload(config, None).await.unwrap();
        assert_eq!(id, FileId(7));
        assert!(bucket.chunks.lock().unwrap().is_empty());
    }
}
