//! Chunked download and reconstruction pipeline.
//!
//! The ledger is consulted before any storage call: an id the ledger
//! does not know (or already marked deleted) is `FileNotFound` without
//! touching the bucket. Once chunks are in hand, reconstruction never
//! fails: a file whose chunks all defy normalization degrades to the
//! silent 44-byte WAV clip so every caller receives playable bytes.

use bytes::Bytes;
use tracing::{debug, error, warn};

use voxbridge_ledger::LedgerService;
use voxbridge_media::empty_wav;
use voxbridge_oss::{reassemble, BucketConnector, BucketService, ChunkRecord, OssError};
use voxbridge_shared::constants::MAX_FILE_CHUNKS;
use voxbridge_shared::types::{FileId, Principal, VoiceRecord};

use crate::credential::fetch_access_credential;
use crate::error::BridgeError;

/// Reconstruct the full audio payload for a recorded voice file.
pub async fn fetch_voice_content<L, C>(
    ledger: &L,
    connector: &C,
    file: FileId,
    principal: &Principal,
) -> Result<Bytes, BridgeError>
where
    L: LedgerService,
    C: BucketConnector,
{
    let record = ledger
        .get_voice_file(file)
        .await
        .map_err(BridgeError::LedgerUnavailable)?;
    match record {
        Some(record) if !record.is_deleted() => {}
        _ => return Err(BridgeError::FileNotFound(file)),
    }

    let credential = fetch_access_credential(ledger, principal).await?;
    let bucket = connector
        .connect(&credential)
        .await
        .map_err(BridgeError::StorageReadFailed)?;

    let chunks = fetch_all_chunks(&bucket, file).await?;
    debug!(file = %file, chunks = chunks.len(), "Chunks fetched");

    match reassemble(&chunks) {
        Some(bytes) => Ok(bytes),
        None => {
            // Data loss surfaces here: the player gets a valid silent
            // clip, reconciliation tooling gets this log line.
            error!(file = %file, chunks = chunks.len(), "No chunk yielded audio, serving silent fallback");
            Ok(empty_wav())
        }
    }
}

/// Full ledger record for one file, regardless of status.
pub async fn fetch_voice_info<L: LedgerService>(
    ledger: &L,
    file: FileId,
) -> Result<Option<VoiceRecord>, BridgeError> {
    ledger
        .get_voice_file(file)
        .await
        .map_err(BridgeError::LedgerUnavailable)
}

/// Drain chunk batches starting at offset 0 until the service returns an
/// empty batch, advancing the offset by each batch's length.
///
/// A service that keeps streaming past [`MAX_FILE_CHUNKS`] fails the read
/// outright. Truncating instead would hand back corrupt audio as a
/// success, so the cap is a hard error, never a shortened buffer.
async fn fetch_all_chunks<B: BucketService>(
    bucket: &B,
    file: FileId,
) -> Result<Vec<ChunkRecord>, BridgeError> {
    let mut chunks = Vec::new();
    let mut offset = 0u64;
    loop {
        let batch = bucket
            .get_file_chunks(file, offset)
            .await
            .map_err(BridgeError::StorageReadFailed)?;
        if batch.is_empty() {
            break;
        }
        offset += batch.len() as u64;
        chunks.extend(batch);
        if chunks.len() > MAX_FILE_CHUNKS {
            warn!(file = %file, chunks = chunks.len(), "Chunk cap exceeded, failing the read");
            return Err(BridgeError::StorageReadFailed(OssError::InvalidResponse(
                format!("file {file} exceeds {MAX_FILE_CHUNKS} chunks"),
            )));
        }
    }
    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    use voxbridge_ledger::mock::MemoryLedger;
    use voxbridge_oss::mock::{ChunkShape, MemoryConnector};

    use crate::upload::voice_upload;

    async fn uploaded_fixture(payload: &[u8]) -> (MemoryLedger, MemoryConnector, FileId) {
        let ledger = MemoryLedger::new();
        let connector = MemoryConnector::default();
        let file = voice_upload(
            &ledger,
            &connector,
            Bytes::from(payload.to_vec()),
            "voices",
            &Principal::new("abc"),
            None,
            None,
        )
        .await
        .unwrap();
        (ledger, connector, file)
    }

    #[tokio::test]
    async fn test_upload_download_round_trip() {
        let payload: Vec<u8> = (0..=255u8).cycle().take(5000).collect();
        let (ledger, connector, file) = uploaded_fixture(&payload).await;
        // Force the payload across several read chunks and batches.
        connector.bucket().set_read_chunk_size(64);

        let bytes = fetch_voice_content(&ledger, &connector, file, &Principal::new("abc"))
            .await
            .unwrap();
        assert_eq!(bytes.as_ref(), payload.as_slice());
    }

    #[tokio::test]
    async fn test_numeric_map_chunk_shape_round_trips() {
        let payload = vec![10u8, 20, 30, 40, 50];
        let (ledger, connector, file) = uploaded_fixture(&payload).await;
        connector.bucket().set_chunk_shape(ChunkShape::ContentNumericMap);
        connector.bucket().set_read_chunk_size(2);

        let bytes = fetch_voice_content(&ledger, &connector, file, &Principal::new("abc"))
            .await
            .unwrap();
        assert_eq!(bytes.as_ref(), payload.as_slice());
    }

    #[tokio::test]
    async fn test_alternate_field_name_round_trips() {
        let payload = vec![7u8; 300];
        let (ledger, connector, file) = uploaded_fixture(&payload).await;
        connector
            .bucket()
            .set_chunk_shape(ChunkShape::NamedField("payload".to_string()));

        let bytes = fetch_voice_content(&ledger, &connector, file, &Principal::new("abc"))
            .await
            .unwrap();
        assert_eq!(bytes.as_ref(), payload.as_slice());
    }

    #[tokio::test]
    async fn test_unparseable_chunks_degrade_to_silent_wav() {
        let (ledger, connector, file) = uploaded_fixture(b"real audio bytes").await;
        connector.bucket().set_chunk_shape(ChunkShape::Garbage);

        let bytes = fetch_voice_content(&ledger, &connector, file, &Principal::new("abc"))
            .await
            .unwrap();
        assert_eq!(bytes.len(), 44);
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");
        assert_eq!(&bytes[40..44], &[0, 0, 0, 0]);
    }

    #[tokio::test]
    async fn test_unknown_file_is_not_found_without_storage_call() {
        let ledger = MemoryLedger::new();
        let connector = MemoryConnector::default();

        let err = fetch_voice_content(&ledger, &connector, FileId(404), &Principal::new("abc"))
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::FileNotFound(FileId(404))));
    }

    #[tokio::test]
    async fn test_deleted_record_is_not_found() {
        let (ledger, connector, file) = uploaded_fixture(b"clip").await;
        use voxbridge_ledger::LedgerService as _;
        ledger.mark_voice_file_deleted(file).await.unwrap();

        let err = fetch_voice_content(&ledger, &connector, file, &Principal::new("abc"))
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn test_fetch_voice_info_passthrough() {
        let (ledger, _, file) = uploaded_fixture(b"clip").await;
        let record = fetch_voice_info(&ledger, file).await.unwrap().unwrap();
        assert_eq!(record.file_id, file);
        assert!(fetch_voice_info(&ledger, FileId(404)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_chunk_count_over_cap_fails_instead_of_truncating() {
        let payload = vec![1u8; MAX_FILE_CHUNKS + 904];
        let (ledger, connector, file) = uploaded_fixture(&payload).await;
        // One byte per chunk pushes the file past the chunk cap.
        connector.bucket().set_read_chunk_size(1);

        let err = fetch_voice_content(&ledger, &connector, file, &Principal::new("abc"))
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::StorageReadFailed(_)));
    }

    #[tokio::test]
    async fn test_many_chunks_within_cap_round_trip_completely() {
        let payload: Vec<u8> = (0..=255u8).cycle().take(5000).collect();
        let (ledger, connector, file) = uploaded_fixture(&payload).await;
        connector.bucket().set_read_chunk_size(2);

        let bytes = fetch_voice_content(&ledger, &connector, file, &Principal::new("abc"))
            .await
            .unwrap();
        assert_eq!(bytes.len(), payload.len());
        assert_eq!(bytes.as_ref(), payload.as_slice());
    }

    #[tokio::test]
    async fn test_empty_stored_file_degrades_to_silent_wav() {
        let (ledger, connector, file) = uploaded_fixture(b"").await;

        let bytes = fetch_voice_content(&ledger, &connector, file, &Principal::new("abc"))
            .await
            .unwrap();
        assert_eq!(bytes.len(), 44);
    }
}
