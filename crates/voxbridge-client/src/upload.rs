//! Chunked upload pipeline.
//!
//! One upload is a strict sequence: size gate, credential, bucket
//! connect, folder resolution, chunked payload transfer, ledger record.
//! Failures up to and including the transfer abort with nothing to show.
//! A ledger failure after the transfer is a recoverable inconsistency:
//! the storage object exists, its id is returned, and the divergence is
//! logged for reconciliation tooling.

use bytes::Bytes;
use chrono::Utc;
use tracing::{error, info, warn};

use voxbridge_ledger::LedgerService;
use voxbridge_media::recording_file_name;
use voxbridge_oss::{BucketConnector, BucketService, FileConfig, ProgressFn, Uploader};
use voxbridge_shared::constants::MAX_VOICE_FILE_SIZE;
use voxbridge_shared::metadata::{MetadataValue, VoiceMetadata};
use voxbridge_shared::types::{FileId, FolderId, Principal};

use crate::credential::fetch_access_credential;
use crate::error::BridgeError;

/// Upload a recorded voice payload and record it in the ledger.
///
/// Returns the storage-assigned file id. The id is returned even when
/// the ledger record fails, because the storage object is real and
/// retrievable; that failure is only visible in the logs.
pub async fn voice_upload<L, C>(
    ledger: &L,
    connector: &C,
    payload: Bytes,
    folder_path: &str,
    principal: &Principal,
    metadata: Option<VoiceMetadata>,
    on_progress: Option<&ProgressFn<'_>>,
) -> Result<FileId, BridgeError>
where
    L: LedgerService,
    C: BucketConnector,
{
    if payload.len() > MAX_VOICE_FILE_SIZE {
        return Err(BridgeError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_VOICE_FILE_SIZE,
        });
    }

    let credential = fetch_access_credential(ledger, principal).await?;
    let bucket = connector
        .connect(&credential)
        .await
        .map_err(BridgeError::StorageWriteFailed)?;

    let folder_id = resolve_folder(&bucket, folder_path).await?;

    let mut metadata = metadata.unwrap_or_default();
    if !metadata.contains_key("checksum") {
        let checksum = blake3::hash(&payload);
        metadata.insert("checksum", MetadataValue::text(checksum.to_hex().as_str()));
    }

    let name = recording_file_name(Utc::now());
    let total = payload.len() as u64;
    let config = FileConfig::voice(name.clone(), folder_id, payload);
    let file_id = Uploader::new(&bucket)
        .upload(config, on_progress)
        .await
        .map_err(BridgeError::StorageWriteFailed)?;

    // Post-upload confirmation; informational only.
    match bucket.get_file_info(file_id).await {
        Ok(info) => {
            if info.size != total {
                warn!(
                    file = %file_id,
                    stored = info.size,
                    sent = total,
                    "Stored size differs from sent size"
                );
            }
        }
        Err(e) => warn!(file = %file_id, error = %e, "Post-upload confirmation failed"),
    }

    match ledger
        .record_voice_file(principal, folder_id, file_id, Some(metadata))
        .await
    {
        Ok(record_id) => {
            info!(
                file = %file_id,
                folder = %folder_id,
                record = record_id.0,
                principal = %principal.short(),
                name = %name,
                bytes = total,
                "Voice upload recorded"
            );
        }
        Err(e) => {
            // Storage and ledger have diverged: the object exists with no
            // record. The id still goes back to the caller.
            let divergence = BridgeError::LedgerRecordFailed(e);
            error!(
                file = %file_id,
                folder = %folder_id,
                principal = %principal.short(),
                error = %divergence,
                "Upload stored but not recorded"
            );
        }
    }

    Ok(file_id)
}

/// Resolve a logical folder name to its id, creating it on first use.
///
/// An empty name means the bucket root. A create failure triggers one
/// re-list before giving up, which covers losing a concurrent-create
/// race; two racing winners still end up with duplicate folder names
/// (accepted, last-writer-wins).
pub(crate) async fn resolve_folder<B: BucketService>(
    bucket: &B,
    name: &str,
) -> Result<FolderId, BridgeError> {
    if name.is_empty() {
        return Ok(FolderId::ROOT);
    }

    let folders = bucket
        .list_folders(FolderId::ROOT)
        .await
        .map_err(BridgeError::StorageWriteFailed)?;
    if let Some(existing) = folders.iter().find(|f| f.name == name) {
        return Ok(existing.id);
    }

    match bucket.create_folder(name, FolderId::ROOT).await {
        Ok(created) => {
            info!(folder = %created.id, name = %name, "Folder created");
            Ok(created.id)
        }
        Err(create_err) => {
            // The re-list is best effort; whatever happens, the create
            // error is the one that surfaces.
            match bucket.list_folders(FolderId::ROOT).await {
                Ok(folders) => {
                    if let Some(existing) = folders.into_iter().find(|f| f.name == name) {
                        warn!(
                            folder = %existing.id,
                            name = %name,
                            error = %create_err,
                            "Folder create failed but the name now exists, reusing it"
                        );
                        return Ok(existing.id);
                    }
                }
                Err(e) => warn!(name = %name, error = %e, "Re-list after failed create also failed"),
            }
            Err(BridgeError::StorageWriteFailed(create_err))
        }
    }
}
