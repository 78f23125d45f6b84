//! Voice file deletion.
//!
//! Order is storage first, ledger second: the ledger is only marked
//! after the bucket confirmed the object is gone, so a ledger row never
//! points at content that no longer matters while the object still
//! physically exists.

use tracing::{error, info};

use voxbridge_ledger::LedgerService;
use voxbridge_oss::{BucketConnector, BucketService};
use voxbridge_shared::types::{FileId, Principal};

use crate::credential::fetch_access_credential;
use crate::error::BridgeError;

/// Delete a voice file from storage and mark its ledger record.
///
/// Returns `true` only when both sides agree the file is gone. A ledger
/// mark that fails after a successful storage delete returns `false`
/// with the divergence logged; re-running the operation is safe.
pub async fn voice_delete<L, C>(
    ledger: &L,
    connector: &C,
    file: FileId,
    principal: &Principal,
) -> Result<bool, BridgeError>
where
    L: LedgerService,
    C: BucketConnector,
{
    let credential = fetch_access_credential(ledger, principal).await?;
    let bucket = connector
        .connect(&credential)
        .await
        .map_err(BridgeError::StorageWriteFailed)?;

    let removed = bucket
        .delete_file(file)
        .await
        .map_err(BridgeError::StorageWriteFailed)?;
    if !removed {
        info!(file = %file, "Nothing to delete in storage");
        return Ok(false);
    }

    match ledger.mark_voice_file_deleted(file).await {
        Ok(()) => {
            info!(file = %file, principal = %principal.short(), "Voice file deleted");
            Ok(true)
        }
        Err(e) => {
            // Storage object is gone but the ledger still shows it
            // active. Logged for reconciliation tooling.
            error!(file = %file, error = %e, "Storage delete succeeded but ledger mark failed");
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use bytes::Bytes;

    use voxbridge_ledger::mock::MemoryLedger;
    use voxbridge_oss::mock::MemoryConnector;
    use voxbridge_shared::types::FileStatus;

    use crate::upload::voice_upload;

    async fn uploaded_fixture() -> (MemoryLedger, MemoryConnector, FileId) {
        let ledger = MemoryLedger::new();
        let connector = MemoryConnector::default();
        let file = voice_upload(
            &ledger,
            &connector,
            Bytes::from_static(b"clip"),
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
    async fn test_delete_removes_storage_and_marks_ledger() {
        let (ledger, connector, file) = uploaded_fixture().await;

        let done = voice_delete(&ledger, &connector, file, &Principal::new("abc"))
            .await
            .unwrap();
        assert!(done);
        assert!(connector.bucket().stored_content(file).is_none());
        assert_eq!(
            ledger.record_for(file).unwrap().status,
            FileStatus::Deleted
        );
    }

    #[tokio::test]
    async fn test_unknown_file_deletes_nothing() {
        let (ledger, connector, _) = uploaded_fixture().await;

        let done = voice_delete(&ledger, &connector, FileId(404), &Principal::new("abc"))
            .await
            .unwrap();
        assert!(!done);
    }

    #[tokio::test]
    async fn test_ledger_mark_failure_returns_false_not_error() {
        let (ledger, connector, file) = uploaded_fixture().await;
        ledger.set_fail_mark(true);

        let done = voice_delete(&ledger, &connector, file, &Principal::new("abc"))
            .await
            .unwrap();
        assert!(!done);
        // Divergence: storage object gone, ledger row still active.
        assert!(connector.bucket().stored_content(file).is_none());
        assert_eq!(ledger.record_for(file).unwrap().status, FileStatus::Active);
    }

    #[tokio::test]
    async fn test_credential_failure_aborts_before_delete() {
        let (ledger, connector, file) = uploaded_fixture().await;
        ledger.set_fail_token(true);

        let err = voice_delete(&ledger, &connector, file, &Principal::new("abc"))
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::CredentialUnavailable(_)));
        assert!(connector.bucket().stored_content(file).is_some());
    }
}
