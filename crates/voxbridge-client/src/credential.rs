//! Access credential manager.
//!
//! Credentials are fetched fresh for every operation and never cached:
//! a stale token can only ever fail the single call that carried it, at
//! the cost of one extra ledger round trip per operation.

use tracing::debug;

use voxbridge_ledger::{LedgerError, LedgerService};
use voxbridge_shared::credential::AccessCredential;
use voxbridge_shared::types::Principal;

pub use voxbridge_shared::credential::{classify_token_encoding, TokenEncoding};

use crate::error::BridgeError;

/// Fetch a storage credential scoped to `principal`.
///
/// An empty principal means no wallet session exists; the ledger is not
/// even asked in that case.
pub async fn fetch_access_credential<L: LedgerService>(
    ledger: &L,
    principal: &Principal,
) -> Result<AccessCredential, BridgeError> {
    if principal.is_empty() {
        return Err(BridgeError::CredentialUnavailable(LedgerError::Api(
            "no wallet session".to_string(),
        )));
    }

    let grant = ledger
        .get_access_token(principal)
        .await
        .map_err(BridgeError::CredentialUnavailable)?;

    let credential = AccessCredential::issue(&grant.access_token, grant.folder, principal.clone());
    debug!(
        principal = %principal.short(),
        folder = %credential.folder,
        encoding = ?credential.encoding,
        "Access credential issued"
    );
    Ok(credential)
}

#[cfg(test)]
mod tests {
    use super::*;

    use voxbridge_ledger::mock::MemoryLedger;

    #[tokio::test]
    async fn test_credential_carries_grant_folder() {
        let ledger = MemoryLedger::new();
        ledger.set_grant_folder("voices");

        let cred = fetch_access_credential(&ledger, &Principal::new("abc"))
            .await
            .unwrap();
        assert_eq!(cred.folder, "voices");
        assert_eq!(cred.issued_for, Principal::new("abc"));
        assert!(!cred.token.is_empty());
    }

    #[tokio::test]
    async fn test_empty_principal_is_rejected_locally() {
        let ledger = MemoryLedger::new();
        let err = fetch_access_credential(&ledger, &Principal::new(""))
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::CredentialUnavailable(_)));
    }

    #[tokio::test]
    async fn test_ledger_refusal_maps_to_credential_unavailable() {
        let ledger = MemoryLedger::new();
        ledger.set_fail_token(true);
        let err = fetch_access_credential(&ledger, &Principal::new("abc"))
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::CredentialUnavailable(_)));
    }
}
