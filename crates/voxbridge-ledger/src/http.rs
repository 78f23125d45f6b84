//! HTTP bindings for the ledger service.
//!
//! Every endpoint answers with the ledger's `{"Ok": ...}` / `{"Err": "..."}`
//! envelope. Transport failures, non-success statuses and envelope errors
//! map onto separate [`LedgerError`] variants.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use voxbridge_shared::metadata::VoiceMetadata;
use voxbridge_shared::types::{FileId, FolderId, Principal, VoiceFileInfo, VoiceRecord};

use crate::error::LedgerError;
use crate::service::{AccessGrant, LedgerService, RecordId};

/// Result envelope the ledger wraps every response in.
#[derive(Debug, Deserialize)]
enum ApiResult<T> {
    Ok(T),
    Err(String),
}

impl<T> ApiResult<T> {
    fn into_result(self) -> Result<T, LedgerError> {
        match self {
            Self::Ok(value) => Ok(value),
            Self::Err(message) => Err(LedgerError::Api(message)),
        }
    }
}

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    principal: &'a Principal,
}

#[derive(Debug, Serialize)]
struct RecordRequest<'a> {
    principal: &'a Principal,
    folder_id: FolderId,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<&'a VoiceMetadata>,
}

/// Ledger reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpLedger {
    http: reqwest::Client,
    base_url: String,
}

impl HttpLedger {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    async fn read_envelope<T: DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<T, LedgerError> {
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(LedgerError::Api(format!(
                "HTTP {}: {}",
                status.as_u16(),
                message
            )));
        }
        let envelope: ApiResult<T> = resp
            .json()
            .await
            .map_err(|e| LedgerError::InvalidResponse(e.to_string()))?;
        envelope.into_result()
    }
}

#[async_trait]
impl LedgerService for HttpLedger {
    async fn get_access_token(&self, principal: &Principal) -> Result<AccessGrant, LedgerError> {
        let resp = self
            .http
            .post(format!("{}/access-token", self.base_url))
            .json(&TokenRequest { principal })
            .send()
            .await?;
        let grant: AccessGrant = Self::read_envelope(resp).await?;
        debug!(principal = %principal.short(), folder = %grant.folder, "Access token issued");
        Ok(grant)
    }

    async fn record_voice_file(
        &self,
        principal: &Principal,
        folder: FolderId,
        file: FileId,
        metadata: Option<VoiceMetadata>,
    ) -> Result<RecordId, LedgerError> {
        let body = RecordRequest {
            principal,
            folder_id: folder,
            metadata: metadata.as_ref(),
        };
        // PUT keyed on the storage-assigned id makes the record an upsert.
        let resp = self
            .http
            .put(format!("{}/voice-files/{}", self.base_url, file))
            .json(&body)
            .send()
            .await?;
        Self::read_envelope(resp).await
    }

    async fn mark_voice_file_deleted(&self, file: FileId) -> Result<(), LedgerError> {
        let resp = self
            .http
            .post(format!("{}/voice-files/{}/deleted", self.base_url, file))
            .send()
            .await?;
        Self::read_envelope(resp).await
    }

    async fn list_voice_files(
        &self,
        principal: Option<&Principal>,
        folder: Option<FolderId>,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<VoiceFileInfo>, LedgerError> {
        let mut query: Vec<(&str, String)> = vec![
            ("page", page.to_string()),
            ("page_size", page_size.to_string()),
        ];
        if let Some(principal) = principal {
            query.push(("principal", principal.as_str().to_string()));
        }
        if let Some(folder) = folder {
            query.push(("folder", folder.0.to_string()));
        }
        let resp = self
            .http
            .get(format!("{}/voice-files", self.base_url))
            .query(&query)
            .send()
            .await?;
        Self::read_envelope(resp).await
    }

    async fn get_voice_file(&self, file: FileId) -> Result<Option<VoiceRecord>, LedgerError> {
        let resp = self
            .http
            .get(format!("{}/voice-files/{}", self.base_url, file))
            .send()
            .await?;
        Self::read_envelope(resp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_ok() {
        let parsed: ApiResult<AccessGrant> =
            serde_json::from_str(r#"{"Ok":{"access_token":"deadbeef","folder":"voices"}}"#)
                .unwrap();
        let grant = parsed.into_result().unwrap();
        assert_eq!(grant.folder, "voices");
    }

    #[test]
    fn test_envelope_err() {
        let parsed: ApiResult<RecordId> =
            serde_json::from_str(r#"{"Err":"no permission"}"#).unwrap();
        match parsed.into_result() {
            Err(LedgerError::Api(message)) => assert_eq!(message, "no permission"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_envelope_unit() {
        let parsed: ApiResult<()> = serde_json::from_str(r#"{"Ok":null}"#).unwrap();
        assert!(parsed.into_result().is_ok());
    }

    #[test]
    fn test_envelope_record_list() {
        let parsed: ApiResult<Vec<VoiceFileInfo>> = serde_json::from_str(
            r#"{"Ok":[{"file_id":7,"status":0,"created_at":1700000000000000000,"updated_at":null,"metadata":[]}]}"#,
        )
        .unwrap();
        let items = parsed.into_result().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].file_id, FileId(7));
    }
}
