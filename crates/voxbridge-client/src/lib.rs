//! # voxbridge-client
//!
//! The voice-asset storage bridge facade: upload, download, delete and
//! listing pipelines over the two remote collaborators (backend ledger
//! and object-storage bucket cluster).
//!
//! Every operation takes the caller's principal explicitly; the bridge
//! holds no session state and no credential cache. All durable state
//! lives in the ledger and the bucket.

pub mod config;
pub mod credential;
pub mod delete;
pub mod download;
pub mod error;
pub mod listing;
pub mod upload;

use bytes::Bytes;
use tracing_subscriber::{fmt, EnvFilter};

use voxbridge_ledger::{HttpLedger, LedgerService};
use voxbridge_oss::{BucketConnector, HttpBucketConnector, ProgressFn};
use voxbridge_shared::metadata::VoiceMetadata;
use voxbridge_shared::types::{FileId, Principal, VoiceRecord};

pub use config::BridgeConfig;
pub use credential::{classify_token_encoding, fetch_access_credential, TokenEncoding};
pub use error::BridgeError;
pub use listing::{UiVoiceItem, VoicePage, VoicePager};

/// Install a tracing subscriber with an env-driven filter.
///
/// `RUST_LOG` overrides the default, which keeps the workspace crates at
/// a useful level and everything else quiet.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(
            "voxbridge_client=debug,voxbridge_oss=debug,voxbridge_ledger=info,voxbridge_media=info,warn",
        )
    });

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// The bridge: one ledger, one bucket connector, no other state.
#[derive(Debug, Clone)]
pub struct VoiceBridge<L, C> {
    ledger: L,
    connector: C,
}

impl VoiceBridge<HttpLedger, HttpBucketConnector> {
    /// Bridge over HTTP collaborators per the given configuration.
    pub fn over_http(config: &BridgeConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self::new(
            HttpLedger::new(http.clone(), &config.ledger_url),
            HttpBucketConnector::new(http, &config.cluster_url),
        ))
    }
}

impl<L, C> VoiceBridge<L, C>
where
    L: LedgerService,
    C: BucketConnector,
{
    pub fn new(ledger: L, connector: C) -> Self {
        Self { ledger, connector }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Upload a recorded payload; returns the storage-assigned file id.
    pub async fn voice_upload(
        &self,
        payload: Bytes,
        folder_path: &str,
        principal: &Principal,
        metadata: Option<VoiceMetadata>,
    ) -> Result<FileId, BridgeError> {
        upload::voice_upload(
            &self.ledger,
            &self.connector,
            payload,
            folder_path,
            principal,
            metadata,
            None,
        )
        .await
    }

    /// As [`voice_upload`](Self::voice_upload), reporting progress after
    /// every stored chunk.
    pub async fn voice_upload_with_progress(
        &self,
        payload: Bytes,
        folder_path: &str,
        principal: &Principal,
        metadata: Option<VoiceMetadata>,
        on_progress: &ProgressFn<'_>,
    ) -> Result<FileId, BridgeError> {
        upload::voice_upload(
            &self.ledger,
            &self.connector,
            payload,
            folder_path,
            principal,
            metadata,
            Some(on_progress),
        )
        .await
    }

    /// Delete from storage and mark the ledger record.
    pub async fn voice_delete(
        &self,
        file: FileId,
        principal: &Principal,
    ) -> Result<bool, BridgeError> {
        delete::voice_delete(&self.ledger, &self.connector, file, principal).await
    }

    /// Reconstructed audio bytes, always playable.
    pub async fn fetch_voice_content(
        &self,
        file: FileId,
        principal: &Principal,
    ) -> Result<Bytes, BridgeError> {
        download::fetch_voice_content(&self.ledger, &self.connector, file, principal).await
    }

    /// Ledger record for one file, regardless of status.
    pub async fn fetch_voice_info(
        &self,
        file: FileId,
    ) -> Result<Option<VoiceRecord>, BridgeError> {
        download::fetch_voice_info(&self.ledger, file).await
    }

    /// One page of the user's voice files with audio inlined.
    pub async fn query_voice_page(
        &self,
        principal: &Principal,
        page: u32,
        page_size: u32,
    ) -> Result<VoicePage, BridgeError> {
        listing::query_voice_page(&self.ledger, &self.connector, principal, page, page_size).await
    }

    /// A pager accumulating [`query_voice_page`](Self::query_voice_page)
    /// results across scroll loads.
    pub fn pager(&self, page_size: u32) -> VoicePager {
        VoicePager::new(page_size)
    }
}
