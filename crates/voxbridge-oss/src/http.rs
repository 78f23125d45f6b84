//! HTTP gateway bindings for the bucket service.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use voxbridge_shared::credential::AccessCredential;
use voxbridge_shared::types::{FileId, FolderId};

use crate::bucket::{BucketConnector, BucketService};
use crate::chunks::ChunkRecord;
use crate::error::OssError;
use crate::types::{FileConfig, FileInfo, FolderInfo};

/// One bucket reached over the storage cluster's HTTP gateway.
#[derive(Debug, Clone)]
pub struct HttpBucket {
    http: reqwest::Client,
    base_url: String,
    token: Vec<u8>,
}

#[derive(Debug, Serialize)]
struct CreateFolderBody<'a> {
    name: &'a str,
    parent: FolderId,
}

#[derive(Debug, Serialize)]
struct CreateFileBody<'a> {
    name: &'a str,
    content_type: &'a str,
    parent: FolderId,
    size: u64,
}

#[derive(Debug, Deserialize)]
struct CreatedFile {
    id: FileId,
}

/// Parse a JSON body, mapping non-success statuses to [`OssError::Rejected`].
async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, OssError> {
    let status = resp.status();
    if !status.is_success() {
        let message = resp.text().await.unwrap_or_default();
        return Err(OssError::Rejected {
            status: status.as_u16(),
            message,
        });
    }
    resp.json()
        .await
        .map_err(|e| OssError::InvalidResponse(e.to_string()))
}

async fn expect_success(resp: reqwest::Response) -> Result<(), OssError> {
    let status = resp.status();
    if !status.is_success() {
        let message = resp.text().await.unwrap_or_default();
        return Err(OssError::Rejected {
            status: status.as_u16(),
            message,
        });
    }
    Ok(())
}

impl HttpBucket {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, token: Vec<u8>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            token,
        }
    }

    /// Token bytes travel base64-armored in the authorization header.
    fn auth(&self) -> String {
        format!("Bearer {}", BASE64.encode(&self.token))
    }
}

#[async_trait]
impl BucketService for HttpBucket {
    async fn list_folders(&self, parent: FolderId) -> Result<Vec<FolderInfo>, OssError> {
        let resp = self
            .http
            .get(format!("{}/folders", self.base_url))
            .header("authorization", self.auth())
            .query(&[("parent", parent.0)])
            .send()
            .await?;
        read_json(resp).await
    }

    async fn create_folder(&self, name: &str, parent: FolderId) -> Result<FolderInfo, OssError> {
        let resp = self
            .http
            .post(format!("{}/folders", self.base_url))
            .header("authorization", self.auth())
            .json(&CreateFolderBody { name, parent })
            .send()
            .await?;
        read_json(resp).await
    }

    async fn create_file(&self, config: &FileConfig) -> Result<FileId, OssError> {
        let body = CreateFileBody {
            name: &config.name,
            content_type: &config.content_type,
            parent: config.parent,
            size: config.content.len() as u64,
        };
        let resp = self
            .http
            .post(format!("{}/files", self.base_url))
            .header("authorization", self.auth())
            .json(&body)
            .send()
            .await?;
        let created: CreatedFile = read_json(resp).await?;
        debug!(file = %created.id, name = %config.name, "File registered");
        Ok(created.id)
    }

    async fn put_chunk(&self, file: FileId, index: u32, data: Bytes) -> Result<(), OssError> {
        let resp = self
            .http
            .put(format!("{}/files/{}/chunks/{}", self.base_url, file, index))
            .header("authorization", self.auth())
            .header("content-type", "application/octet-stream")
            .body(data)
            .send()
            .await?;
        expect_success(resp).await
    }

    async fn get_file_info(&self, file: FileId) -> Result<FileInfo, OssError> {
        let resp = self
            .http
            .get(format!("{}/files/{}", self.base_url, file))
            .header("authorization", self.auth())
            .send()
            .await?;
        read_json(resp).await
    }

    async fn delete_file(&self, file: FileId) -> Result<bool, OssError> {
        let resp = self
            .http
            .delete(format!("{}/files/{}", self.base_url, file))
            .header("authorization", self.auth())
            .send()
            .await?;
        read_json(resp).await
    }

    async fn get_file_chunks(
        &self,
        file: FileId,
        offset: u64,
    ) -> Result<Vec<ChunkRecord>, OssError> {
        let resp = self
            .http
            .get(format!("{}/files/{}/chunks", self.base_url, file))
            .header("authorization", self.auth())
            .query(&[("offset", offset)])
            .send()
            .await?;
        read_json(resp).await
    }
}

/// Cluster endpoint advertising the available buckets.
#[derive(Debug, Clone)]
pub struct HttpBucketConnector {
    http: reqwest::Client,
    cluster_url: String,
}

impl HttpBucketConnector {
    pub fn new(http: reqwest::Client, cluster_url: impl Into<String>) -> Self {
        let cluster_url = cluster_url.into().trim_end_matches('/').to_string();
        Self { http, cluster_url }
    }
}

#[async_trait]
impl BucketConnector for HttpBucketConnector {
    type Bucket = HttpBucket;

    async fn connect(&self, credential: &AccessCredential) -> Result<HttpBucket, OssError> {
        let resp = self
            .http
            .get(format!("{}/buckets", self.cluster_url))
            .send()
            .await?;
        let buckets: Vec<String> = read_json(resp).await?;

        match buckets.into_iter().next() {
            Some(first) => {
                debug!(
                    bucket = %first,
                    principal = %credential.issued_for.short(),
                    "Bucket selected"
                );
                Ok(HttpBucket::new(
                    self.http.clone(),
                    first,
                    credential.token.clone(),
                ))
            }
            None => Err(OssError::NoBuckets),
        }
    }
}
