//! # voxbridge-oss
//!
//! Client layer for the chunked object-storage service: the bucket service
//! traits, the chunk-shape normalization chain, the upload driver and the
//! HTTP gateway bindings.
//!
//! Storage calls are plain request/response operations. Nothing here
//! retries; a failure surfaces to the caller, who re-runs the whole
//! operation if they want another attempt.

pub mod bucket;
pub mod chunks;
pub mod http;
#[cfg(feature = "mock-data")]
pub mod mock;
pub mod types;
pub mod upload;

mod error;

pub use bucket::{BucketConnector, BucketService};
pub use chunks::{reassemble, ChunkRecord};
pub use error::OssError;
pub use http::{HttpBucket, HttpBucketConnector};
pub use types::{FileConfig, FileInfo, FolderInfo, ProgressFn, UploadProgress};
pub use upload::Uploader;
