use thiserror::Error;

/// Errors produced by the storage bucket layer.
#[derive(Debug, Error)]
pub enum OssError {
    /// Transport-level failure reaching the storage service.
    #[error("Storage transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The storage service answered with a non-success status.
    #[error("Storage service rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The storage service answered 2xx but the body was not the expected
    /// shape.
    #[error("Unexpected storage response: {0}")]
    InvalidResponse(String),

    /// The cluster advertised no bucket to serve the request.
    #[error("No storage buckets available")]
    NoBuckets,
}
