use thiserror::Error;

/// Errors produced by the ledger layer.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Transport-level failure reaching the ledger.
    #[error("Ledger transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The ledger processed the call and answered with its error envelope.
    #[error("Ledger refused the call: {0}")]
    Api(String),

    /// Response body was not the expected shape.
    #[error("Unexpected ledger response: {0}")]
    InvalidResponse(String),
}
