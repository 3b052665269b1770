//! Shared error and result types
//!
//! Every fallible operation in the crate returns [`Result`]. Errors are
//! propagated to the caller as-is; nothing is retried here (retry policy,
//! if any, belongs to the transport layer).

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, SignpostError>;

/// Application error taxonomy
#[derive(Debug, Error)]
pub enum SignpostError {
    /// No record matches the given id
    #[error("not found: {0}")]
    NotFound(String),

    /// Out-of-range or unparsable caller input (pagination, radius, ids);
    /// rejected before any storage call
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A filter references a state name or code the catalog cannot resolve
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// A stored record carries a state code the catalog does not know;
    /// surfaces at read-time address expansion, never at ingestion
    #[error("unknown state: {0}")]
    UnknownState(String),

    /// Ingestion attempted against a non-empty collection
    #[error("precondition failed: {0}")]
    PreconditionFailed(String),

    /// The CSV feed contains a row that cannot be parsed; fails the whole
    /// batch since validation happens before any write
    #[error("malformed source data: {0}")]
    MalformedSourceData(String),

    /// Storage engine failure
    #[error("database error: {0}")]
    Database(String),

    /// Feed fetch failure (network, non-success status, bad encoding)
    #[error("feed error: {0}")]
    Feed(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<mongodb::error::Error> for SignpostError {
    fn from(err: mongodb::error::Error) -> Self {
        SignpostError::Database(err.to_string())
    }
}
