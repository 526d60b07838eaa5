//! Store Errors

use thiserror::Error;

/// Common result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by local store operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The id is not present in the local collection (stale id or never fetched)
    #[error("unknown item: {0}")]
    UnknownItem(String),
}
