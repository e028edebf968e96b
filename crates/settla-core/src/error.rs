use settla_types::{RejectReason, TypesError};
use thiserror::Error;

/// Errors that can occur in core operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Transaction rejected: {0}")]
    Rejected(#[from] RejectReason),

    #[error("Block not found: {0}")]
    BlockNotFound(u64),

    #[error("Genesis error: {0}")]
    Genesis(#[from] TypesError),
}
