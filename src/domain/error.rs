//! Store-level errors

use thiserror::Error;

use super::todo::TodoId;
use crate::gateway::GatewayError;

/// Common result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced to the presentation layer.
///
/// `Clone` so a failure can be recorded in the store's status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A required field is empty; nothing was sent to the gateway
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// Toggle target is not in the store
    #[error("todo not found: {0}")]
    NotFound(TodoId),

    /// Fetch, mutation or subscription failure reported by the gateway
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl StoreError {
    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::Validation { .. })
    }
}
