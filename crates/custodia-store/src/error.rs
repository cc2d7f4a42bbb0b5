//! Error taxonomy for store operations.
//!
//! Every error is surfaced to the caller immediately; the stores never
//! retry, and every failing path returns before any ledger write.

use custodia_core::ValidationError;
use custodia_ledger::LedgerError;
use thiserror::Error;

/// Result type alias using [`StoreError`] as the error type.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Malformed or out-of-range input; nothing reached the ledger.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A record already exists where a unique one was to be written.
    #[error("record already exists at key '{key}'")]
    Conflict {
        /// The occupied ledger key.
        key: String,
    },

    /// No record exists at the requested key.
    #[error("record not found at key '{key}'")]
    NotFound {
        /// The ledger key that was looked up.
        key: String,
    },

    /// The operation is not valid for the entity's current state.
    #[error("operation not permitted for '{id}': {reason}")]
    InvalidState {
        /// Identifier of the affected entity.
        id: String,
        /// Why the state forbids the operation.
        reason: String,
    },

    /// The requested change would not change anything; rejected rather
    /// than silently accepted.
    #[error("no-op change rejected for '{id}': {reason}")]
    NoOp {
        /// Identifier of the affected entity.
        id: String,
        /// Why the change is a no-op.
        reason: String,
    },

    /// Stored bytes failed to decode as the expected record type.
    #[error("stored record at key '{key}' is corrupt: {source}")]
    Corruption {
        /// The ledger key holding the undecodable value.
        key: String,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// A record could not be encoded for storage.
    #[error("failed to encode record: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The ledger collaborator reported a failure.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
