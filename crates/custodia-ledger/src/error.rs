//! Error types for ledger operations.

use thiserror::Error;

/// Errors surfaced by a [`crate::LedgerState`] backend.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A read or write against the backing state failed.
    #[error("ledger I/O failure: {reason}")]
    Io {
        /// Description of the failure.
        reason: String,
    },

    /// A selector query could not be executed.
    #[error("query execution failed: {reason}")]
    Query {
        /// Description of the failure.
        reason: String,
    },
}

impl LedgerError {
    /// Creates an I/O error with the given reason.
    pub fn io(reason: impl Into<String>) -> Self {
        Self::Io {
            reason: reason.into(),
        }
    }

    /// Creates a query error with the given reason.
    pub fn query(reason: impl Into<String>) -> Self {
        Self::Query {
            reason: reason.into(),
        }
    }
}
