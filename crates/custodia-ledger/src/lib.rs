//! # Custodia Ledger
//!
//! The collaborator contract between the Custodia record stores and the
//! shared key/value ledger they run against, plus an in-process reference
//! backend.
//!
//! - [`LedgerState`] - The exact interface the stores consume: keyed
//!   get/put, ordered range scans, declarative selector queries, and the
//!   transaction-scoped id and timestamp
//! - [`Selector`] - Typed builder for the declarative query document
//! - [`composite_key`] - Namespace tagging that keeps entity kinds from
//!   aliasing in the shared key space
//! - [`MemoryLedger`] - In-process backend for tests and embedding
//!
//! The ledger collaborator, not this crate, owns concurrency control:
//! conflicting writes to the same key are serialized and detected at
//! commit time, which is what makes the stores' check-then-write sequences
//! race-free at the system level.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod key;
pub mod memory;
pub mod selector;
pub mod state;

pub use error::LedgerError;
pub use key::{composite_key, USER_KIND};
pub use memory::MemoryLedger;
pub use selector::{Selector, SortDirection};
pub use state::LedgerState;
