//! # Custodia Store
//!
//! The two record stores at the heart of the Custodia audit platform,
//! layered over any [`custodia_ledger::LedgerState`] backend:
//!
//! - [`AuditStore`] - Append-only log of immutable audit entries with
//!   point lookups, full scans, and attribute-filtered queries
//! - [`IdentityStore`] - Mutable registry of role-scoped users under the
//!   `USER` composite-key namespace
//! - [`AuditStats`] / [`ComplianceReport`] - Read-only reporting over the
//!   audit trail
//!
//! Each operation is a single self-contained unit of work against the
//! ledger; no operation spans both stores, and concurrency control is
//! entirely the ledger collaborator's responsibility.
//!
//! ## Example
//!
//! ```rust
//! use custodia_core::AuditEntryDraft;
//! use custodia_ledger::MemoryLedger;
//! use custodia_store::AuditStore;
//!
//! let ledger = MemoryLedger::new();
//! let store = AuditStore::new(&ledger);
//!
//! store.append(AuditEntryDraft::new("audit-001", "user-alice", "CREATE"))?;
//! assert!(store.exists("audit-001")?);
//! # Ok::<(), custodia_store::StoreError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod audit;
pub mod error;
pub mod identity;
pub mod report;

pub use audit::AuditStore;
pub use error::{Result, StoreError};
pub use identity::IdentityStore;
pub use report::{AuditStats, ComplianceReport};
