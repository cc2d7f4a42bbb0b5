//! # Custodia Core
//!
//! Domain types for the Custodia audit-trail and identity platform.
//!
//! This crate provides the data model shared by every Custodia store:
//!
//! - [`AuditEntry`] - Immutable audit record as stored on the ledger
//! - [`AuditEntryDraft`] - Caller-supplied fields of a new audit record
//! - [`AuditAction`] - The fixed set of auditable actions
//! - [`User`] / [`Role`] - Registered identities and their roles
//! - [`policy`] - Role-to-permission mapping
//! - [`validation`] - Shared input validation helpers
//!
//! ## Example
//!
//! ```rust
//! use custodia_core::{AuditEntryDraft, Role};
//! use custodia_core::policy::default_permissions;
//!
//! let draft = AuditEntryDraft::new("audit-001", "user-alice", "CREATE")
//!     .with_resource("CREDENTIAL", "cred-001")
//!     .with_status("SUCCESS");
//!
//! assert_eq!(draft.action, "CREATE");
//! assert_eq!(default_permissions(Role::Auditor.as_str()).len(), 2);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod entry;
pub mod policy;
pub mod user;
pub mod validation;


pub use entry::{AuditAction, AuditEntry, AuditEntryDraft};
pub use user::{Role, User, UserRegistration};
pub use validation::{ValidationError, ValidationErrorKind, MAX_ID_LEN};
