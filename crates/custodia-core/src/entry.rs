//! Audit entry model.
//!
//! An [`AuditEntry`] is the ledger representation of a single audited
//! operation. Entries are append-only: once written under an id they are
//! never mutated or deleted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// The fixed set of auditable actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditAction {
    /// A resource was created.
    Create,
    /// A resource was updated.
    Update,
    /// A resource was deleted.
    Delete,
    /// A resource was read or searched.
    Query,
    /// A credential or claim was verified.
    Verify,
    /// A credential was revoked.
    Revoke,
    /// A credential was issued.
    Issue,
}

impl AuditAction {
    /// Every valid action, in canonical order.
    pub const ALL: [Self; 7] = [
        Self::Create,
        Self::Update,
        Self::Delete,
        Self::Query,
        Self::Verify,
        Self::Revoke,
        Self::Issue,
    ];

    /// The canonical names of every valid action.
    pub const NAMES: [&'static str; 7] = [
        "CREATE", "UPDATE", "DELETE", "QUERY", "VERIFY", "REVOKE", "ISSUE",
    ];

    /// Returns the canonical name of this action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Query => "QUERY",
            Self::Verify => "VERIFY",
            Self::Revoke => "REVOKE",
            Self::Issue => "ISSUE",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| ValidationError::membership("action", s, &Self::NAMES))
    }
}

/// A single audit log entry as stored on the ledger.
///
/// The `timestamp` and `tx_id` fields are assigned by the ledger's
/// transaction context at append time, never by the caller. This keeps the
/// recorded time deterministic across every replica evaluating the same
/// transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    /// Unique entry identifier (the ledger key).
    pub id: String,

    /// Transaction timestamp, Unix epoch milliseconds.
    pub timestamp: i64,

    /// Who performed the action.
    pub user_id: String,

    /// The user's role at the time of the action.
    pub user_role: String,

    /// What was done.
    pub action: AuditAction,

    /// Type of resource affected (e.g., `CREDENTIAL`).
    pub resource_type: String,

    /// Specific resource identifier.
    pub resource_id: String,

    /// Previous state as an opaque JSON-encoded string.
    pub old_value: String,

    /// New state as an opaque JSON-encoded string.
    pub new_value: String,

    /// Outcome of the operation (e.g., `SUCCESS`, `FAILURE`).
    pub status: String,

    /// Client IP address.
    pub ip_address: String,

    /// Session identifier.
    pub session_id: String,

    /// Additional context as an opaque JSON string.
    pub metadata: String,

    /// Compliance regime the entry falls under (e.g., `GDPR`, `SOC2`).
    pub compliance_tag: String,

    /// Ledger transaction id, assigned at append time.
    pub tx_id: String,
}

/// Caller-supplied fields of a new audit entry.
///
/// Everything except `timestamp` and `tx_id`, which the store stamps from
/// the ledger transaction context. The `action` field is carried as a raw
/// string so the store can validate membership before anything touches the
/// ledger.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuditEntryDraft {
    /// Unique entry identifier.
    pub id: String,
    /// Who performed the action.
    pub user_id: String,
    /// The user's role at the time of the action.
    pub user_role: String,
    /// What was done, as a raw action name.
    pub action: String,
    /// Type of resource affected.
    pub resource_type: String,
    /// Specific resource identifier.
    pub resource_id: String,
    /// Previous state, JSON-encoded.
    pub old_value: String,
    /// New state, JSON-encoded.
    pub new_value: String,
    /// Outcome of the operation.
    pub status: String,
    /// Client IP address.
    pub ip_address: String,
    /// Session identifier.
    pub session_id: String,
    /// Additional context, JSON-encoded.
    pub metadata: String,
    /// Compliance regime the entry falls under.
    pub compliance_tag: String,
}

impl AuditEntryDraft {
    /// Creates a draft with the required fields.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use custodia_core::AuditEntryDraft;
    ///
    /// let draft = AuditEntryDraft::new("audit-001", "user-alice", "CREATE");
    /// assert_eq!(draft.id, "audit-001");
    /// ```
    #[must_use]
    pub fn new(id: impl Into<String>, user_id: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            action: action.into(),
            ..Self::default()
        }
    }

    /// Sets the role the user held when acting.
    #[must_use]
    pub fn with_user_role(mut self, role: impl Into<String>) -> Self {
        self.user_role = role.into();
        self
    }

    /// Sets the affected resource.
    #[must_use]
    pub fn with_resource(
        mut self,
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
    ) -> Self {
        self.resource_type = resource_type.into();
        self.resource_id = resource_id.into();
        self
    }

    /// Sets the before/after values, each an opaque JSON-encoded string.
    #[must_use]
    pub fn with_values(mut self, old_value: impl Into<String>, new_value: impl Into<String>) -> Self {
        self.old_value = old_value.into();
        self.new_value = new_value.into();
        self
    }

    /// Sets the operation outcome.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Sets the client network context.
    #[must_use]
    pub fn with_session(
        mut self,
        ip_address: impl Into<String>,
        session_id: impl Into<String>,
    ) -> Self {
        self.ip_address = ip_address.into();
        self.session_id = session_id.into();
        self
    }

    /// Sets the opaque metadata JSON string.
    #[must_use]
    pub fn with_metadata(mut self, metadata: impl Into<String>) -> Self {
        self.metadata = metadata.into();
        self
    }

    /// Sets the compliance tag.
    #[must_use]
    pub fn with_compliance_tag(mut self, tag: impl Into<String>) -> Self {
        self.compliance_tag = tag.into();
        self
    }

    /// Finalizes the draft into a stored entry using ledger-assigned context.
    ///
    /// The `action` string must already have been validated; this is done by
    /// the audit store before any ledger call.
    #[must_use]
    pub fn into_entry(self, action: AuditAction, timestamp: i64, tx_id: impl Into<String>) -> AuditEntry {
        AuditEntry {
            id: self.id,
            timestamp,
            user_id: self.user_id,
            user_role: self.user_role,
            action,
            resource_type: self.resource_type,
            resource_id: self.resource_id,
            old_value: self.old_value,
            new_value: self.new_value,
            status: self.status,
            ip_address: self.ip_address,
            session_id: self.session_id,
            metadata: self.metadata,
            compliance_tag: self.compliance_tag,
            tx_id: tx_id.into(),
        }
    }
}
