//! Role-to-permission mapping.
//!
//! The policy is a pure function: no state, no side effects. Every write
//! path that stores a [`crate::User`] derives `permissions` from here and
//! only from here.

use crate::user::Role;

/// Returns the default permission set for a role name.
///
/// Unknown role names map to the empty set. Every write path validates the
/// role against [`Role::NAMES`] first, so the empty branch is a defensive
/// default rather than a supported state.
///
/// # Examples
///
/// ```rust
/// use custodia_core::policy::default_permissions;
///
/// let perms = default_permissions("AUDITOR");
/// assert_eq!(perms, vec!["audit.read", "report.generate"]);
/// assert!(default_permissions("UNKNOWN").is_empty());
/// ```
#[must_use]
pub fn default_permissions(role: &str) -> Vec<String> {
    let perms: &[&str] = match role {
        "ADMIN" => &["audit.read", "audit.write", "user.manage", "report.generate"],
        "AUDITOR" => &["audit.read", "report.generate"],
        "USER" => &["audit.read.own"],
        _ => &[],
    };
    perms.iter().map(ToString::to_string).collect()
}

impl Role {
    /// Returns the default permission set for this role.
    #[must_use]
    pub fn permissions(self) -> Vec<String> {
        default_permissions(self.as_str())
    }
}
