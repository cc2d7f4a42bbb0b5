//! Registered user model.
//!
//! A [`User`] is a mutable identity record: created once, updated while
//! active, and deactivated exactly once. The `permissions` field is always
//! the policy output for the current role; it is never set independently.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// The fixed set of user roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Full platform administration.
    Admin,
    /// Read access to the trail plus report generation.
    Auditor,
    /// Read access to the user's own entries only.
    User,
}

impl Role {
    /// Every valid role, in canonical order.
    pub const ALL: [Self; 3] = [Self::Admin, Self::Auditor, Self::User];

    /// The canonical names of every valid role.
    pub const NAMES: [&'static str; 3] = ["ADMIN", "AUDITOR", "USER"];

    /// Returns the canonical name of this role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Auditor => "AUDITOR",
            Self::User => "USER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| ValidationError::membership("role", s, &Self::NAMES))
    }
}

/// A registered platform user as stored on the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier, unique within the user namespace.
    pub id: String,

    /// Login name.
    pub username: String,

    /// Email address.
    pub email: String,

    /// Current role.
    pub role: Role,

    /// Organization the user belongs to.
    pub organization: String,

    /// Granular permissions, always exactly the policy output for `role`.
    pub permissions: Vec<String>,

    /// Whether the account is active. Deactivation is one-way.
    pub active: bool,

    /// Creation timestamp, Unix epoch milliseconds.
    pub created_at: i64,

    /// Last mutation timestamp, Unix epoch milliseconds.
    pub updated_at: i64,

    /// Who registered this user.
    pub created_by: String,
}

/// Caller-supplied fields for registering a new user.
///
/// The `role` field is a raw string so the store can validate membership
/// before anything touches the ledger; `permissions`, `active` and the
/// timestamps are derived at registration time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserRegistration {
    /// Unique user identifier.
    pub id: String,
    /// Login name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Requested role, as a raw role name.
    pub role: String,
    /// Organization the user belongs to.
    pub organization: String,
    /// Who is registering this user.
    pub created_by: String,
}

impl UserRegistration {
    /// Creates a registration with the required fields.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            email: email.into(),
            role: role.into(),
            ..Self::default()
        }
    }

    /// Sets the organization.
    #[must_use]
    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = organization.into();
        self
    }

    /// Sets who is performing the registration.
    #[must_use]
    pub fn with_created_by(mut self, created_by: impl Into<String>) -> Self {
        self.created_by = created_by.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in Role::ALL {
            let parsed: Role = role.as_str().parse().unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_role_rejects_unknown() {
        let err = "ROOT".parse::<Role>().unwrap_err();
        assert!(err.message.contains("ROOT"));
        assert!(err.message.contains("ADMIN, AUDITOR, USER"));
    }

    #[test]
    fn test_role_is_case_sensitive() {
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_user_serializes_camel_case() {
        let user = User {
            id: "user-alice".to_string(),
            username: "alice".to_string(),
            email: "alice@example.org".to_string(),
            role: Role::Admin,
            organization: "org1".to_string(),
            permissions: vec!["audit.read".to_string()],
            active: true,
            created_at: 1_700_000_000_000,
            updated_at: 1_700_000_000_000,
            created_by: "bootstrap".to_string(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains(r#""role":"ADMIN""#));
        assert!(json.contains(r#""createdAt":1700000000000"#));
        assert!(json.contains(r#""createdBy":"bootstrap""#));
    }

    #[test]
    fn test_registration_builder() {
        let reg = UserRegistration::new("user-alice", "alice", "alice@example.org", "ADMIN")
            .with_organization("org1")
            .with_created_by("bootstrap");

        assert_eq!(reg.organization, "org1");
        assert_eq!(reg.created_by, "bootstrap");
    }
}
