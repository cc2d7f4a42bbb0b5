//! Role-scoped user registry.

use custodia_core::validation::{check_id_length, require_non_empty};
use custodia_core::{Role, User, UserRegistration};
use custodia_ledger::{composite_key, LedgerState, USER_KIND};
use tracing::{debug, info, warn};

use crate::error::{Result, StoreError};

/// Mutable registry of [`User`] records.
///
/// Users live under the `USER` composite-key namespace so their ids can
/// never alias an audit entry stored in the same key space. The record is
/// created once, may change role while active, and is deactivated at most
/// once; no reactivation operation exists.
#[derive(Debug)]
pub struct IdentityStore<'a, L> {
    ledger: &'a L,
}

impl<'a, L: LedgerState> IdentityStore<'a, L> {
    /// Creates a store over the given ledger state.
    #[must_use]
    pub const fn new(ledger: &'a L) -> Self {
        Self { ledger }
    }

    /// Registers a new user.
    ///
    /// Permissions are derived from the role by the permission policy;
    /// the account starts active with `created_at` set from the ledger's
    /// transaction clock. Performs exactly one ledger write, on the
    /// success path only.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Validation`] for a missing id, username, email or
    ///   role, an unknown role, or an over-long id
    /// - [`StoreError::Conflict`] if the user id is already registered
    /// - [`StoreError::Ledger`] if the existence check or write fails
    pub fn register(&self, registration: UserRegistration) -> Result<()> {
        debug!(id = %registration.id, role = %registration.role, org = %registration.organization, "registering user");

        require_non_empty("id", &registration.id)?;
        require_non_empty("username", &registration.username)?;
        require_non_empty("email", &registration.email)?;
        require_non_empty("role", &registration.role)?;
        let role: Role = registration.role.parse()?;
        check_id_length("id", &registration.id)?;

        let key = composite_key(USER_KIND, &registration.id);
        if self.ledger.get(&key)?.is_some() {
            warn!(id = %registration.id, "rejected duplicate registration");
            return Err(StoreError::Conflict { key });
        }

        let now = self.ledger.tx_time_millis();
        let user = User {
            id: registration.id,
            username: registration.username,
            email: registration.email,
            role,
            organization: registration.organization,
            permissions: role.permissions(),
            active: true,
            created_at: now,
            updated_at: now,
            created_by: registration.created_by,
        };

        let bytes = serde_json::to_vec(&user)?;
        self.ledger.put(&key, &bytes)?;

        info!(id = %user.id, role = %user.role, "user registered");
        Ok(())
    }

    /// Retrieves a user by id.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Validation`] if `id` is empty
    /// - [`StoreError::NotFound`] if no user is registered under `id`
    /// - [`StoreError::Corruption`] if the stored bytes fail to decode
    pub fn get(&self, id: &str) -> Result<User> {
        require_non_empty("id", id)?;

        let key = composite_key(USER_KIND, id);
        let bytes = self
            .ledger
            .get(&key)?
            .ok_or(StoreError::NotFound { key: key.clone() })?;

        serde_json::from_slice(&bytes).map_err(|source| StoreError::Corruption { key, source })
    }

    /// Changes a user's role and recomputes their permissions.
    ///
    /// Role transitions are only defined while the account is active, and
    /// a transition to the current role is rejected rather than silently
    /// accepted.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Validation`] if `new_role` is empty or unknown
    /// - [`StoreError::NotFound`] if the user does not exist
    /// - [`StoreError::InvalidState`] if the user is deactivated
    /// - [`StoreError::NoOp`] if `new_role` equals the current role
    /// - [`StoreError::Corruption`] / [`StoreError::Ledger`] as for any read
    pub fn update_role(&self, id: &str, new_role: &str) -> Result<()> {
        debug!(id = %id, new_role = %new_role, "updating user role");

        require_non_empty("role", new_role)?;
        let role: Role = new_role.parse()?;

        let mut user = self.get(id)?;
        if !user.active {
            return Err(StoreError::InvalidState {
                id: id.to_string(),
                reason: "user is deactivated".to_string(),
            });
        }
        if user.role == role {
            return Err(StoreError::NoOp {
                id: id.to_string(),
                reason: format!("role is already {role}"),
            });
        }

        let previous = user.role;
        user.role = role;
        user.permissions = role.permissions();
        user.updated_at = self.ledger.tx_time_millis();

        let key = composite_key(USER_KIND, id);
        let bytes = serde_json::to_vec(&user)?;
        self.ledger.put(&key, &bytes)?;

        info!(id = %id, from = %previous, to = %role, "user role updated");
        Ok(())
    }

    /// Deactivates a user. One-way: no reactivation operation exists, and
    /// deactivating an already-inactive user is rejected.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Validation`] if `id` is empty
    /// - [`StoreError::NotFound`] if the user does not exist
    /// - [`StoreError::InvalidState`] if the user is already deactivated
    /// - [`StoreError::Corruption`] / [`StoreError::Ledger`] as for any read
    pub fn deactivate(&self, id: &str) -> Result<()> {
        debug!(id = %id, "deactivating user");

        let mut user = self.get(id)?;
        if !user.active {
            return Err(StoreError::InvalidState {
                id: id.to_string(),
                reason: "user is already deactivated".to_string(),
            });
        }

        user.active = false;
        user.updated_at = self.ledger.tx_time_millis();

        let key = composite_key(USER_KIND, id);
        let bytes = serde_json::to_vec(&user)?;
        self.ledger.put(&key, &bytes)?;

        info!(id = %id, "user deactivated");
        Ok(())
    }

    /// Returns whether a user is registered under the given id.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Validation`] if `id` is empty
    /// - [`StoreError::Ledger`] if the read fails
    pub fn exists(&self, id: &str) -> Result<bool> {
        require_non_empty("id", id)?;
        let key = composite_key(USER_KIND, id);
        Ok(self.ledger.get(&key)?.is_some())
    }
}
