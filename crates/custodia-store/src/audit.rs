//! Append-only audit entry store.

use custodia_core::entry::AuditAction;
use custodia_core::validation::{check_id_length, require_non_empty, ValidationError};
use custodia_core::{AuditEntry, AuditEntryDraft};
use custodia_ledger::{LedgerState, Selector, USER_KIND};
use tracing::{debug, info, warn};

use crate::error::{Result, StoreError};

/// Append-only log of [`AuditEntry`] records, keyed directly by entry id.
///
/// Entries are written exactly once and never mutated or deleted; a second
/// append under an existing id fails with [`StoreError::Conflict`]. The
/// existence-check-then-write sequence is not atomic inside the store;
/// correctness depends on the ledger collaborator detecting write-write
/// conflicts at commit, per the [`LedgerState`] contract.
#[derive(Debug)]
pub struct AuditStore<'a, L> {
    ledger: &'a L,
}

impl<'a, L: LedgerState> AuditStore<'a, L> {
    /// Creates a store over the given ledger state.
    #[must_use]
    pub const fn new(ledger: &'a L) -> Self {
        Self { ledger }
    }

    /// Returns the underlying ledger state.
    pub(crate) const fn ledger(&self) -> &L {
        self.ledger
    }

    /// Appends a new audit entry.
    ///
    /// The entry's `timestamp` and `tx_id` come from the ledger's
    /// transaction context, never from the caller; performs exactly one
    /// ledger write, on the success path only.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Validation`] for a missing id, missing user id,
    ///   missing or unknown action, or over-long id
    /// - [`StoreError::Conflict`] if the id is already taken
    /// - [`StoreError::Ledger`] if the existence check or write fails
    pub fn append(&self, draft: AuditEntryDraft) -> Result<()> {
        debug!(id = %draft.id, user_id = %draft.user_id, action = %draft.action, "appending audit entry");

        require_non_empty("id", &draft.id)?;
        require_non_empty("userId", &draft.user_id)?;
        require_non_empty("action", &draft.action)?;
        let action: AuditAction = draft.action.parse()?;
        check_id_length("id", &draft.id)?;

        if self.exists(&draft.id)? {
            warn!(id = %draft.id, "rejected append to existing entry");
            return Err(StoreError::Conflict {
                key: draft.id,
            });
        }

        let timestamp = self.ledger.tx_time_millis();
        let tx_id = self.ledger.tx_id();
        let entry = draft.into_entry(action, timestamp, tx_id);

        let bytes = serde_json::to_vec(&entry)?;
        self.ledger.put(&entry.id, &bytes)?;

        info!(id = %entry.id, tx_id = %entry.tx_id, user_id = %entry.user_id, action = %entry.action, "audit entry appended");
        Ok(())
    }

    /// Returns whether an entry exists under the given id.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Validation`] if `id` is empty
    /// - [`StoreError::Ledger`] if the read fails
    pub fn exists(&self, id: &str) -> Result<bool> {
        require_non_empty("id", id)?;
        Ok(self.ledger.get(id)?.is_some())
    }

    /// Retrieves an entry by id.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Validation`] if `id` is empty
    /// - [`StoreError::NotFound`] if no entry exists under `id`
    /// - [`StoreError::Corruption`] if the stored bytes fail to decode
    pub fn get(&self, id: &str) -> Result<AuditEntry> {
        require_non_empty("id", id)?;

        let bytes = self.ledger.get(id)?.ok_or_else(|| StoreError::NotFound {
            key: id.to_string(),
        })?;

        decode_entry(id, &bytes)
    }

    /// Returns every audit entry on the ledger, in scan order.
    ///
    /// Scans the full key space and skips records living under other entity
    /// namespaces; no ordering is guaranteed beyond the ledger's own key
    /// order. Each call re-scans from scratch.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Ledger`] if the scan fails
    /// - [`StoreError::Corruption`] if an audit-keyed value fails to decode
    pub fn scan_all(&self) -> Result<Vec<AuditEntry>> {
        debug!("scanning all audit entries");

        let user_prefix = format!("{USER_KIND}~");
        let mut entries = Vec::new();
        for (key, bytes) in self.ledger.scan_range("", "")? {
            if key.starts_with(&user_prefix) {
                continue;
            }
            entries.push(decode_entry(&key, &bytes)?);
        }

        debug!(count = entries.len(), "scan complete");
        Ok(entries)
    }

    /// Returns all entries recorded for a user, newest first.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Validation`] if `user_id` is empty
    /// - [`StoreError::Ledger`] / [`StoreError::Corruption`] as for any query
    pub fn query_by_user(&self, user_id: &str) -> Result<Vec<AuditEntry>> {
        require_non_empty("userId", user_id)?;

        let selector = Selector::new()
            .field_eq("userId", user_id)
            .sort_desc("timestamp");
        self.run_query(&selector)
    }

    /// Returns all entries whose timestamp falls in `[start_ms, end_ms]`,
    /// newest first.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Validation`] if either bound is negative or the
    ///   range is reversed
    /// - [`StoreError::Ledger`] / [`StoreError::Corruption`] as for any query
    pub fn query_by_date_range(&self, start_ms: i64, end_ms: i64) -> Result<Vec<AuditEntry>> {
        if start_ms < 0 || end_ms < 0 {
            return Err(ValidationError::range(
                "startMs",
                "timestamps must not be negative",
            )
            .into());
        }
        if start_ms > end_ms {
            return Err(ValidationError::range(
                "startMs",
                "start of range must not be after its end",
            )
            .into());
        }

        let selector = Selector::new()
            .field_between("timestamp", start_ms, end_ms)
            .sort_desc("timestamp");
        self.run_query(&selector)
    }

    /// Returns all entries recording a given action, newest first.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Validation`] if `action` is empty or not a member
    ///   of the valid action set
    /// - [`StoreError::Ledger`] / [`StoreError::Corruption`] as for any query
    pub fn query_by_action(&self, action: &str) -> Result<Vec<AuditEntry>> {
        require_non_empty("action", action)?;
        let action: AuditAction = action.parse()?;

        let selector = Selector::new()
            .field_eq("action", action.as_str())
            .sort_desc("timestamp");
        self.run_query(&selector)
    }

    /// Seeds two representative entries for development and demos.
    ///
    /// # Errors
    ///
    /// Fails like [`append`](Self::append); in particular with
    /// [`StoreError::Conflict`] if the sample ids are already taken.
    pub fn seed_sample_entries(&self) -> Result<()> {
        self.append(
            AuditEntryDraft::new("audit-001", "user-alice", "CREATE")
                .with_user_role("ADMIN")
                .with_resource("CREDENTIAL", "cred-001")
                .with_values("", r#"{"type":"DIPLOMA","status":"ACTIVE"}"#)
                .with_status("SUCCESS")
                .with_session("192.168.1.100", "sess-001")
                .with_metadata(r#"{"source":"web-portal"}"#)
                .with_compliance_tag("SOC2"),
        )?;
        self.append(
            AuditEntryDraft::new("audit-002", "user-bob", "QUERY")
                .with_user_role("AUDITOR")
                .with_resource("CREDENTIAL", "cred-001")
                .with_status("SUCCESS")
                .with_session("192.168.1.101", "sess-002")
                .with_metadata(r#"{"source":"api"}"#)
                .with_compliance_tag("GDPR"),
        )
    }

    /// Executes a selector query and decodes every result.
    ///
    /// All filtered queries funnel through here so they share one decode
    /// and error-handling path.
    fn run_query(&self, selector: &Selector) -> Result<Vec<AuditEntry>> {
        debug!(?selector, "running audit query");

        let results = self.ledger.query(selector)?;
        let entries = results
            .iter()
            .map(|(key, bytes)| decode_entry(key, bytes))
            .collect::<Result<Vec<_>>>()?;

        debug!(count = entries.len(), "query complete");
        Ok(entries)
    }
}

fn decode_entry(key: &str, bytes: &[u8]) -> Result<AuditEntry> {
    serde_json::from_slice(bytes).map_err(|source| StoreError::Corruption {
        key: key.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use custodia_core::ValidationErrorKind;
    use custodia_ledger::MemoryLedger;

    fn draft(id: &str, user_id: &str, action: &str) -> AuditEntryDraft {
        AuditEntryDraft::new(id, user_id, action)
            .with_user_role("ADMIN")
            .with_resource("CREDENTIAL", "cred-001")
            .with_status("SUCCESS")
    }

    #[test]
    fn test_append_then_get() {
        let ledger = MemoryLedger::with_tx("tx-1", 1_000);
        let store = AuditStore::new(&ledger);

        store.append(draft("audit-001", "user-alice", "CREATE")).unwrap();

        let entry = store.get("audit-001").unwrap();
        assert_eq!(entry.user_id, "user-alice");
        assert_eq!(entry.action, AuditAction::Create);
        assert_eq!(entry.timestamp, 1_000);
        assert_eq!(entry.tx_id, "tx-1");
    }

    #[test]
    fn test_append_rejects_duplicate_id() {
        let ledger = MemoryLedger::new();
        let store = AuditStore::new(&ledger);

        store.append(draft("audit-001", "user-alice", "CREATE")).unwrap();
        let err = store
            .append(draft("audit-001", "user-bob", "DELETE"))
            .unwrap_err();

        assert!(matches!(err, StoreError::Conflict { key } if key == "audit-001"));
    }

    #[test]
    fn test_append_validation_order() {
        let ledger = MemoryLedger::new();
        let store = AuditStore::new(&ledger);

        // Empty id reported before the empty user id.
        let err = store.append(AuditEntryDraft::new("", "", "")).unwrap_err();
        let StoreError::Validation(v) = err else {
            panic!("expected validation error")
        };
        assert_eq!(v.field, "id");

        // Unknown action reported before the over-long id.
        let long_id = "a".repeat(65);
        let err = store
            .append(AuditEntryDraft::new(long_id.clone(), "user-alice", "GRANT"))
            .unwrap_err();
        let StoreError::Validation(v) = err else {
            panic!("expected validation error")
        };
        assert_eq!(v.kind, ValidationErrorKind::Membership);

        // With a valid action, the length check fires.
        let err = store
            .append(AuditEntryDraft::new(long_id, "user-alice", "CREATE"))
            .unwrap_err();
        let StoreError::Validation(v) = err else {
            panic!("expected validation error")
        };
        assert_eq!(v.kind, ValidationErrorKind::Length);
    }

    #[test]
    fn test_failed_append_writes_nothing() {
        let ledger = MemoryLedger::new();
        let store = AuditStore::new(&ledger);

        let _ = store.append(draft("audit-001", "user-alice", "GRANT"));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_exists() {
        let ledger = MemoryLedger::new();
        let store = AuditStore::new(&ledger);

        store.append(draft("audit-001", "user-alice", "CREATE")).unwrap();
        assert!(store.exists("audit-001").unwrap());
        assert!(!store.exists("audit-999").unwrap());
        assert!(matches!(
            store.exists("").unwrap_err(),
            StoreError::Validation(_)
        ));
    }

    #[test]
    fn test_get_missing_entry() {
        let ledger = MemoryLedger::new();
        let store = AuditStore::new(&ledger);

        let err = store.get("audit-404").unwrap_err();
        assert!(matches!(err, StoreError::NotFound { key } if key == "audit-404"));
    }

    #[test]
    fn test_get_corrupt_entry() {
        let ledger = MemoryLedger::new();
        ledger.put("audit-bad", b"not json").unwrap();

        let store = AuditStore::new(&ledger);
        let err = store.get("audit-bad").unwrap_err();
        assert!(matches!(err, StoreError::Corruption { key, .. } if key == "audit-bad"));
    }

    #[test]
    fn test_scan_all_skips_user_records() {
        let ledger = MemoryLedger::new();
        let store = AuditStore::new(&ledger);

        store.append(draft("audit-001", "user-alice", "CREATE")).unwrap();
        store.append(draft("audit-002", "user-bob", "QUERY")).unwrap();
        ledger.put("USER~user-alice~", br#"{"id":"user-alice"}"#).unwrap();

        let entries = store.scan_all().unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_query_by_user_filters_and_sorts() {
        let ledger = MemoryLedger::new();
        let store = AuditStore::new(&ledger);

        ledger.set_tx("tx-1", 100);
        store.append(draft("audit-001", "user-alice", "CREATE")).unwrap();
        ledger.set_tx("tx-2", 300);
        store.append(draft("audit-002", "user-bob", "QUERY")).unwrap();
        ledger.set_tx("tx-3", 200);
        store.append(draft("audit-003", "user-alice", "UPDATE")).unwrap();

        let entries = store.query_by_user("user-alice").unwrap();
        let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["audit-003", "audit-001"]);
    }

    #[test]
    fn test_query_by_action_filters_and_sorts() {
        let ledger = MemoryLedger::new();
        let store = AuditStore::new(&ledger);

        ledger.set_tx("tx-1", 100);
        store.append(draft("audit-001", "user-alice", "CREATE")).unwrap();
        ledger.set_tx("tx-2", 300);
        store.append(draft("audit-002", "user-bob", "CREATE")).unwrap();
        ledger.set_tx("tx-3", 200);
        store.append(draft("audit-003", "user-carol", "DELETE")).unwrap();

        let entries = store.query_by_action("CREATE").unwrap();
        let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["audit-002", "audit-001"]);
    }

    #[test]
    fn test_query_by_action_rejects_unknown() {
        let ledger = MemoryLedger::new();
        let store = AuditStore::new(&ledger);

        assert!(matches!(
            store.query_by_action("GRANT").unwrap_err(),
            StoreError::Validation(_)
        ));
        assert!(matches!(
            store.query_by_action("").unwrap_err(),
            StoreError::Validation(_)
        ));
    }

    #[test]
    fn test_query_by_date_range_inclusive_bounds() {
        let ledger = MemoryLedger::new();
        let store = AuditStore::new(&ledger);

        for (id, ts) in [("audit-001", 100), ("audit-002", 200), ("audit-003", 300)] {
            ledger.set_tx("tx", ts);
            store.append(draft(id, "user-alice", "CREATE")).unwrap();
        }

        let entries = store.query_by_date_range(100, 200).unwrap();
        let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["audit-002", "audit-001"]);
    }

    #[test]
    fn test_query_by_date_range_rejects_reversed_range() {
        let ledger = MemoryLedger::new();
        let store = AuditStore::new(&ledger);

        let err = store.query_by_date_range(100, 50).unwrap_err();
        let StoreError::Validation(v) = err else {
            panic!("expected validation error")
        };
        assert_eq!(v.kind, ValidationErrorKind::Range);
    }

    #[test]
    fn test_query_by_date_range_rejects_negative_bounds() {
        let ledger = MemoryLedger::new();
        let store = AuditStore::new(&ledger);

        assert!(matches!(
            store.query_by_date_range(-1, 50).unwrap_err(),
            StoreError::Validation(_)
        ));
    }

    #[test]
    fn test_seed_sample_entries() {
        let ledger = MemoryLedger::new();
        let store = AuditStore::new(&ledger);

        store.seed_sample_entries().unwrap();
        assert_eq!(store.scan_all().unwrap().len(), 2);

        // Seeding is append-only like everything else.
        assert!(matches!(
            store.seed_sample_entries().unwrap_err(),
            StoreError::Conflict { .. }
        ));
    }
}
