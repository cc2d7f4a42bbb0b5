//! In-process ledger backend.
//!
//! [`MemoryLedger`] implements [`LedgerState`] over an ordered in-memory
//! map and interprets selector queries directly against the stored JSON
//! documents. It exists for tests and embedded use; a production
//! deployment binds the stores to the real ledger transaction context
//! instead.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::Utc;
use serde_json::Value;
use tracing::trace;
use uuid::{Timestamp, Uuid};

use crate::error::LedgerError;
use crate::selector::{Condition, Selector, SortDirection};
use crate::state::LedgerState;

/// Generates a fresh v7 transaction id.
fn new_tx_id() -> String {
    Uuid::new_v7(Timestamp::now(uuid::NoContext)).to_string()
}

#[derive(Debug, Clone)]
struct TxContext {
    id: String,
    time_millis: i64,
}

/// Ordered in-memory [`LedgerState`] backend.
///
/// The transaction context is stamped at construction and can be advanced
/// with [`begin_tx`](Self::begin_tx) or pinned with
/// [`set_tx`](Self::set_tx) for deterministic tests.
#[derive(Debug)]
pub struct MemoryLedger {
    state: Mutex<BTreeMap<String, Vec<u8>>>,
    tx: Mutex<TxContext>,
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLedger {
    /// Creates an empty ledger with a fresh transaction context.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(BTreeMap::new()),
            tx: Mutex::new(TxContext {
                id: new_tx_id(),
                time_millis: Utc::now().timestamp_millis(),
            }),
        }
    }

    /// Creates an empty ledger with a pinned transaction context.
    #[must_use]
    pub fn with_tx(tx_id: impl Into<String>, time_millis: i64) -> Self {
        let ledger = Self::new();
        ledger.set_tx(tx_id, time_millis);
        ledger
    }

    /// Starts a new transaction: fresh id, current wall-clock time.
    pub fn begin_tx(&self) {
        let mut tx = self.tx.lock().unwrap();
        tx.id = new_tx_id();
        tx.time_millis = Utc::now().timestamp_millis();
    }

    /// Pins the transaction id and timestamp, for deterministic tests.
    pub fn set_tx(&self, tx_id: impl Into<String>, time_millis: i64) {
        let mut tx = self.tx.lock().unwrap();
        tx.id = tx_id.into();
        tx.time_millis = time_millis;
    }

    /// Returns the number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().unwrap().len()
    }

    /// Returns true if nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.lock().unwrap().is_empty()
    }
}

fn condition_matches(doc: &Value, field: &str, condition: &Condition) -> bool {
    match condition {
        Condition::Eq(expected) => doc.get(field) == Some(expected),
        Condition::Between { gte, lte } => doc
            .get(field)
            .and_then(Value::as_i64)
            .is_some_and(|n| n >= *gte && n <= *lte),
    }
}

/// Orders two optional field values. Missing sorts before present; mixed
/// types compare equal, matching what an index-backed engine would refuse
/// to interleave.
fn field_order(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => match (x, y) {
            (Value::Number(m), Value::Number(n)) => m
                .as_f64()
                .unwrap_or(f64::NAN)
                .total_cmp(&n.as_f64().unwrap_or(f64::NAN)),
            (Value::String(s), Value::String(t)) => s.cmp(t),
            (Value::Bool(p), Value::Bool(q)) => p.cmp(q),
            _ => Ordering::Equal,
        },
    }
}

impl LedgerState for MemoryLedger {
    fn put(&self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        trace!(key = %key, len = value.len(), "put");
        self.state
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        Ok(self.state.lock().unwrap().get(key).cloned())
    }

    fn scan_range(&self, start: &str, end: &str) -> Result<Vec<(String, Vec<u8>)>, LedgerError> {
        let state = self.state.lock().unwrap();
        let pairs = state
            .iter()
            .filter(|(key, _)| {
                (start.is_empty() || key.as_str() >= start)
                    && (end.is_empty() || key.as_str() < end)
            })
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Ok(pairs)
    }

    fn query(&self, selector: &Selector) -> Result<Vec<(String, Vec<u8>)>, LedgerError> {
        let state = self.state.lock().unwrap();

        // Values that are not JSON documents are invisible to selectors,
        // the same way a document store would never have indexed them.
        let mut matches: Vec<(String, Vec<u8>, Value)> = state
            .iter()
            .filter_map(|(key, bytes)| {
                let doc: Value = serde_json::from_slice(bytes).ok()?;
                selector
                    .selector
                    .iter()
                    .all(|(field, condition)| condition_matches(&doc, field, condition))
                    .then(|| (key.clone(), bytes.clone(), doc))
            })
            .collect();

        matches.sort_by(|(_, _, a), (_, _, b)| {
            for spec in &selector.sort {
                let order = field_order(a.get(spec.field.as_str()), b.get(spec.field.as_str()));
                let order = match spec.direction {
                    SortDirection::Asc => order,
                    SortDirection::Desc => order.reverse(),
                };
                if order != Ordering::Equal {
                    return order;
                }
            }
            Ordering::Equal
        });

        trace!(matched = matches.len(), "query");
        Ok(matches
            .into_iter()
            .map(|(key, bytes, _)| (key, bytes))
            .collect())
    }

    fn tx_id(&self) -> String {
        self.tx.lock().unwrap().id.clone()
    }

    fn tx_time_millis(&self) -> i64 {
        self.tx.lock().unwrap().time_millis
    }
}
