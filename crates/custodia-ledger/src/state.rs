//! The ledger collaborator contract.

use crate::error::LedgerError;
use crate::selector::Selector;

/// Transaction-scoped key/value state as exposed by the ledger collaborator.
///
/// Every store operation runs to completion against one implementation of
/// this trait. The contract the stores rely on, and which a conforming
/// backend must provide:
///
/// - **Write conflicts**: no two transactions successfully write the same
///   key without an intervening read establishing non-existence. This is
///   what makes the stores' existence-check-then-write sequences race-free
///   at the system level; the stores themselves add no locking.
/// - **Snapshot reads**: reads, scans and queries do not observe writes
///   made by the in-flight transaction itself.
/// - **Deterministic time**: [`tx_time_millis`](Self::tx_time_millis) is
///   identical on every replica evaluating the same transaction.
pub trait LedgerState {
    /// Writes a value under a key.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Io`] if the write cannot be staged.
    fn put(&self, key: &str, value: &[u8]) -> Result<(), LedgerError>;

    /// Reads the value stored under a key, if any.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Io`] if the read fails.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;

    /// Returns all key/value pairs with `start <= key < end`, in key order.
    ///
    /// An empty `start` or `end` bound is unbounded on that side; scanning
    /// from `""` to `""` returns the entire key space.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Io`] if the scan fails.
    fn scan_range(&self, start: &str, end: &str) -> Result<Vec<(String, Vec<u8>)>, LedgerError>;

    /// Executes a declarative selector query over the stored JSON documents.
    ///
    /// Matching documents are returned in the requested sort order, or in
    /// key order when the selector carries no sort instruction.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Query`] if the query cannot be executed.
    fn query(&self, selector: &Selector) -> Result<Vec<(String, Vec<u8>)>, LedgerError>;

    /// Returns the identifier of the current transaction.
    fn tx_id(&self) -> String;

    /// Returns the current transaction timestamp in Unix epoch milliseconds.
    fn tx_time_millis(&self) -> i64;
}
