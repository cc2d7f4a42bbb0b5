//! Compliance reporting over the audit trail.
//!
//! Reports are read-only aggregations of a date-range query; nothing here
//! writes to the ledger.

use std::collections::BTreeMap;

use custodia_core::AuditEntry;
use custodia_ledger::LedgerState;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::{Timestamp, Uuid};

use crate::audit::AuditStore;
use crate::error::Result;

/// Entry status counted as a successful operation.
const STATUS_SUCCESS: &str = "SUCCESS";

/// Aggregate statistics over a set of audit entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditStats {
    /// Total number of entries aggregated.
    pub total_entries: usize,

    /// Entry counts per action name.
    pub entries_by_action: BTreeMap<String, usize>,

    /// Entry counts per acting user.
    pub entries_by_user: BTreeMap<String, usize>,

    /// Entry counts per resource type.
    pub entries_by_resource: BTreeMap<String, usize>,

    /// Share of entries with a `SUCCESS` status, in `[0, 1]`.
    pub success_rate: f64,

    /// Earliest timestamp covered, epoch milliseconds. Zero when empty.
    pub start_date: i64,

    /// Latest timestamp covered, epoch milliseconds. Zero when empty.
    pub end_date: i64,
}

impl AuditStats {
    /// Aggregates statistics over a slice of entries. Pure; performs no
    /// ledger access.
    #[must_use]
    pub fn from_entries(entries: &[AuditEntry]) -> Self {
        let mut entries_by_action = BTreeMap::new();
        let mut entries_by_user = BTreeMap::new();
        let mut entries_by_resource = BTreeMap::new();
        let mut successes = 0usize;

        for entry in entries {
            *entries_by_action
                .entry(entry.action.as_str().to_string())
                .or_insert(0) += 1;
            *entries_by_user.entry(entry.user_id.clone()).or_insert(0) += 1;
            *entries_by_resource
                .entry(entry.resource_type.clone())
                .or_insert(0) += 1;
            if entry.status == STATUS_SUCCESS {
                successes += 1;
            }
        }

        #[allow(clippy::cast_precision_loss)]
        let success_rate = if entries.is_empty() {
            0.0
        } else {
            successes as f64 / entries.len() as f64
        };

        Self {
            total_entries: entries.len(),
            entries_by_action,
            entries_by_user,
            entries_by_resource,
            success_rate,
            start_date: entries.iter().map(|e| e.timestamp).min().unwrap_or(0),
            end_date: entries.iter().map(|e| e.timestamp).max().unwrap_or(0),
        }
    }
}

/// A generated compliance report over one reporting period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReport {
    /// Unique report identifier.
    pub id: String,

    /// Compliance regime the report was generated for (e.g., `SOC2`).
    pub report_type: String,

    /// Reporting period start, epoch milliseconds.
    pub start_date: i64,

    /// Reporting period end, epoch milliseconds.
    pub end_date: i64,

    /// Who requested the report.
    pub generated_by: String,

    /// Generation timestamp from the ledger transaction clock.
    pub generated_at: i64,

    /// Number of audit entries in the period.
    pub total_entries: usize,

    /// Number of entries whose status was not `SUCCESS`.
    pub anomalies_found: usize,

    /// Report status; always `COMPLETED` for synchronously built reports.
    pub status: String,

    /// Aggregated statistics, JSON-encoded.
    pub summary: String,
}

impl<L: LedgerState> AuditStore<'_, L> {
    /// Generates a compliance report over `[start_ms, end_ms]`.
    ///
    /// Runs the date-range query and aggregates the results; the report is
    /// returned to the caller, not persisted.
    ///
    /// # Errors
    ///
    /// Fails like [`query_by_date_range`](Self::query_by_date_range).
    pub fn generate_report(
        &self,
        report_type: &str,
        start_ms: i64,
        end_ms: i64,
        generated_by: &str,
    ) -> Result<ComplianceReport> {
        let entries = self.query_by_date_range(start_ms, end_ms)?;
        let stats = AuditStats::from_entries(&entries);
        let anomalies_found = entries
            .iter()
            .filter(|entry| entry.status != STATUS_SUCCESS)
            .count();

        let report = ComplianceReport {
            id: Uuid::new_v7(Timestamp::now(uuid::NoContext)).to_string(),
            report_type: report_type.to_string(),
            start_date: start_ms,
            end_date: end_ms,
            generated_by: generated_by.to_string(),
            generated_at: self.ledger().tx_time_millis(),
            total_entries: stats.total_entries,
            anomalies_found,
            status: "COMPLETED".to_string(),
            summary: serde_json::to_string(&stats)?,
        };

        info!(
            report_id = %report.id,
            report_type = %report.report_type,
            total = report.total_entries,
            anomalies = report.anomalies_found,
            "compliance report generated"
        );
        Ok(report)
    }
}
