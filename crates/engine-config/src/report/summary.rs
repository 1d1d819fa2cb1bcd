use chrono::{DateTime, Utc};
use engine_core::metrics::MetricsSnapshot;
use model::{core::identifiers::RunId, execution::failed_row::FailedRecord};
use serde::Serialize;
use std::fmt;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// One request per pending row, marker set per row.
    Row,
    /// Chunked batch requests with per-item fallback.
    Bulk,
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncMode::Row => f.write_str("row"),
            SyncMode::Bulk => f.write_str("bulk"),
        }
    }
}

/// Outcome of one entity run. Reported, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct SyncSummary {
    pub run_id: RunId,
    pub entity: String,
    pub mode: SyncMode,
    pub found: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub duplicates: u64,
    pub requests: u64,
    pub chunks: u64,
    pub fallback_chunks: u64,
    pub failures: Vec<FailedRecord>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SyncSummary {
    pub fn from_metrics(
        run_id: RunId,
        entity: &str,
        mode: SyncMode,
        metrics: MetricsSnapshot,
        failures: Vec<FailedRecord>,
        started_at: DateTime<Utc>,
    ) -> Self {
        SyncSummary {
            run_id,
            entity: entity.to_string(),
            mode,
            found: metrics.records_found,
            succeeded: metrics.records_integrated,
            failed: metrics.failure_count,
            duplicates: metrics.duplicates,
            requests: metrics.requests_sent,
            chunks: metrics.chunks_processed,
            fallback_chunks: metrics.fallback_chunks,
            failures,
            started_at,
            finished_at: Utc::now(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }

    /// Emits the one-line tally for this run.
    pub fn log(&self) {
        if self.is_clean() {
            info!(
                run_id = %self.run_id,
                entity = %self.entity,
                mode = %self.mode,
                "{} succeeded, {} failed ({} found, {} duplicates)",
                self.succeeded, self.failed, self.found, self.duplicates
            );
        } else {
            warn!(
                run_id = %self.run_id,
                entity = %self.entity,
                mode = %self.mode,
                "{} succeeded, {} failed ({} found, {} duplicates)",
                self.succeeded, self.failed, self.found, self.duplicates
            );
        }
    }
}
