//! Run report and the thread-safe collector that builds it.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use tracing::{error, info};

use crate::error::{GenError, Result};

use super::job::{EntityKind, JobResult};

/// Final status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Completed,
    Failed,
    Cancelled,
}

/// A table or view that failed to generate.
#[derive(Debug)]
pub struct TableError {
    pub table: String,
    pub error: GenError,
}

impl Serialize for TableError {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TableError", 2)?;
        state.serialize_field("table", &self.table)?;
        state.serialize_field("message", &self.error.to_string())?;
        state.end()
    }
}

/// Files generated for one table or view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactSummary {
    pub table: String,
    pub kind: EntityKind,
    pub class_name: String,
    pub path: PathBuf,
    pub files: usize,
}

/// Result of a generation run.
#[derive(Debug, Serialize)]
pub struct GenerationReport {
    /// Unique run identifier.
    pub run_id: String,

    pub status: RunStatus,

    pub started_at: DateTime<Utc>,

    pub completed_at: DateTime<Utc>,

    /// Total duration in seconds.
    pub duration_seconds: f64,

    /// Tables and views whose job ran, successfully or not.
    pub tables_processed: usize,

    pub files_generated: usize,

    /// Jobs never started because the run was cancelled.
    pub tables_skipped: usize,

    /// Failures, sorted by table name.
    pub errors: Vec<TableError>,

    /// Successful entities, sorted by table name.
    pub artifacts: Vec<ArtifactSummary>,
}

impl GenerationReport {
    /// True when every planned job ran and succeeded.
    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Completed
    }

    /// Convert to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// One-line human readable summary.
    pub fn summary(&self) -> String {
        format!(
            "Generated {} file(s) for {} table(s) in {:.2}s. {} failed, {} skipped.",
            self.files_generated,
            self.tables_processed,
            self.duration_seconds,
            self.errors.len(),
            self.tables_skipped
        )
    }
}

/// Collects job outcomes from concurrent workers.
///
/// Counters are atomics; errors and artifacts are appended under a mutex
/// and sorted by table name in [`ReportCollector::finish`].
#[derive(Debug, Default)]
pub struct ReportCollector {
    processed: AtomicUsize,
    files: AtomicUsize,
    skipped: AtomicUsize,
    errors: Mutex<Vec<TableError>>,
    artifacts: Mutex<Vec<ArtifactSummary>>,
}

impl ReportCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of a job that ran.
    pub fn record(&self, table: &str, result: Result<JobResult>) {
        self.processed.fetch_add(1, Ordering::Relaxed);

        match result {
            Ok(job) => {
                info!(
                    "{}: generated {} ({} file(s), {:?})",
                    table,
                    job.path.display(),
                    job.files_generated,
                    job.elapsed
                );
                self.files.fetch_add(job.files_generated, Ordering::Relaxed);
                self.artifacts
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .push(ArtifactSummary {
                        table: job.entity,
                        kind: job.kind,
                        class_name: job.class_name,
                        path: job.path,
                        files: job.files_generated,
                    });
            }
            Err(e) => {
                error!("{}: failed - {}", table, e);
                self.errors
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .push(TableError {
                        table: table.to_string(),
                        error: e,
                    });
            }
        }
    }

    /// Record a job that was never started.
    pub fn skip(&self, table: &str) {
        info!("{}: skipped", table);
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn failed(&self) -> usize {
        self.errors.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Build the final report.
    pub fn finish(self, run_id: String, started_at: DateTime<Utc>) -> GenerationReport {
        let completed_at = Utc::now();

        let mut errors = self.errors.into_inner().unwrap_or_else(|e| e.into_inner());
        errors.sort_by(|a, b| a.table.cmp(&b.table));
        let mut artifacts = self
            .artifacts
            .into_inner()
            .unwrap_or_else(|e| e.into_inner());
        artifacts.sort_by(|a, b| a.table.cmp(&b.table));

        let tables_skipped = self.skipped.into_inner();
        let status = if !errors.is_empty() {
            RunStatus::Failed
        } else if tables_skipped > 0 {
            RunStatus::Cancelled
        } else {
            RunStatus::Completed
        };

        GenerationReport {
            run_id,
            status,
            started_at,
            completed_at,
            duration_seconds: (completed_at - started_at).num_milliseconds() as f64 / 1000.0,
            tables_processed: self.processed.into_inner(),
            files_generated: self.files.into_inner(),
            tables_skipped,
            errors,
            artifacts,
        }
    }
}
