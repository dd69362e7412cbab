//! Object builder pipeline.
//!
//! - [`GenerationJob`]: Command pattern work unit for one table or view
//! - [`PipelineConfig`]: workers, fail-fast, package and feature toggles
//! - [`ReportCollector`] / [`GenerationReport`]: outcome accounting
//!
//! [`build`] drives the jobs sequentially on the calling thread. The
//! orchestrator runs the same jobs on a bounded worker pool.

mod config;
mod job;
mod report;

pub use config::PipelineConfig;
pub use job::{EntityDescriptor, EntityKind, FieldDescriptor, GenerationJob, JobResult};
pub use report::{ArtifactSummary, GenerationReport, ReportCollector, RunStatus, TableError};

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::core::schema::Schema;
use crate::core::validation;
use crate::emitter::EmitterFactory;
use crate::error::Result;

/// Validate `schema` and generate every table and view in declaration order.
///
/// With `fail_fast`, the first failure stops the run and the remaining jobs
/// are counted as skipped.
pub fn build(
    schema: Arc<Schema>,
    config: &PipelineConfig,
    factory: &dyn EmitterFactory,
) -> Result<GenerationReport> {
    let started_at = Utc::now();
    let run_id = Uuid::new_v4().to_string();

    validation::validate(&schema)?;

    let jobs = GenerationJob::plan(&schema, config);
    info!(
        "Generating {} entities from database [{}] into {}",
        jobs.len(),
        schema.name,
        config.package_for(&schema.name)
    );

    let collector = ReportCollector::new();
    let mut stopped = false;
    for job in &jobs {
        if stopped {
            collector.skip(job.name());
            continue;
        }
        let result = job.execute(factory, &config.options);
        stopped = config.fail_fast && result.is_err();
        collector.record(job.name(), result);
    }

    let report = collector.finish(run_id, started_at);
    info!("{}", report.summary());
    Ok(report)
}
