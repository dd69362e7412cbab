//! Generation orchestrator - coordinates the generation run.
//!
//! Runs one blocking job per table or view on the tokio blocking pool,
//! bounded by a semaphore sized to the configured worker count. The schema
//! is shared read-only through an `Arc`; each job creates its own emitter.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::core::schema::Schema;
use crate::core::validation;
use crate::emitter::EmitterFactory;
use crate::error::{GenError, Result};
use crate::pipeline::{GenerationJob, GenerationReport, PipelineConfig, ReportCollector};

/// Generator configuration. Same knobs as the sequential pipeline.
pub type GeneratorConfig = PipelineConfig;

/// Drives a full generation run over a validated schema.
pub struct Generator {
    schema: Arc<Schema>,
    config: GeneratorConfig,
    factory: Arc<dyn EmitterFactory>,
}

impl Generator {
    /// Create a new generator.
    pub fn new(
        schema: impl Into<Arc<Schema>>,
        config: GeneratorConfig,
        factory: Arc<dyn EmitterFactory>,
    ) -> Self {
        Self {
            schema: schema.into(),
            config,
            factory,
        }
    }

    /// Create a generator from a loaded configuration file.
    pub fn from_config(
        config: &Config,
        schema: impl Into<Arc<Schema>>,
        factory: Arc<dyn EmitterFactory>,
    ) -> Self {
        Self::new(schema, PipelineConfig::from_config(config), factory)
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Run the generation.
    ///
    /// Validation errors abort the run before any job starts. Job failures
    /// are collected into the report. With `fail_fast`, the first failure
    /// cancels the token: jobs not yet started are skipped while jobs in
    /// flight complete. Cancelling `cancel` from outside has the same effect.
    pub async fn run(&self, cancel: Option<CancellationToken>) -> Result<GenerationReport> {
        let started_at = Utc::now();
        let run_id = uuid::Uuid::new_v4().to_string();
        let cancel = cancel.unwrap_or_else(CancellationToken::new);

        info!("Starting generation run: {}", run_id);

        // Phase 1: Validate
        info!("Phase 1: Validating schema [{}]", self.schema.name);
        validation::validate(&self.schema)?;

        // Phase 2: Generate
        let jobs = GenerationJob::plan(&self.schema, &self.config);
        let workers = self.config.workers.max(1);
        info!(
            "Phase 2: Generating {} entities with {} workers",
            jobs.len(),
            workers
        );

        let semaphore = Arc::new(Semaphore::new(workers));
        let collector = ReportCollector::new();
        let mut handles = Vec::new();

        for job in jobs {
            let permit = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                permit = semaphore.clone().acquire_owned() => {
                    Some(permit.map_err(|_| GenError::Cancelled)?)
                }
            };

            let permit = match permit {
                Some(permit) if !cancel.is_cancelled() => permit,
                _ => {
                    collector.skip(job.name());
                    continue;
                }
            };

            let name = job.name().to_string();
            let factory = Arc::clone(&self.factory);
            let options = self.config.options;
            let fail_fast = self.config.fail_fast;
            let cancel = cancel.clone();

            debug!("{}: scheduled", name);
            let handle = tokio::task::spawn_blocking(move || {
                let result = job.execute(factory.as_ref(), &options);
                if fail_fast && result.is_err() {
                    cancel.cancel();
                }
                drop(permit);
                result
            });

            handles.push((name, handle));
        }

        for (name, handle) in handles {
            match handle.await {
                Ok(result) => collector.record(&name, result),
                Err(e) => {
                    error!("{}: task panicked - {}", name, e);
                    let err = GenError::emitter(&name, format!("task panicked: {}", e));
                    collector.record(&name, Err(err));
                }
            }
        }

        let report = collector.finish(run_id, started_at);

        info!(
            "Generation {:?}: {} tables, {} files, {} failed, {} skipped in {:.2}s",
            report.status,
            report.tables_processed,
            report.files_generated,
            report.errors.len(),
            report.tables_skipped,
            report.duration_seconds
        );

        Ok(report)
    }
}
