//! Configuration type definitions with auto-tuning based on system resources.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use sysinfo::System;
use tracing::info;

/// System resource information for auto-tuning.
#[derive(Debug, Clone)]
pub struct SystemResources {
    /// Number of CPU cores.
    pub cpu_cores: usize,
}

impl SystemResources {
    /// Detect system resources.
    pub fn detect() -> Self {
        let mut sys = System::new();
        sys.refresh_cpu();

        Self {
            cpu_cores: sys.cpus().len().max(1),
        }
    }

    /// Log detected system resources.
    pub fn log(&self) {
        info!("System resources: {} CPU cores", self.cpu_cores);
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the schema document (YAML or JSON).
    pub schema: PathBuf,

    /// Where and under which package generated sources are written.
    pub output: OutputConfig,

    /// Feature toggles handed to the emitter.
    #[serde(default)]
    pub generation: GenerationOptions,

    /// Worker pool and failure behaviour.
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

impl Config {
    /// Apply auto-tuned defaults based on system resources.
    /// Only fills in values that weren't explicitly set in the config file.
    pub fn with_auto_tuning(mut self) -> Self {
        let resources = SystemResources::detect();
        resources.log();
        self.runtime = self.runtime.with_auto_tuning(&resources);
        self
    }
}

/// Output location configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Root directory for generated sources (default: "generated").
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// Base package for generated classes (e.g. "com.example.db").
    pub package_base: String,
}

/// Independent feature toggles for generated entities. All default to off.
///
/// The pipeline only uses `package_name_includes_database_name` itself; the
/// rest are passed through to the emitter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    /// Dependency-injection annotations (`@Named`).
    pub dependency_injection_annotations: bool,

    /// `@Nullable` / `@Nonnull` on fields and accessors.
    pub nullability_annotations: bool,

    /// Encryption hooks on string fields.
    pub field_encryption_hooks: bool,

    /// Rich date-time types instead of `java.util.Date`.
    pub rich_date_time_types: bool,

    /// Enterprise container annotations.
    pub enterprise_container_annotations: bool,

    /// Append the lower-cased database name to the package.
    pub package_name_includes_database_name: bool,

    /// Post change events to an event bus from setters.
    pub event_bus_integration: bool,
}

/// Runtime behaviour configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Number of parallel workers. Auto-tuned based on CPU cores if not set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,

    /// Stop starting new tables after the first failure (default: false).
    #[serde(default)]
    pub fail_fast: bool,
}

impl RuntimeConfig {
    /// Apply auto-tuned defaults based on system resources.
    /// Only fills in values that are None (not explicitly set).
    pub fn with_auto_tuning(mut self, resources: &SystemResources) -> Self {
        if self.workers.is_none() {
            self.workers = Some(resources.cpu_cores.clamp(1, 32));
        }

        info!(
            "Auto-tuned config: workers={}, fail_fast={}",
            self.get_workers(),
            self.fail_fast
        );

        self
    }

    pub fn get_workers(&self) -> usize {
        self.workers.unwrap_or(4)
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("generated")
}
