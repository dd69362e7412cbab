//! Pipeline configuration.

use crate::config::{Config, GenerationOptions};

/// Configuration for a generation run.
///
/// Controls parallelism, failure behaviour, the base package and the
/// feature toggles handed to each emitter.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Maximum number of entities generated concurrently.
    pub workers: usize,

    /// Stop starting new jobs after the first failure.
    pub fail_fast: bool,

    /// Base package for generated classes.
    pub package_base: String,

    /// Feature toggles.
    pub options: GenerationOptions,
}

impl PipelineConfig {
    /// Create a configuration with four workers and all toggles off.
    pub fn new(package_base: impl Into<String>) -> Self {
        Self {
            workers: 4,
            fail_fast: false,
            package_base: package_base.into(),
            options: GenerationOptions::default(),
        }
    }

    /// Build from a loaded configuration file.
    pub fn from_config(config: &Config) -> Self {
        Self {
            workers: config.runtime.get_workers(),
            fail_fast: config.runtime.fail_fast,
            package_base: config.output.package_base.clone(),
            options: config.generation,
        }
    }

    /// Set the number of workers.
    pub fn with_workers(mut self, count: usize) -> Self {
        self.workers = count.max(1);
        self
    }

    /// Enable or disable fail-fast.
    pub fn with_fail_fast(mut self, enabled: bool) -> Self {
        self.fail_fast = enabled;
        self
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    /// Package for entities of `database`.
    ///
    /// Appends the lower-cased database name (alphanumerics and `_` only)
    /// when `package_name_includes_database_name` is set.
    pub fn package_for(&self, database: &str) -> String {
        if !self.options.package_name_includes_database_name {
            return self.package_base.clone();
        }

        let mut segment: String = database
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        if segment.is_empty() {
            return self.package_base.clone();
        }
        if segment.starts_with(|c: char| c.is_ascii_digit()) {
            segment.insert(0, '_');
        }

        format!("{}.{}", self.package_base, segment)
    }
}
