//! # schemagen
//!
//! Schema-driven entity class generator.
//!
//! Reads a database schema description (tables, views, columns, sequences),
//! validates it and generates one JPA entity class per table and view:
//!
//! - **Type mapping** from SQL column kinds to Java types, primitive or boxed
//!   depending on nullability
//! - **Schema validation** for duplicate table, view and sequence names
//! - **Parallel generation** with a bounded worker pool and fail-fast
//!   cancellation
//! - **Feature toggles** for injection, nullability, encryption, rich
//!   date-time, enterprise and event-bus support
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use schemagen::{Config, EntityEmitterFactory, FileSink, Generator, Schema};
//!
//! #[tokio::main]
//! async fn main() -> schemagen::Result<()> {
//!     let config = Config::load("config.yaml")?.with_auto_tuning();
//!     let schema = Schema::load(&config.schema)?;
//!     let factory = Arc::new(EntityEmitterFactory::new(FileSink::new(&config.output.dir)));
//!     let report = Generator::from_config(&config, schema, factory).run(None).await?;
//!     println!("Generated {} files", report.files_generated);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod emitter;
pub mod error;
pub mod orchestrator;
pub mod pipeline;
pub mod typemap;

// Re-exports for convenient access
pub use config::{Config, GenerationOptions, OutputConfig, RuntimeConfig};
pub use crate::core::{Column, Schema, Table, View};
pub use emitter::{Artifact, Emitter, EmitterFactory, EntityEmitterFactory, FileSink, MemorySink};
pub use error::{GenError, Result};
pub use orchestrator::{Generator, GeneratorConfig};
pub use pipeline::{build, GenerationReport, PipelineConfig, RunStatus};
pub use typemap::{ColumnKind, RuntimeType, TypeDescriptor};
