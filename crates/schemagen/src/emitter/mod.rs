//! Emitters turn resolved entities into source artifacts.
//!
//! - [`Emitter`]: renders one [`EntityDescriptor`] into an [`Artifact`]
//! - [`EmitterFactory`]: creates one emitter per generation job
//! - [`Sink`]: where rendered artifacts go ([`FileSink`], [`MemorySink`])
//!
//! # Design Patterns
//!
//! - **Abstract Factory**: the pipeline only knows [`EmitterFactory`], so
//!   each job gets its own emitter and no emitter state is shared between
//!   concurrently running jobs.
//! - **Strategy**: sinks are interchangeable; `--dry-run` swaps the file
//!   sink for an in-memory one.

mod entity;
mod sink;

pub use entity::{EntityEmitter, EntityEmitterFactory};
pub use sink::{FileSink, MemorySink, Sink};

use std::path::PathBuf;

use serde::Serialize;

use crate::config::GenerationOptions;
use crate::error::Result;
use crate::pipeline::EntityDescriptor;

/// A rendered source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    /// Table or view the artifact was generated from.
    pub entity: String,
    /// Path relative to the sink root (e.g. `com/example/Person.java`).
    pub path: PathBuf,
    pub contents: String,
}

/// Renders entities into artifacts.
pub trait Emitter: Send {
    /// Render `entity` and hand the artifact to the emitter's sink.
    fn emit(&mut self, entity: &EntityDescriptor, options: &GenerationOptions)
        -> Result<Artifact>;
}

/// Creates a fresh emitter for each job.
pub trait EmitterFactory: Send + Sync {
    fn create(&self, entity_name: &str) -> Box<dyn Emitter>;
}
