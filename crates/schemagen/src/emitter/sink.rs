//! Artifact sinks.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::error::Result;

use super::Artifact;

/// Destination for rendered artifacts. Shared by all emitters of a run.
pub trait Sink: Send + Sync + 'static {
    fn write(&self, artifact: &Artifact) -> Result<()>;
}

/// Writes artifacts below a root directory, creating directories as needed.
#[derive(Debug, Clone)]
pub struct FileSink {
    root: PathBuf,
}

impl FileSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Sink for FileSink {
    fn write(&self, artifact: &Artifact) -> Result<()> {
        let path = self.root.join(&artifact.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, &artifact.contents)?;
        debug!("Wrote {}", path.display());
        Ok(())
    }
}

/// Keeps artifacts in memory. Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    artifacts: Arc<Mutex<Vec<Artifact>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the stored artifacts, sorted by path.
    pub fn artifacts(&self) -> Vec<Artifact> {
        let mut artifacts = self
            .artifacts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        artifacts.sort_by(|a, b| a.path.cmp(&b.path));
        artifacts
    }
}

impl Sink for MemorySink {
    fn write(&self, artifact: &Artifact) -> Result<()> {
        self.artifacts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(artifact.clone());
        Ok(())
    }
}
