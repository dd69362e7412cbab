//! Schema document loading.
//!
//! Schema documents are YAML or JSON. Files ending in `.json` are parsed as
//! JSON; everything else is parsed as YAML.

use std::path::Path;

use tracing::debug;

use super::schema::Schema;
use crate::error::{GenError, Result};

impl Schema {
    /// Load a schema document from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let schema = if is_json {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        }
        .map_err(|e| GenError::Schema(format!("{}: {}", path.display(), e)))?;

        debug!(
            "Loaded schema [{}] from {:?}: {} tables, {} views",
            schema.name,
            path,
            schema.tables.len(),
            schema.views.len()
        );
        Ok(schema)
    }

    /// Parse a schema document from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let schema: Schema =
            serde_yaml::from_str(yaml).map_err(|e| GenError::Schema(e.to_string()))?;
        schema.check_document()?;
        Ok(schema)
    }

    /// Parse a schema document from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let schema: Schema = serde_json::from_str(json)?;
        schema.check_document()?;
        Ok(schema)
    }

    fn check_document(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(GenError::Schema("database name is required".into()));
        }
        Ok(())
    }
}
