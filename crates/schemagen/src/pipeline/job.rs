//! Generation job (Command pattern) for one table or view.
//!
//! A job holds a shared handle to the validated schema and the position of
//! the entity it generates. Executing it resolves every column into a
//! [`FieldDescriptor`], assembles an [`EntityDescriptor`] and hands it to a
//! fresh emitter. Jobs share no mutable state.
//!
//! Validation compares raw names exactly, but two raw names can still derive
//! the same class (`Account`/`account`, `person_address`/`PersonAddress`) or
//! the same property inside one class (`first_name`/`FirstName`). Planning
//! detects class collisions and the job resolving columns detects property
//! collisions; either fails only the affected table.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::debug;

use crate::config::GenerationOptions;
use crate::core::identifier::{derive_class_identifier, derive_property_name, java_identifier};
use crate::core::schema::{Column, Schema};
use crate::emitter::EmitterFactory;
use crate::error::{GenError, Result};
use crate::typemap::{self, ColumnKind, RuntimeType};

use super::config::PipelineConfig;

/// Whether an entity comes from a table or a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Table,
    View,
}

/// Resolved type decisions for one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    /// Column name as declared in the schema.
    pub name: String,
    /// Generated property name (e.g. `firstName`).
    pub property_name: String,
    pub column_kind: ColumnKind,
    /// Declared type text (primitive unless nullable).
    pub type_name: &'static str,
    pub runtime_type: RuntimeType,
    pub nullable: bool,
    pub primitive: bool,
    pub immutable: bool,
    pub numeric: bool,
    pub primary_key: bool,
    pub length: Option<u32>,
    pub sequence: Option<String>,
}

impl FieldDescriptor {
    /// Resolve a column through the type registry.
    ///
    /// Fails with `NoMapping` for `UNKNOWN` columns and
    /// `UnsupportedColumnKind` for MONEY/FRACTION.
    pub fn resolve(column: &Column) -> Result<Self> {
        let kind = column.kind;
        let nullable = column.nullable;

        Ok(Self {
            name: column.name.clone(),
            property_name: java_identifier(&derive_property_name(&column.name)),
            column_kind: kind,
            type_name: typemap::resolved_type(kind, nullable)?,
            runtime_type: typemap::resolved_runtime_type(kind, nullable)?,
            nullable,
            primitive: typemap::is_primitive_representation(kind, nullable),
            immutable: typemap::is_immutable(kind),
            numeric: typemap::is_numeric(kind),
            primary_key: column.primary_key,
            length: column.length,
            sequence: column.sequence.clone(),
        })
    }
}

/// Everything an emitter needs to render one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityDescriptor {
    /// Table or view name as declared.
    pub source_name: String,
    pub kind: EntityKind,
    /// Owning database name.
    pub database: String,
    /// Generated class identifier.
    pub class_name: String,
    /// Package the class is generated into.
    pub package_name: String,
    pub fields: Vec<FieldDescriptor>,
    /// Sequences owned by the table (empty for views).
    pub sequences: Vec<String>,
}

impl EntityDescriptor {
    /// Primary key fields in declaration order.
    pub fn primary_key_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.primary_key)
    }
}

/// Result of a successfully executed job.
#[derive(Debug, Clone)]
pub struct JobResult {
    pub entity: String,
    pub kind: EntityKind,
    pub class_name: String,
    /// Artifact path relative to the emitter's root.
    pub path: PathBuf,
    pub files_generated: usize,
    pub elapsed: Duration,
}

/// A generation job for a single table or view.
#[derive(Debug, Clone)]
pub struct GenerationJob {
    schema: Arc<Schema>,
    kind: EntityKind,
    index: usize,
    package_name: String,
    /// Earlier entity that already claimed this job's class file.
    collides_with: Option<String>,
}

impl GenerationJob {
    /// Plan one job per table, then one per view, in declaration order.
    ///
    /// When several entities derive the same class file (compared without
    /// case, so the output is portable to case-insensitive file systems) the
    /// first keeps it and every later one is marked to fail at execution.
    pub fn plan(schema: &Arc<Schema>, config: &PipelineConfig) -> Vec<GenerationJob> {
        let package_name = config.package_for(&schema.name);

        let tables = (0..schema.tables.len()).map(|i| (EntityKind::Table, i));
        let views = (0..schema.views.len()).map(|i| (EntityKind::View, i));

        let mut claimed: HashMap<String, String> = HashMap::new();
        tables
            .chain(views)
            .map(|(kind, index)| {
                let mut job = GenerationJob {
                    schema: Arc::clone(schema),
                    kind,
                    index,
                    package_name: package_name.clone(),
                    collides_with: None,
                };
                let key = format!("{}.{}", job.package_name, job.class_name()).to_lowercase();
                match claimed.get(&key) {
                    Some(owner) => job.collides_with = Some(owner.clone()),
                    None => {
                        claimed.insert(key, job.name().to_string());
                    }
                }
                job
            })
            .collect()
    }

    /// Table or view name.
    pub fn name(&self) -> &str {
        match self.kind {
            EntityKind::Table => &self.schema.tables[self.index].name,
            EntityKind::View => &self.schema.views[self.index].name,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Generated class identifier.
    pub fn class_name(&self) -> String {
        java_identifier(&derive_class_identifier(self.name()))
    }

    /// Resolve all columns and assemble the entity descriptor.
    pub fn describe(&self) -> Result<EntityDescriptor> {
        let (columns, sequences): (&[Column], Vec<String>) = match self.kind {
            EntityKind::Table => {
                let table = &self.schema.tables[self.index];
                (
                    table.columns.as_slice(),
                    table.sequence_names().into_iter().map(String::from).collect(),
                )
            }
            EntityKind::View => (self.schema.views[self.index].columns.as_slice(), Vec::new()),
        };

        let fields = columns
            .iter()
            .map(|column| {
                FieldDescriptor::resolve(column).inspect_err(|e| {
                    debug!("{}.{}: {}", self.name(), column.name, e);
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut properties: HashMap<&str, &str> = HashMap::new();
        for field in &fields {
            if let Some(first) = properties.insert(&field.property_name, &field.name) {
                return Err(GenError::emitter(
                    self.name(),
                    format!(
                        "columns [{}] and [{}] both map to property [{}]",
                        first, field.name, field.property_name
                    ),
                ));
            }
        }

        Ok(EntityDescriptor {
            source_name: self.name().to_string(),
            kind: self.kind,
            database: self.schema.name.clone(),
            class_name: self.class_name(),
            package_name: self.package_name.clone(),
            fields,
            sequences,
        })
    }

    /// Resolve the entity and emit it through a new emitter from `factory`.
    pub fn execute(
        &self,
        factory: &dyn EmitterFactory,
        options: &GenerationOptions,
    ) -> Result<JobResult> {
        let start = Instant::now();
        debug!("{}: generating", self.name());

        if let Some(owner) = &self.collides_with {
            return Err(GenError::emitter(
                self.name(),
                format!(
                    "class {} is already generated for [{}]",
                    self.class_name(),
                    owner
                ),
            ));
        }

        let entity = self.describe()?;
        let mut emitter = factory.create(&entity.source_name);
        let artifact = emitter.emit(&entity, options).map_err(|e| match e {
            GenError::EmitterFailure { .. } => e,
            other => GenError::emitter(self.name(), other.to_string()),
        })?;

        Ok(JobResult {
            entity: entity.source_name,
            kind: self.kind,
            class_name: entity.class_name,
            path: artifact.path,
            files_generated: 1,
            elapsed: start.elapsed(),
        })
    }
}
