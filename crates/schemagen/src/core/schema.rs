//! Schema model: database, tables, views, columns and sequences.
//!
//! The model is built once from a schema document (see
//! [`loader`](super::loader)), may be edited programmatically, is validated
//! once per generation run and is then shared read-only by all workers.
//!
//! Table and view lookup is case-insensitive and returns the first match.
//! Duplicate detection during validation is exact-match; the two rules are
//! intentionally different (see [`validation`](super::validation)).

use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::error::{GenError, Result};
use crate::typemap::{classify, ColumnKind};

use super::identifier::{derive_class_identifier, validate_identifier};

/// A database schema definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Database name.
    pub name: String,

    /// Script to run after the generated schema is applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_sql_script: Option<PathBuf>,

    /// Tables in declaration order.
    #[serde(default)]
    pub tables: Vec<Table>,

    /// Views in declaration order.
    #[serde(default)]
    pub views: Vec<View>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Append a table (builder style).
    pub fn with_table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    /// Append a view (builder style).
    pub fn with_view(mut self, view: View) -> Self {
        self.views.push(view);
        self
    }

    pub fn add_table(&mut self, table: Table) {
        self.tables.push(table);
    }

    pub fn add_view(&mut self, view: View) {
        self.views.push(view);
    }

    /// Table names in declaration order.
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }

    /// View names in declaration order.
    pub fn view_names(&self) -> Vec<&str> {
        self.views.iter().map(|v| v.name.as_str()).collect()
    }

    /// Case-insensitive search for a table.
    pub fn find_table(&self, name: &str) -> Option<&Table> {
        self.tables
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Case-insensitive search for a table, mutable.
    pub fn find_table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables
            .iter_mut()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Case-insensitive search for a view.
    pub fn find_view(&self, name: &str) -> Option<&View> {
        self.views.iter().find(|v| v.name.eq_ignore_ascii_case(name))
    }

    /// Class identifier generated for a table or view name.
    pub fn table_class_identifier(&self, table_name: &str) -> String {
        derive_class_identifier(table_name)
    }

    /// Number of generation units (tables plus views).
    pub fn entity_count(&self) -> usize {
        self.tables.len() + self.views.len()
    }
}

/// Table definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Table name.
    pub name: String,

    /// Column definitions.
    #[serde(default)]
    pub columns: Vec<Column>,

    /// Sequences owned by this table.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sequences: Vec<String>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Append a column (builder style).
    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Declare a table-level sequence (builder style).
    pub fn with_sequence(mut self, name: impl Into<String>) -> Self {
        self.sequences.push(name.into());
        self
    }

    /// Declared sequences followed by column-level sequence references.
    pub fn sequence_names(&self) -> Vec<&str> {
        self.sequences
            .iter()
            .map(String::as_str)
            .chain(self.columns.iter().filter_map(|c| c.sequence.as_deref()))
            .collect()
    }

    /// Case-insensitive search for a column.
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Primary key columns in declaration order.
    pub fn primary_key_columns(&self) -> Vec<&Column> {
        self.columns.iter().filter(|c| c.primary_key).collect()
    }

    /// Check the table's own invariants, stopping at the first problem.
    pub fn validate(&self) -> Result<()> {
        match self.violations().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Every violation of the table's own invariants.
    pub fn violations(&self) -> Vec<GenError> {
        let mut errors = Vec::new();
        if let Err(e) = validate_identifier(&self.name) {
            errors.push(GenError::invalid_table(&self.name, e));
        }
        for seq in &self.sequences {
            if seq.trim().is_empty() {
                errors.push(GenError::invalid_table(
                    &self.name,
                    "sequence name cannot be empty",
                ));
            }
        }
        column_violations(&self.name, &self.columns, &mut errors);
        errors
    }
}

/// View definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct View {
    /// View name.
    pub name: String,

    /// Columns exposed by the view.
    #[serde(default)]
    pub columns: Vec<Column>,
}

impl View {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Append a column (builder style).
    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Every violation of the view's own invariants.
    pub fn violations(&self) -> Vec<GenError> {
        let mut errors = Vec::new();
        if let Err(e) = validate_identifier(&self.name) {
            errors.push(GenError::invalid_table(&self.name, e));
        }
        column_violations(&self.name, &self.columns, &mut errors);
        errors
    }
}

fn column_violations(owner: &str, columns: &[Column], errors: &mut Vec<GenError>) {
    let mut seen: HashSet<&str> = HashSet::new();
    for column in columns {
        if let Err(e) = validate_identifier(&column.name) {
            errors.push(GenError::invalid_table(owner, format!("column {}", e)));
            continue;
        }
        if !seen.insert(column.name.as_str()) {
            errors.push(GenError::DuplicateColumnName {
                table: owner.to_string(),
                column: column.name.clone(),
            });
        }
    }
}

/// Column definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,

    /// Column kind. Documents may give a kind name or a JDBC type code.
    #[serde(rename = "type", deserialize_with = "deserialize_kind")]
    pub kind: ColumnKind,

    /// Whether the column allows NULL (default: false).
    #[serde(default)]
    pub nullable: bool,

    /// Whether the column is part of the primary key.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub primary_key: bool,

    /// Maximum length for character and binary kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,

    /// Sequence feeding this column's values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<String>,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnKind, nullable: bool) -> Self {
        Self {
            name: name.into(),
            kind,
            nullable,
            primary_key: false,
            length: None,
            sequence: None,
        }
    }

    /// Mark the column as a primary key column.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_sequence(mut self, name: impl Into<String>) -> Self {
        self.sequence = Some(name.into());
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawColumnType {
    Code(i32),
    Name(String),
}

fn deserialize_kind<'de, D>(deserializer: D) -> std::result::Result<ColumnKind, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawColumnType::deserialize(deserializer)? {
        RawColumnType::Code(code) => classify(code),
        RawColumnType::Name(name) => name.parse().unwrap_or_else(|_| {
            warn!("Unknown column type specified: [{}]", name);
            ColumnKind::Unknown
        }),
    })
}
