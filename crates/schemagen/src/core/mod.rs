//! Core schema abstractions.
//!
//! - [`schema`]: database, table, view, column and sequence model
//! - [`identifier`]: name checks and class/property name derivation
//! - [`loader`]: YAML/JSON schema documents
//! - [`validation`]: uniqueness rules enforced before generation

pub mod identifier;
pub mod loader;
pub mod schema;
pub mod validation;

pub use identifier::{derive_class_identifier, derive_property_name, java_identifier};
pub use schema::{Column, Schema, Table, View};
pub use validation::{collect_violations, validate};
