//! Error types for the generator library.

use thiserror::Error;

use crate::typemap::ColumnKind;

/// Exit code for configuration problems (bad YAML, missing fields).
pub const EXIT_CONFIG_ERROR: u8 = 1;
/// Exit code for schema documents that fail to load or validate.
pub const EXIT_SCHEMA_ERROR: u8 = 2;
/// Exit code when one or more tables failed to generate.
pub const EXIT_GENERATION_ERROR: u8 = 3;
/// Exit code for file system errors.
pub const EXIT_IO_ERROR: u8 = 7;
/// Exit code for an interrupted run.
pub const EXIT_CANCELLED: u8 = 130;

/// Main error type for generation operations.
#[derive(Error, Debug)]
pub enum GenError {
    /// The column kind has no type descriptor (only `UNKNOWN`).
    #[error("No type mapping for column kind {kind}")]
    NoMapping { kind: ColumnKind },

    /// The column kind is recognised but cannot be generated (MONEY, FRACTION).
    #[error("Unsupported column kind {kind}")]
    UnsupportedColumnKind { kind: ColumnKind },

    /// Two tables share the exact same name.
    #[error("Table named [{table}] already exists in database [{database}]")]
    DuplicateTableName { table: String, database: String },

    /// A sequence name is declared more than once across the schema.
    #[error("Sequence named [{sequence}] already exists in database [{database}]")]
    DuplicateSequenceName { sequence: String, database: String },

    /// A view name collides with a table or another view.
    #[error("View named [{view}] already exists in database [{database}]")]
    DuplicateViewOrTableName { view: String, database: String },

    /// A column name is repeated inside one table or view.
    #[error("Column named [{column}] already exists in table [{table}]")]
    DuplicateColumnName { table: String, column: String },

    /// A table or view fails its own structural checks.
    #[error("Invalid table [{table}]: {message}")]
    InvalidTable { table: String, message: String },

    /// The emitter failed to produce the artifact for a table.
    #[error("Emitter failed for table {table}: {message}")]
    EmitterFailure { table: String, message: String },

    /// Configuration error (invalid YAML, missing fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Schema document could not be read or parsed.
    #[error("Schema document error: {0}")]
    Schema(String),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generation was cancelled (SIGINT, fail-fast, etc.)
    #[error("Generation cancelled")]
    Cancelled,
}

impl GenError {
    /// Create an EmitterFailure error for a table.
    pub fn emitter(table: impl Into<String>, message: impl Into<String>) -> Self {
        GenError::EmitterFailure {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Create an InvalidTable error.
    pub fn invalid_table(table: impl Into<String>, message: impl Into<String>) -> Self {
        GenError::InvalidTable {
            table: table.into(),
            message: message.into(),
        }
    }

    /// True for the structural violations reported by schema validation.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            GenError::DuplicateTableName { .. }
                | GenError::DuplicateSequenceName { .. }
                | GenError::DuplicateViewOrTableName { .. }
                | GenError::DuplicateColumnName { .. }
                | GenError::InvalidTable { .. }
        )
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            GenError::Config(_) | GenError::Yaml(_) => EXIT_CONFIG_ERROR,
            GenError::Schema(_) | GenError::Json(_) => EXIT_SCHEMA_ERROR,
            GenError::Io(_) => EXIT_IO_ERROR,
            GenError::Cancelled => EXIT_CANCELLED,
            e if e.is_validation() => EXIT_SCHEMA_ERROR,
            _ => EXIT_GENERATION_ERROR,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for generator operations.
pub type Result<T> = std::result::Result<T, GenError>;
