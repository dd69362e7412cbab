//! JDBC type-code classification.
//!
//! Schema documents may carry raw `java.sql.Types` codes instead of kind
//! names. Codes the generator does not know are downgraded to
//! [`ColumnKind::Unknown`] with a warning; classification never fails.

use tracing::warn;

use super::ColumnKind;

/// `java.sql.Types` constants understood by [`classify`].
pub mod jdbc_types {
    pub const BIT: i32 = -7;
    pub const TINYINT: i32 = -6;
    pub const SMALLINT: i32 = 5;
    pub const INTEGER: i32 = 4;
    pub const BIGINT: i32 = -5;
    pub const REAL: i32 = 7;
    pub const DOUBLE: i32 = 8;
    pub const NUMERIC: i32 = 2;
    pub const DECIMAL: i32 = 3;
    pub const CHAR: i32 = 1;
    pub const VARCHAR: i32 = 12;
    pub const DATE: i32 = 91;
    pub const TIME: i32 = 92;
    pub const TIMESTAMP: i32 = 93;
    pub const JAVA_OBJECT: i32 = 2000;
    pub const BLOB: i32 = 2004;
    pub const CLOB: i32 = 2005;
}

/// Map a JDBC type code to a column kind.
pub fn classify(code: i32) -> ColumnKind {
    match code {
        jdbc_types::BIT => ColumnKind::Bit,
        jdbc_types::TINYINT => ColumnKind::TinyInt,
        jdbc_types::SMALLINT => ColumnKind::SmallInt,
        jdbc_types::INTEGER => ColumnKind::Integer,
        jdbc_types::BIGINT => ColumnKind::BigInt,
        jdbc_types::REAL => ColumnKind::Real,
        jdbc_types::DOUBLE => ColumnKind::Double,
        jdbc_types::CHAR => ColumnKind::Char,
        jdbc_types::VARCHAR => ColumnKind::Varchar,
        jdbc_types::DATE => ColumnKind::Date,
        jdbc_types::TIME => ColumnKind::Time,
        jdbc_types::TIMESTAMP => ColumnKind::Timestamp,
        jdbc_types::JAVA_OBJECT => ColumnKind::JavaObject,
        jdbc_types::DECIMAL => ColumnKind::Decimal,
        jdbc_types::NUMERIC => ColumnKind::Numeric,
        jdbc_types::BLOB => ColumnKind::Blob,
        jdbc_types::CLOB => ColumnKind::Clob,
        _ => {
            warn!("Unknown JDBC type code specified: [{}]", code);
            ColumnKind::Unknown
        }
    }
}
