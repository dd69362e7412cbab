//! Type mapping between schema column kinds and generated field types.
//!
//! Every [`ColumnKind`] except [`ColumnKind::Unknown`] owns exactly one
//! [`TypeDescriptor`]. Descriptors live in a process-wide table that is built
//! once on first use and never mutated afterwards.
//!
//! Field types are always decided from the descriptor *and* the column's
//! nullability: a nullable column can never use the primitive form.

mod jdbc;

pub use jdbc::{classify, jdbc_types};

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use serde::Serialize;

use crate::error::{GenError, Result};

/// Closed set of schema column kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColumnKind {
    Unknown,
    Boolean,
    Bit,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Real,
    Float,
    Double,
    Char,
    Varchar,
    LongVarchar,
    Date,
    Time,
    Timestamp,
    #[serde(rename = "JAVA_OBJECT")]
    JavaObject,
    Decimal,
    Numeric,
    BigDecimal,
    BigInteger,
    Blob,
    Clob,
    /// Placeholder, not generated.
    Money,
    /// Placeholder, not generated.
    Fraction,
}

impl ColumnKind {
    /// Number of kinds, `Unknown` included.
    pub const COUNT: usize = 25;

    /// All kinds in declaration order.
    pub const ALL: [ColumnKind; Self::COUNT] = [
        ColumnKind::Unknown,
        ColumnKind::Boolean,
        ColumnKind::Bit,
        ColumnKind::TinyInt,
        ColumnKind::SmallInt,
        ColumnKind::Integer,
        ColumnKind::BigInt,
        ColumnKind::Real,
        ColumnKind::Float,
        ColumnKind::Double,
        ColumnKind::Char,
        ColumnKind::Varchar,
        ColumnKind::LongVarchar,
        ColumnKind::Date,
        ColumnKind::Time,
        ColumnKind::Timestamp,
        ColumnKind::JavaObject,
        ColumnKind::Decimal,
        ColumnKind::Numeric,
        ColumnKind::BigDecimal,
        ColumnKind::BigInteger,
        ColumnKind::Blob,
        ColumnKind::Clob,
        ColumnKind::Money,
        ColumnKind::Fraction,
    ];

    /// Schema-document name of the kind (e.g. "VARCHAR").
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Unknown => "UNKNOWN",
            ColumnKind::Boolean => "BOOLEAN",
            ColumnKind::Bit => "BIT",
            ColumnKind::TinyInt => "TINYINT",
            ColumnKind::SmallInt => "SMALLINT",
            ColumnKind::Integer => "INTEGER",
            ColumnKind::BigInt => "BIGINT",
            ColumnKind::Real => "REAL",
            ColumnKind::Float => "FLOAT",
            ColumnKind::Double => "DOUBLE",
            ColumnKind::Char => "CHAR",
            ColumnKind::Varchar => "VARCHAR",
            ColumnKind::LongVarchar => "LONGVARCHAR",
            ColumnKind::Date => "DATE",
            ColumnKind::Time => "TIME",
            ColumnKind::Timestamp => "TIMESTAMP",
            ColumnKind::JavaObject => "JAVA_OBJECT",
            ColumnKind::Decimal => "DECIMAL",
            ColumnKind::Numeric => "NUMERIC",
            ColumnKind::BigDecimal => "BIGDECIMAL",
            ColumnKind::BigInteger => "BIGINTEGER",
            ColumnKind::Blob => "BLOB",
            ColumnKind::Clob => "CLOB",
            ColumnKind::Money => "MONEY",
            ColumnKind::Fraction => "FRACTION",
        }
    }

    /// Numeric kinds. TINYINT is numeric even though it maps to `boolean`;
    /// FLOAT is deliberately absent.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ColumnKind::Integer
                | ColumnKind::Decimal
                | ColumnKind::Double
                | ColumnKind::Numeric
                | ColumnKind::Real
                | ColumnKind::SmallInt
                | ColumnKind::BigInt
                | ColumnKind::TinyInt
        )
    }

    /// Kinds that have a descriptor but must never reach a generated field.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, ColumnKind::Money | ColumnKind::Fraction)
    }

    /// The kind's descriptor, or `None` for `Unknown`.
    pub fn descriptor(&self) -> Option<&'static TypeDescriptor> {
        REGISTRY[*self as usize].as_ref()
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnKind {
    type Err = GenError;

    /// Case-insensitive parse of a kind name.
    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        ColumnKind::ALL
            .iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(name))
            .copied()
            .ok_or_else(|| GenError::Schema(format!("unknown column type '{}'", s)))
    }
}

/// Runtime class handle used by reflection-style emitters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RuntimeType {
    PrimitiveBoolean,
    Boolean,
    PrimitiveInt,
    Integer,
    PrimitiveLong,
    Long,
    PrimitiveFloat,
    Float,
    PrimitiveDouble,
    Double,
    PrimitiveChar,
    Character,
    String,
    Date,
    Time,
    Object,
    BigDecimal,
    BigInteger,
    ByteArray,
    BoxedByteArray,
    Void,
}

impl RuntimeType {
    /// Fully qualified class name.
    pub fn class_name(&self) -> &'static str {
        match self {
            RuntimeType::PrimitiveBoolean => "boolean",
            RuntimeType::Boolean => "java.lang.Boolean",
            RuntimeType::PrimitiveInt => "int",
            RuntimeType::Integer => "java.lang.Integer",
            RuntimeType::PrimitiveLong => "long",
            RuntimeType::Long => "java.lang.Long",
            RuntimeType::PrimitiveFloat => "float",
            RuntimeType::Float => "java.lang.Float",
            RuntimeType::PrimitiveDouble => "double",
            RuntimeType::Double => "java.lang.Double",
            RuntimeType::PrimitiveChar => "char",
            RuntimeType::Character => "java.lang.Character",
            RuntimeType::String => "java.lang.String",
            RuntimeType::Date => "java.util.Date",
            RuntimeType::Time => "java.sql.Time",
            RuntimeType::Object => "java.lang.Object",
            RuntimeType::BigDecimal => "java.math.BigDecimal",
            RuntimeType::BigInteger => "java.math.BigInteger",
            RuntimeType::ByteArray => "byte[]",
            RuntimeType::BoxedByteArray => "java.lang.Byte[]",
            RuntimeType::Void => "java.lang.Void",
        }
    }

    /// True for language primitives (and primitive arrays).
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            RuntimeType::PrimitiveBoolean
                | RuntimeType::PrimitiveInt
                | RuntimeType::PrimitiveLong
                | RuntimeType::PrimitiveFloat
                | RuntimeType::PrimitiveDouble
                | RuntimeType::PrimitiveChar
                | RuntimeType::ByteArray
        )
    }
}

impl fmt::Display for RuntimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

/// Target-type description attached to a column kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeDescriptor {
    /// Type text used for non-nullable fields (e.g. "int").
    pub primitive_type_name: &'static str,
    /// Whether the non-nullable form is a language primitive.
    pub is_primitive: bool,
    /// Mirrors [`ColumnKind::is_numeric`].
    pub is_numeric: bool,
    /// Value semantics: safe to share without defensive copies.
    pub is_immutable: bool,
    pub primitive_runtime: RuntimeType,
    pub boxed_runtime: RuntimeType,
    /// Type text used for nullable fields (e.g. "Integer").
    pub boxed_type_name: &'static str,
}

impl TypeDescriptor {
    /// Type text for a field with the given nullability.
    pub fn type_name(&self, nullable: bool) -> &'static str {
        if nullable {
            self.boxed_type_name
        } else {
            self.primitive_type_name
        }
    }

    /// Runtime handle for a field with the given nullability.
    pub fn runtime_type(&self, nullable: bool) -> RuntimeType {
        if nullable {
            self.boxed_runtime
        } else {
            self.primitive_runtime
        }
    }
}

static REGISTRY: LazyLock<[Option<TypeDescriptor>; ColumnKind::COUNT]> =
    LazyLock::new(|| ColumnKind::ALL.map(build_descriptor));

fn build_descriptor(kind: ColumnKind) -> Option<TypeDescriptor> {
    use RuntimeType as R;

    let (primitive_name, is_primitive, is_immutable, primitive_rt, boxed_rt, boxed_name) =
        match kind {
            ColumnKind::Unknown => return None,
            ColumnKind::Boolean | ColumnKind::Bit | ColumnKind::TinyInt => {
                ("boolean", true, true, R::PrimitiveBoolean, R::Boolean, "Boolean")
            }
            ColumnKind::SmallInt | ColumnKind::Integer => {
                ("int", true, true, R::PrimitiveInt, R::Integer, "Integer")
            }
            ColumnKind::BigInt => ("long", true, true, R::PrimitiveLong, R::Long, "Long"),
            ColumnKind::Real | ColumnKind::Float | ColumnKind::Decimal | ColumnKind::Numeric => {
                ("float", true, true, R::PrimitiveFloat, R::Float, "Float")
            }
            ColumnKind::Double => ("double", true, true, R::PrimitiveDouble, R::Double, "Double"),
            ColumnKind::Char => ("char", true, true, R::PrimitiveChar, R::Character, "Character"),
            ColumnKind::Varchar | ColumnKind::LongVarchar | ColumnKind::Clob => {
                ("String", false, true, R::String, R::String, "String")
            }
            ColumnKind::Date | ColumnKind::Timestamp => {
                ("java.util.Date", false, false, R::Date, R::Date, "java.util.Date")
            }
            ColumnKind::Time => ("Time", false, false, R::Time, R::Time, "Time"),
            ColumnKind::JavaObject => ("Object", false, false, R::Object, R::Object, "Object"),
            ColumnKind::BigDecimal => (
                "java.math.BigDecimal",
                false,
                true,
                R::BigDecimal,
                R::BigDecimal,
                "java.math.BigDecimal",
            ),
            ColumnKind::BigInteger => (
                "java.math.BigInteger",
                false,
                true,
                R::BigInteger,
                R::BigInteger,
                "java.math.BigInteger",
            ),
            ColumnKind::Blob => ("byte[]", true, false, R::ByteArray, R::BoxedByteArray, "Byte[]"),
            ColumnKind::Money => (
                "com.jdc.datatypes.Money",
                false,
                true,
                R::Void,
                R::Void,
                "com.jdc.datatypes.Money",
            ),
            ColumnKind::Fraction => (
                "com.jdc.datatypes.Fraction",
                false,
                true,
                R::Void,
                R::Void,
                "com.jdc.datatypes.Fraction",
            ),
        };

    Some(TypeDescriptor {
        primitive_type_name: primitive_name,
        is_primitive,
        is_numeric: kind.is_numeric(),
        is_immutable,
        primitive_runtime: primitive_rt,
        boxed_runtime: boxed_rt,
        boxed_type_name: boxed_name,
    })
}

/// Look up the descriptor for a kind. Fails with `NoMapping` for `Unknown`.
pub fn lookup(kind: ColumnKind) -> Result<&'static TypeDescriptor> {
    kind.descriptor().ok_or(GenError::NoMapping { kind })
}

fn supported(kind: ColumnKind) -> Result<&'static TypeDescriptor> {
    let descriptor = lookup(kind)?;
    if kind.is_unsupported() {
        return Err(GenError::UnsupportedColumnKind { kind });
    }
    Ok(descriptor)
}

/// Declared type text for a field: primitive form unless nullable.
pub fn resolved_type(kind: ColumnKind, nullable: bool) -> Result<&'static str> {
    Ok(supported(kind)?.type_name(nullable))
}

/// Runtime handle for a field, chosen by the same rule as [`resolved_type`].
pub fn resolved_runtime_type(kind: ColumnKind, nullable: bool) -> Result<RuntimeType> {
    Ok(supported(kind)?.runtime_type(nullable))
}

/// A nullable field is never reported as primitive.
pub fn is_primitive_representation(kind: ColumnKind, nullable: bool) -> bool {
    !nullable && kind.descriptor().is_some_and(|d| d.is_primitive)
}

/// Immutability does not depend on nullability.
pub fn is_immutable(kind: ColumnKind) -> bool {
    kind.descriptor().is_some_and(|d| d.is_immutable)
}

pub fn is_numeric(kind: ColumnKind) -> bool {
    kind.is_numeric()
}
