//! SQL column type to target type mapping

use std::fmt;

use serde::Serialize;

use crate::schema::Column;

/// A backend (C#) type for an entity property
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TargetType {
    Byte,
    Int16,
    Int32,
    Int64,
    Bool,
    Decimal,
    Double,
    DateTime,
    Date,
    Time,
    DateTimeOffset,
    Guid,
    String,
    Bytes,
    /// Nullable value type wrapper
    Nullable(Box<TargetType>),
}

impl TargetType {
    /// Get the type string for code generation
    pub fn to_type_string(&self) -> String {
        match self {
            TargetType::Byte => "byte".to_string(),
            TargetType::Int16 => "short".to_string(),
            TargetType::Int32 => "int".to_string(),
            TargetType::Int64 => "long".to_string(),
            TargetType::Bool => "bool".to_string(),
            TargetType::Decimal => "decimal".to_string(),
            TargetType::Double => "double".to_string(),
            TargetType::DateTime => "DateTime".to_string(),
            TargetType::Date => "DateOnly".to_string(),
            TargetType::Time => "TimeOnly".to_string(),
            TargetType::DateTimeOffset => "DateTimeOffset".to_string(),
            TargetType::Guid => "Guid".to_string(),
            TargetType::String => "string".to_string(),
            TargetType::Bytes => "byte[]".to_string(),
            TargetType::Nullable(inner) => format!("{}?", inner.to_type_string()),
        }
    }

    /// Get the inner type if this is nullable
    pub fn inner_type(&self) -> &TargetType {
        match self {
            TargetType::Nullable(inner) => inner,
            _ => self,
        }
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self, TargetType::Nullable(_))
    }

    /// Reference types carry nullability themselves and never get a `?`
    pub fn is_value_type(&self) -> bool {
        !matches!(
            self.inner_type(),
            TargetType::String | TargetType::Bytes
        )
    }

    /// Coarse over-the-wire representation
    pub fn wire_type(&self) -> WireType {
        match self.inner_type() {
            TargetType::Byte
            | TargetType::Int16
            | TargetType::Int32
            | TargetType::Int64
            | TargetType::Decimal
            | TargetType::Double => WireType::Number,
            TargetType::Bool => WireType::Boolean,
            TargetType::DateTime
            | TargetType::Date
            | TargetType::Time
            | TargetType::DateTimeOffset => WireType::Date,
            TargetType::Guid | TargetType::String | TargetType::Bytes => WireType::String,
            TargetType::Nullable(inner) => inner.wire_type(),
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_type_string())
    }
}

/// The four buckets the front-end artifacts distinguish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WireType {
    Number,
    Boolean,
    Date,
    String,
}

impl WireType {
    /// TypeScript type name
    pub fn ts_type(&self) -> &'static str {
        match self {
            WireType::Number => "number",
            WireType::Boolean => "boolean",
            WireType::Date => "Date",
            WireType::String => "string",
        }
    }

    /// Initial form control value
    pub fn default_literal(&self) -> &'static str {
        match self {
            WireType::Number => "0",
            WireType::Boolean => "false",
            WireType::Date | WireType::String => "''",
        }
    }
}

/// Resolve SQL data types to target and wire types
pub struct TypeResolver;

impl TypeResolver {
    /// Get the target type for a column.
    ///
    /// Primary keys are never nullable, and reference types never get the
    /// nullable wrapper.
    pub fn resolve(column: &Column) -> TargetType {
        let base_type = Self::resolve_base_type(&column.raw_type);

        if column.nullable && !column.is_primary_key && base_type.is_value_type() {
            TargetType::Nullable(Box::new(base_type))
        } else {
            base_type
        }
    }

    /// Get the wire type for a column
    pub fn wire_type(column: &Column) -> WireType {
        Self::resolve_base_type(&column.raw_type).wire_type()
    }

    /// Resolve the base type (without nullable wrapper)
    pub fn resolve_base_type(raw_type: &str) -> TargetType {
        let lower = raw_type.to_lowercase();
        let base = lower.split('(').next().unwrap_or("").trim();

        match base {
            "tinyint" => TargetType::Byte,
            "smallint" => TargetType::Int16,
            "int" | "integer" | "mediumint" => TargetType::Int32,
            "bigint" => TargetType::Int64,
            "bit" | "bool" | "boolean" => TargetType::Bool,
            "decimal" | "numeric" | "money" | "smallmoney" => TargetType::Decimal,
            "float" | "real" | "double" | "double precision" => TargetType::Double,
            "datetime" | "datetime2" | "smalldatetime" => TargetType::DateTime,
            "date" => TargetType::Date,
            "time" => TargetType::Time,
            "datetimeoffset" => TargetType::DateTimeOffset,
            "uniqueidentifier" | "uuid" => TargetType::Guid,
            "varchar" | "nvarchar" | "char" | "nchar" | "text" | "ntext" | "character"
            | "character varying" | "tinytext" | "mediumtext" | "longtext" => TargetType::String,
            "varbinary" | "binary" | "image" | "blob" | "longblob" => TargetType::Bytes,
            // Default fallback
            _ => TargetType::String,
        }
    }
}
