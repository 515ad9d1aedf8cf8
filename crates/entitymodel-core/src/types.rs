//! Scalar value types carried by properties.

use serde::{Deserialize, Serialize};

/// The value type of a property.
///
/// The metadata graph never inspects values; the type is carried so that
/// validators and downstream layers can compare dependent and principal
/// properties.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Bool,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Decimal,
    String,
    Bytes,
    Guid,
    #[serde(rename = "datetime")]
    DateTime,
    /// Any type not covered above, identified by name.
    Custom(String),
}

impl ValueType {
    /// Stable lower-case name of this type.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            ValueType::Bool => "bool",
            ValueType::Int16 => "int16",
            ValueType::Int32 => "int32",
            ValueType::Int64 => "int64",
            ValueType::Float32 => "float32",
            ValueType::Float64 => "float64",
            ValueType::Decimal => "decimal",
            ValueType::String => "string",
            ValueType::Bytes => "bytes",
            ValueType::Guid => "guid",
            ValueType::DateTime => "datetime",
            ValueType::Custom(name) => name.as_str(),
        }
    }

    /// Parse a type name (case-insensitive).
    ///
    /// Names that are not built in become `Custom` with the name as given.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "bool" | "boolean" => ValueType::Bool,
            "int16" | "short" => ValueType::Int16,
            "int32" | "int" => ValueType::Int32,
            "int64" | "long" => ValueType::Int64,
            "float32" | "float" => ValueType::Float32,
            "float64" | "double" => ValueType::Float64,
            "decimal" => ValueType::Decimal,
            "string" => ValueType::String,
            "bytes" => ValueType::Bytes,
            "guid" | "uuid" => ValueType::Guid,
            "datetime" => ValueType::DateTime,
            _ => ValueType::Custom(s.to_string()),
        }
    }

    /// Whether this is one of the integral types.
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, ValueType::Int16 | ValueType::Int32 | ValueType::Int64)
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
