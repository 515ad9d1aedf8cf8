//! Model configuration.

use serde::{Deserialize, Serialize};

/// Default rule for entity type and property names.
pub const DEFAULT_IDENTIFIER_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_]*$";

/// Options that shape how a [`Model`](crate::Model) accepts names and how the
/// default validator judges it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Regex every entity type and property name must match.
    /// `None` accepts any non-empty name.
    pub identifier_pattern: Option<String>,
    /// Report entity types without a primary key during validation.
    pub require_primary_key: bool,
    /// Report foreign keys whose paired properties have different value types.
    pub check_foreign_key_types: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            identifier_pattern: Some(DEFAULT_IDENTIFIER_PATTERN.to_string()),
            require_primary_key: true,
            check_foreign_key_types: true,
        }
    }
}

impl ModelConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the identifier pattern.
    pub fn identifier_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.identifier_pattern = Some(pattern.into());
        self
    }

    /// Accept any non-empty name.
    pub fn any_identifier(mut self) -> Self {
        self.identifier_pattern = None;
        self
    }

    /// Require (or not) a primary key on every entity type.
    pub fn require_primary_key(mut self, value: bool) -> Self {
        self.require_primary_key = value;
        self
    }

    /// Check (or not) foreign key value types.
    pub fn check_foreign_key_types(mut self, value: bool) -> Self {
        self.check_foreign_key_types = value;
        self
    }
}
