//! Entity types and their properties.

use std::collections::HashMap;

use crate::model::{EntityTypeId, ForeignKeyId, KeyId, PropertyId};
use crate::types::ValueType;

/// A named record type within a model.
///
/// Owns its properties, keys and foreign keys by handle; the objects
/// themselves live in the owning [`Model`](crate::Model)'s arenas.
#[derive(Debug, Clone)]
pub struct EntityType {
    pub(crate) id: EntityTypeId,
    pub(crate) name: String,
    pub(crate) properties: Vec<PropertyId>,
    pub(crate) property_names: HashMap<String, PropertyId>,
    pub(crate) keys: Vec<KeyId>,
    pub(crate) primary_key: Option<KeyId>,
    pub(crate) foreign_keys: Vec<ForeignKeyId>,
}

impl EntityType {
    pub(crate) fn new(id: EntityTypeId, name: String) -> Self {
        Self {
            id,
            name,
            properties: Vec::new(),
            property_names: HashMap::new(),
            keys: Vec::new(),
            primary_key: None,
            foreign_keys: Vec::new(),
        }
    }

    pub fn id(&self) -> EntityTypeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Properties in declaration order.
    pub fn properties(&self) -> &[PropertyId] {
        &self.properties
    }

    /// Candidate keys in declaration order (the primary key included).
    pub fn keys(&self) -> &[KeyId] {
        &self.keys
    }

    pub fn primary_key(&self) -> Option<KeyId> {
        self.primary_key
    }

    /// Outgoing foreign keys in declaration order.
    pub fn foreign_keys(&self) -> &[ForeignKeyId] {
        &self.foreign_keys
    }

    /// Look up one of this entity type's properties by name.
    pub fn find_property(&self, name: &str) -> Option<PropertyId> {
        self.property_names.get(name).copied()
    }
}

/// A named, typed attribute of an entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub(crate) id: PropertyId,
    pub(crate) entity_type: EntityTypeId,
    pub(crate) name: String,
    pub(crate) value_type: ValueType,
    pub(crate) nullable: bool,
    pub(crate) generate_value_on_add: bool,
}

impl Property {
    pub fn id(&self) -> PropertyId {
        self.id
    }

    /// The entity type that declares this property.
    pub fn entity_type(&self) -> EntityTypeId {
        self.entity_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value_type(&self) -> &ValueType {
        &self.value_type
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Whether a value is produced for this property when a new entity is added
    /// (identity columns, sequences, client-side generators).
    pub fn generate_value_on_add(&self) -> bool {
        self.generate_value_on_add
    }
}
