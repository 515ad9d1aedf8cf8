//! The model: an arena owning every entity type, property, key and foreign key.
//!
//! All graph objects are addressed by small `Copy` handles that index into the
//! model's arenas. Handles give the graph stable identity without reference
//! counting, which keeps a finished `Model` plain data: `Send + Sync`, cheap to
//! share behind an `Arc`, and safe to read from many threads at once.
//!
//! Construction happens through `&mut self` methods; everything is validated
//! before it is stored, so a failed call leaves the model exactly as it was.

use std::collections::HashMap;

use serde_json::json;

use crate::config::ModelConfig;
use crate::entity::{EntityType, Property};
use crate::error::{ConstructionError, Result};
use crate::identifiers::check_identifier;
use crate::key::{ForeignKey, Key};
use crate::types::ValueType;

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(usize);

        impl $name {
            pub(crate) const fn new(index: usize) -> Self {
                Self(index)
            }

            /// Arena index of this handle within its model.
            pub const fn index(self) -> usize {
                self.0
            }
        }
    };
}

handle!(
    /// Handle to an [`EntityType`] in a [`Model`].
    EntityTypeId
);
handle!(
    /// Handle to a [`Property`] in a [`Model`].
    PropertyId
);
handle!(
    /// Handle to a [`Key`] in a [`Model`].
    KeyId
);
handle!(
    /// Handle to a [`ForeignKey`] in a [`Model`].
    ForeignKeyId
);

/// Container of entity types, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct Model {
    pub(crate) config: ModelConfig,
    pub(crate) entity_types: Vec<EntityType>,
    pub(crate) entity_names: HashMap<String, EntityTypeId>,
    pub(crate) properties: Vec<Property>,
    pub(crate) keys: Vec<Key>,
    pub(crate) foreign_keys: Vec<ForeignKey>,
    /// Per property: `(foreign key, position)` for every foreign key listing
    /// the property among its dependents, in foreign-key declaration order.
    pub(crate) dependent_index: Vec<Vec<(ForeignKeyId, usize)>>,
    /// Per key: foreign keys referencing it, in declaration order.
    pub(crate) principal_index: Vec<Vec<ForeignKeyId>>,
}

impl Model {
    /// Create an empty model with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty model with the given configuration.
    pub fn with_config(config: ModelConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Entity type registry
    // ------------------------------------------------------------------

    /// Add a new entity type.
    ///
    /// Fails with `DuplicateName` if the model already has an entity type of
    /// that name.
    pub fn add_entity_type(&mut self, name: impl Into<String>) -> Result<EntityTypeId> {
        let name = name.into();
        check_identifier(&name, self.config.identifier_pattern.as_deref())?;
        if self.entity_names.contains_key(&name) {
            return Err(ConstructionError::DuplicateName {
                scope: "model".to_string(),
                name,
            }
            .into());
        }

        let id = EntityTypeId::new(self.entity_types.len());
        tracing::debug!(entity = %name, id = id.index(), "Adding entity type");
        self.entity_names.insert(name.clone(), id);
        self.entity_types.push(EntityType::new(id, name));
        Ok(id)
    }

    /// Add a property to an entity type.
    ///
    /// Fails with `DuplicateName` if the entity type already has a property of
    /// that name.
    pub fn add_property(
        &mut self,
        entity: EntityTypeId,
        name: impl Into<String>,
        value_type: ValueType,
        nullable: bool,
    ) -> Result<PropertyId> {
        let name = name.into();
        check_identifier(&name, self.config.identifier_pattern.as_deref())?;

        let id = PropertyId::new(self.properties.len());
        let entity_type = self.entity_type_mut(entity)?;
        if entity_type.property_names.contains_key(&name) {
            return Err(ConstructionError::DuplicateName {
                scope: entity_type.name.clone(),
                name,
            }
            .into());
        }

        tracing::debug!(
            entity = %entity_type.name,
            property = %name,
            value_type = %value_type,
            nullable,
            "Adding property"
        );
        entity_type.properties.push(id);
        entity_type.property_names.insert(name.clone(), id);
        self.properties.push(Property {
            id,
            entity_type: entity,
            name,
            value_type,
            nullable,
            generate_value_on_add: false,
        });
        self.dependent_index.push(Vec::new());
        Ok(id)
    }

    /// Mark (or unmark) a property as generating its own value on add.
    ///
    /// This is the one piece of a property that may change after the graph
    /// structure is built.
    pub fn set_generate_value_on_add(&mut self, property: PropertyId, value: bool) -> Result<()> {
        let prop = self
            .properties
            .get_mut(property.index())
            .ok_or(ConstructionError::UnknownProperty(property.index()))?;
        prop.generate_value_on_add = value;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------

    pub fn entity_type(&self, id: EntityTypeId) -> Option<&EntityType> {
        self.entity_types.get(id.index())
    }

    pub fn property(&self, id: PropertyId) -> Option<&Property> {
        self.properties.get(id.index())
    }

    pub fn find_entity_type(&self, name: &str) -> Option<EntityTypeId> {
        self.entity_names.get(name).copied()
    }

    pub fn find_property(&self, entity: EntityTypeId, name: &str) -> Option<PropertyId> {
        self.entity_type(entity)?.find_property(name)
    }

    /// Entity types in declaration order.
    pub fn entity_types(&self) -> impl Iterator<Item = &EntityType> {
        self.entity_types.iter()
    }

    /// Properties of one entity type in declaration order.
    ///
    /// Empty for an unknown handle.
    pub fn properties(&self, entity: EntityTypeId) -> impl Iterator<Item = &Property> {
        self.entity_type(entity)
            .map(|e| e.properties.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|p| self.property(*p))
    }

    /// Total number of properties across all entity types.
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    /// `Entity.Property` display name, used in logs and descriptions.
    pub fn qualified_name(&self, property: PropertyId) -> String {
        match self.property(property) {
            Some(p) => format!(
                "{}.{}",
                self.entity_name(p.entity_type).unwrap_or("?"),
                p.name
            ),
            None => format!("#{}", property.index()),
        }
    }

    pub(crate) fn entity_name(&self, id: EntityTypeId) -> Option<&str> {
        self.entity_type(id).map(EntityType::name)
    }

    pub(crate) fn entity_type_mut(&mut self, id: EntityTypeId) -> Result<&mut EntityType> {
        self.entity_types
            .get_mut(id.index())
            .ok_or_else(|| ConstructionError::UnknownEntityType(format!("#{}", id.index())).into())
    }

    pub(crate) fn require_property(&self, id: PropertyId) -> Result<&Property> {
        self.property(id)
            .ok_or_else(|| ConstructionError::UnknownProperty(id.index()).into())
    }

    // ------------------------------------------------------------------
    // Description
    // ------------------------------------------------------------------

    /// Describe the whole model as JSON, with every reference spelled by name.
    #[must_use]
    pub fn describe(&self) -> serde_json::Value {
        let entity_types: Vec<serde_json::Value> = self
            .entity_types
            .iter()
            .map(|entity| {
                let properties: Vec<serde_json::Value> = self
                    .properties(entity.id)
                    .map(|p| {
                        json!({
                            "name": p.name,
                            "type": p.value_type,
                            "nullable": p.nullable,
                            "generate_value_on_add": p.generate_value_on_add,
                        })
                    })
                    .collect();

                let keys: Vec<serde_json::Value> = entity
                    .keys
                    .iter()
                    .filter_map(|k| self.key(*k))
                    .map(|k| {
                        json!({
                            "properties": self.property_names(k.properties()),
                            "primary": entity.primary_key == Some(k.id()),
                        })
                    })
                    .collect();

                let foreign_keys: Vec<serde_json::Value> = entity
                    .foreign_keys
                    .iter()
                    .filter_map(|fk| self.foreign_key(*fk))
                    .map(|fk| {
                        let principal = self.key(fk.principal_key());
                        json!({
                            "properties": self.property_names(fk.properties()),
                            "principal_entity": self.entity_name(fk.principal_entity_type()),
                            "principal_properties": principal
                                .map(|k| self.property_names(k.properties()))
                                .unwrap_or_default(),
                            "required": fk.is_required(self),
                        })
                    })
                    .collect();

                json!({
                    "name": entity.name,
                    "properties": properties,
                    "keys": keys,
                    "foreign_keys": foreign_keys,
                })
            })
            .collect();

        json!({ "entity_types": entity_types })
    }

    fn property_names(&self, ids: &[PropertyId]) -> Vec<&str> {
        ids.iter()
            .filter_map(|p| self.property(*p))
            .map(Property::name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_add_entity_type_and_lookup() {
        let mut model = Model::new();
        let blog = model.add_entity_type("Blog").unwrap();
        let post = model.add_entity_type("Post").unwrap();

        assert_eq!(model.find_entity_type("Blog"), Some(blog));
        assert_eq!(model.find_entity_type("Post"), Some(post));
        assert_eq!(model.find_entity_type("Comment"), None);
        let names: Vec<&str> = model.entity_types().map(EntityType::name).collect();
        assert_eq!(names, vec!["Blog", "Post"]);
    }

    #[test]
    fn test_duplicate_entity_type_name() {
        let mut model = Model::new();
        model.add_entity_type("Blog").unwrap();
        let err = model.add_entity_type("Blog").unwrap_err();
        assert_eq!(
            err,
            Error::Construction(ConstructionError::DuplicateName {
                scope: "model".to_string(),
                name: "Blog".to_string(),
            })
        );
        assert_eq!(model.entity_types().count(), 1);
    }

    #[test]
    fn test_duplicate_property_name_is_scoped_to_entity() {
        let mut model = Model::new();
        let blog = model.add_entity_type("Blog").unwrap();
        let post = model.add_entity_type("Post").unwrap();
        model.add_property(blog, "Id", ValueType::Int32, false).unwrap();
        model.add_property(post, "Id", ValueType::Int32, false).unwrap();

        let err = model
            .add_property(blog, "Id", ValueType::Int64, true)
            .unwrap_err();
        assert_eq!(
            err,
            Error::Construction(ConstructionError::DuplicateName {
                scope: "Blog".to_string(),
                name: "Id".to_string(),
            })
        );
        assert_eq!(model.property_count(), 2);
    }

    #[test]
    fn test_property_attributes() {
        let mut model = Model::new();
        let blog = model.add_entity_type("Blog").unwrap();
        let url = model.add_property(blog, "Url", ValueType::String, true).unwrap();

        let p = model.property(url).unwrap();
        assert_eq!(p.name(), "Url");
        assert_eq!(p.entity_type(), blog);
        assert_eq!(p.value_type(), &ValueType::String);
        assert!(p.is_nullable());
        assert!(!p.generate_value_on_add());
        assert_eq!(model.find_property(blog, "Url"), Some(url));
        assert_eq!(model.qualified_name(url), "Blog.Url");
    }

    #[test]
    fn test_set_generate_value_on_add() {
        let mut model = Model::new();
        let blog = model.add_entity_type("Blog").unwrap();
        let id = model.add_property(blog, "Id", ValueType::Int32, false).unwrap();

        model.set_generate_value_on_add(id, true).unwrap();
        assert!(model.property(id).unwrap().generate_value_on_add());
        model.set_generate_value_on_add(id, false).unwrap();
        assert!(!model.property(id).unwrap().generate_value_on_add());

        let err = model
            .set_generate_value_on_add(PropertyId::new(99), true)
            .unwrap_err();
        assert_eq!(err, Error::Construction(ConstructionError::UnknownProperty(99)));
    }

    #[test]
    fn test_unknown_entity_handle() {
        let mut model = Model::new();
        let err = model
            .add_property(EntityTypeId::new(3), "Id", ValueType::Int32, false)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Construction(ConstructionError::UnknownEntityType(_))
        ));
        assert_eq!(model.properties(EntityTypeId::new(3)).count(), 0);
    }

    #[test]
    fn test_identifier_rule_applies() {
        let mut model = Model::new();
        assert!(matches!(
            model.add_entity_type("Order Details"),
            Err(Error::Construction(ConstructionError::InvalidIdentifier { .. }))
        ));

        let mut relaxed = Model::with_config(ModelConfig::new().any_identifier());
        assert!(relaxed.add_entity_type("Order Details").is_ok());
    }

    #[test]
    fn test_describe() {
        let mut model = Model::new();
        let blog = model.add_entity_type("Blog").unwrap();
        let blog_id = model.add_property(blog, "Id", ValueType::Int32, false).unwrap();
        model.set_primary_key(blog, &[blog_id]).unwrap();
        model.set_generate_value_on_add(blog_id, true).unwrap();

        let post = model.add_entity_type("Post").unwrap();
        let post_blog = model
            .add_property(post, "BlogId", ValueType::Int32, false)
            .unwrap();
        let blog_key = model.primary_key(blog).unwrap();
        model.add_foreign_key(&[post_blog], blog_key).unwrap();

        let json = model.describe();
        let entities = &json["entity_types"];
        assert_eq!(entities[0]["name"], "Blog");
        assert_eq!(entities[0]["properties"][0]["type"], "int32");
        assert_eq!(entities[0]["properties"][0]["generate_value_on_add"], true);
        assert_eq!(entities[0]["keys"][0]["primary"], true);
        assert_eq!(entities[1]["foreign_keys"][0]["principal_entity"], "Blog");
        assert_eq!(entities[1]["foreign_keys"][0]["principal_properties"][0], "Id");
        assert_eq!(entities[1]["foreign_keys"][0]["required"], true);
    }
}
