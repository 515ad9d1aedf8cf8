//! Name-addressed model construction.
//!
//! `ModelBuilder` lets model definitions refer to entity types and properties
//! by name instead of threading handles around, and finds or creates the keys
//! that foreign keys point at.

use entitymodel_core::{
    ConstructionError, EntityTypeId, ForeignKeyId, KeyId, Model, ModelConfig, PropertyId, Result,
    ValueType,
};

/// Builds a [`Model`] using entity and property names.
///
/// # Example
///
/// ```
/// use entitymodel::{ModelBuilder, ValueType};
///
/// let mut builder = ModelBuilder::new();
/// builder.entity("Blog")?;
/// builder.property("Blog", "Id", ValueType::Int32, false)?;
/// builder.primary_key("Blog", &["Id"])?;
/// builder.generate_value_on_add("Blog", "Id", true)?;
///
/// builder.entity("Post")?;
/// builder.property("Post", "Id", ValueType::Int32, false)?;
/// builder.property("Post", "BlogId", ValueType::Int32, false)?;
/// builder.primary_key("Post", &["Id"])?;
/// builder.foreign_key("Post", &["BlogId"], "Blog", &["Id"])?;
///
/// let model = builder.build();
/// let blog = model.find_entity_type("Blog").unwrap();
/// let post = model.find_entity_type("Post").unwrap();
/// let blog_id = model.find_property(blog, "Id").unwrap();
/// let post_blog_id = model.find_property(post, "BlogId").unwrap();
/// assert_eq!(model.generation_property(post_blog_id), Some(blog_id));
/// # Ok::<(), entitymodel::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct ModelBuilder {
    model: Model,
}

impl ModelBuilder {
    /// Start an empty model with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an empty model with the given configuration.
    pub fn with_config(config: ModelConfig) -> Self {
        Self {
            model: Model::with_config(config),
        }
    }

    /// Get the entity type called `name`, adding it if it does not exist.
    pub fn entity(&mut self, name: &str) -> Result<EntityTypeId> {
        match self.model.find_entity_type(name) {
            Some(id) => Ok(id),
            None => self.model.add_entity_type(name),
        }
    }

    /// Add a property to an existing entity type.
    pub fn property(
        &mut self,
        entity: &str,
        name: &str,
        value_type: ValueType,
        nullable: bool,
    ) -> Result<PropertyId> {
        let entity = self.require_entity(entity)?;
        self.model.add_property(entity, name, value_type, nullable)
    }

    /// Add a candidate key over the named properties.
    pub fn key(&mut self, entity: &str, properties: &[&str]) -> Result<KeyId> {
        let entity = self.require_entity(entity)?;
        let properties = self.resolve_properties(entity, properties)?;
        self.model.add_key(entity, &properties)
    }

    /// Set the primary key to the named properties.
    pub fn primary_key(&mut self, entity: &str, properties: &[&str]) -> Result<KeyId> {
        let entity = self.require_entity(entity)?;
        let properties = self.resolve_properties(entity, properties)?;
        self.model.set_primary_key(entity, &properties)
    }

    /// Add a foreign key from `entity.properties` to
    /// `principal_entity.principal_properties`.
    ///
    /// The principal key is the existing key over exactly those properties if
    /// there is one, otherwise a new candidate key is added for it.
    pub fn foreign_key(
        &mut self,
        entity: &str,
        properties: &[&str],
        principal_entity: &str,
        principal_properties: &[&str],
    ) -> Result<ForeignKeyId> {
        let dependent = self.require_entity(entity)?;
        let principal = self.require_entity(principal_entity)?;
        let dependents = self.resolve_properties(dependent, properties)?;
        let principals = self.resolve_properties(principal, principal_properties)?;

        if dependents.len() != principals.len() {
            return Err(ConstructionError::CardinalityMismatch {
                dependent: dependents.len(),
                principal: principals.len(),
            }
            .into());
        }

        let existing = self
            .model
            .keys(principal)
            .find(|k| k.properties() == principals.as_slice())
            .map(|k| k.id());
        let key = match existing {
            Some(key) => key,
            None => self.model.add_key(principal, &principals)?,
        };
        self.model.add_foreign_key(&dependents, key)
    }

    /// Mark a property as generating its value on add.
    pub fn generate_value_on_add(&mut self, entity: &str, property: &str, value: bool) -> Result<()> {
        let entity = self.require_entity(entity)?;
        let property = self.resolve_property(entity, property)?;
        self.model.set_generate_value_on_add(property, value)
    }

    /// The model built so far.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Direct access to the underlying model for handle-based construction.
    pub fn model_mut(&mut self) -> &mut Model {
        &mut self.model
    }

    /// Finish building.
    pub fn build(self) -> Model {
        self.model
    }

    fn require_entity(&self, name: &str) -> Result<EntityTypeId> {
        self.model
            .find_entity_type(name)
            .ok_or_else(|| ConstructionError::UnknownEntityType(name.to_string()).into())
    }

    fn resolve_property(&self, entity: EntityTypeId, name: &str) -> Result<PropertyId> {
        self.model.find_property(entity, name).ok_or_else(|| {
            let entity = self
                .model
                .entity_type(entity)
                .map(|e| e.name().to_string())
                .unwrap_or_default();
            ConstructionError::UnknownPropertyName {
                entity,
                name: name.to_string(),
            }
            .into()
        })
    }

    fn resolve_properties(&self, entity: EntityTypeId, names: &[&str]) -> Result<Vec<PropertyId>> {
        names
            .iter()
            .map(|name| self.resolve_property(entity, name))
            .collect()
    }
}
