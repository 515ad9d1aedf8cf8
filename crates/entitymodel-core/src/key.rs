//! Keys, foreign keys, and the indexes that connect them to properties.
//!
//! A foreign key pairs its dependent properties position-for-position with the
//! properties of a principal key. Two indexes are maintained as foreign keys
//! are added: property -> foreign keys that list it as a dependent, and
//! key -> foreign keys that reference it. Both keep declaration order, which
//! is what makes value-generation resolution deterministic.

use std::collections::HashSet;

use crate::entity::EntityType;
use crate::error::{ConstructionError, Result};
use crate::model::{EntityTypeId, ForeignKeyId, KeyId, Model, PropertyId};

/// A candidate key: an ordered, non-empty list of one entity type's properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    pub(crate) id: KeyId,
    pub(crate) entity_type: EntityTypeId,
    pub(crate) properties: Vec<PropertyId>,
}

impl Key {
    pub fn id(&self) -> KeyId {
        self.id
    }

    pub fn entity_type(&self) -> EntityTypeId {
        self.entity_type
    }

    pub fn properties(&self) -> &[PropertyId] {
        &self.properties
    }
}

/// Dependent properties of one entity type referencing a principal key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub(crate) id: ForeignKeyId,
    pub(crate) entity_type: EntityTypeId,
    pub(crate) properties: Vec<PropertyId>,
    pub(crate) principal_key: KeyId,
    pub(crate) principal_entity_type: EntityTypeId,
}

impl ForeignKey {
    pub fn id(&self) -> ForeignKeyId {
        self.id
    }

    /// The dependent entity type.
    pub fn entity_type(&self) -> EntityTypeId {
        self.entity_type
    }

    /// Dependent properties, paired by position with the principal key.
    pub fn properties(&self) -> &[PropertyId] {
        &self.properties
    }

    pub fn principal_key(&self) -> KeyId {
        self.principal_key
    }

    pub fn principal_entity_type(&self) -> EntityTypeId {
        self.principal_entity_type
    }

    /// True when no dependent property is nullable, so every dependent must
    /// have a principal.
    pub fn is_required(&self, model: &Model) -> bool {
        self.properties
            .iter()
            .filter_map(|p| model.property(*p))
            .all(|p| !p.is_nullable())
    }
}

/// One position of a foreign key, seen from a dependent property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKeyEdge {
    pub foreign_key: ForeignKeyId,
    /// Position of the dependent property within the foreign key.
    pub index: usize,
    /// The principal key's property at the same position.
    pub principal: PropertyId,
}

impl Model {
    /// Add a candidate key to an entity type.
    ///
    /// The properties must be non-empty, distinct, and all declared by `entity`.
    pub fn add_key(&mut self, entity: EntityTypeId, properties: &[PropertyId]) -> Result<KeyId> {
        self.check_key_properties(entity, properties)?;

        let id = KeyId::new(self.keys.len());
        let entity_type = self.entity_type_mut(entity)?;
        tracing::debug!(
            entity = %entity_type.name,
            properties = properties.len(),
            "Adding key"
        );
        entity_type.keys.push(id);
        self.keys.push(Key {
            id,
            entity_type: entity,
            properties: properties.to_vec(),
        });
        self.principal_index.push(Vec::new());
        Ok(id)
    }

    /// Set the primary key of an entity type.
    ///
    /// Reuses an existing key over the same properties (in the same order);
    /// otherwise a new key is added.
    pub fn set_primary_key(
        &mut self,
        entity: EntityTypeId,
        properties: &[PropertyId],
    ) -> Result<KeyId> {
        let existing = self.find_key(entity, properties);
        let id = match existing {
            Some(id) => id,
            None => self.add_key(entity, properties)?,
        };
        self.entity_type_mut(entity)?.primary_key = Some(id);
        Ok(id)
    }

    /// Add a foreign key from `properties` to `principal_key`.
    ///
    /// Fails with `CardinalityMismatch` when the dependent and principal
    /// property counts differ. Nothing is added on failure.
    pub fn add_foreign_key(
        &mut self,
        properties: &[PropertyId],
        principal_key: KeyId,
    ) -> Result<ForeignKeyId> {
        let Some(&first) = properties.first() else {
            return Err(ConstructionError::InvalidForeignKey {
                reason: "no dependent properties".to_string(),
            }
            .into());
        };
        let entity = self.require_property(first)?.entity_type;
        for p in properties {
            if self.require_property(*p)?.entity_type != entity {
                return Err(ConstructionError::InvalidForeignKey {
                    reason: format!(
                        "dependent properties span entity types ({} and {})",
                        self.qualified_name(first),
                        self.qualified_name(*p)
                    ),
                }
                .into());
            }
        }

        let principal = self
            .key(principal_key)
            .ok_or(ConstructionError::UnknownKey(principal_key.index()))?;
        if principal.properties.len() != properties.len() {
            return Err(ConstructionError::CardinalityMismatch {
                dependent: properties.len(),
                principal: principal.properties.len(),
            }
            .into());
        }
        let principal_entity_type = principal.entity_type;

        let id = ForeignKeyId::new(self.foreign_keys.len());
        tracing::debug!(
            dependent = %self.entity_name(entity).unwrap_or("?"),
            principal = %self.entity_name(principal_entity_type).unwrap_or("?"),
            properties = properties.len(),
            "Adding foreign key"
        );
        for (index, p) in properties.iter().enumerate() {
            self.dependent_index[p.index()].push((id, index));
        }
        self.principal_index[principal_key.index()].push(id);
        self.entity_type_mut(entity)?.foreign_keys.push(id);
        self.foreign_keys.push(ForeignKey {
            id,
            entity_type: entity,
            properties: properties.to_vec(),
            principal_key,
            principal_entity_type,
        });
        Ok(id)
    }

    pub fn key(&self, id: KeyId) -> Option<&Key> {
        self.keys.get(id.index())
    }

    pub fn foreign_key(&self, id: ForeignKeyId) -> Option<&ForeignKey> {
        self.foreign_keys.get(id.index())
    }

    pub fn primary_key(&self, entity: EntityTypeId) -> Option<KeyId> {
        self.entity_type(entity)?.primary_key
    }

    /// Candidate keys of an entity type in declaration order.
    pub fn keys(&self, entity: EntityTypeId) -> impl Iterator<Item = &Key> {
        self.entity_type(entity)
            .map(|e| e.keys.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|k| self.key(*k))
    }

    /// Outgoing foreign keys of an entity type in declaration order.
    pub fn foreign_keys(&self, entity: EntityTypeId) -> impl Iterator<Item = &ForeignKey> {
        self.entity_type(entity)
            .map(|e| e.foreign_keys.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|fk| self.foreign_key(*fk))
    }

    /// Every position at which `property` is a dependent of some foreign key,
    /// with the principal property at that position.
    pub fn foreign_keys_for_property(
        &self,
        property: PropertyId,
    ) -> impl Iterator<Item = ForeignKeyEdge> + '_ {
        self.dependent_index
            .get(property.index())
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .filter_map(move |&(foreign_key, index)| {
                let fk = self.foreign_key(foreign_key)?;
                let principal = *self.key(fk.principal_key)?.properties.get(index)?;
                Some(ForeignKeyEdge {
                    foreign_key,
                    index,
                    principal,
                })
            })
    }

    /// Foreign keys whose principal is `key`.
    pub fn referencing_foreign_keys(&self, key: KeyId) -> impl Iterator<Item = &ForeignKey> {
        self.principal_index
            .get(key.index())
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .filter_map(|fk| self.foreign_key(*fk))
    }

    /// Whether the property is part of any key of its entity type.
    pub fn is_key(&self, property: PropertyId) -> bool {
        self.property(property).is_some_and(|p| {
            self.keys(p.entity_type)
                .any(|k| k.properties.contains(&property))
        })
    }

    /// Whether the property is a dependent of any foreign key.
    pub fn is_foreign_key(&self, property: PropertyId) -> bool {
        self.dependent_index
            .get(property.index())
            .is_some_and(|edges| !edges.is_empty())
    }

    fn find_key(&self, entity: EntityTypeId, properties: &[PropertyId]) -> Option<KeyId> {
        self.keys(entity)
            .find(|k| k.properties == properties)
            .map(Key::id)
    }

    fn check_key_properties(&self, entity: EntityTypeId, properties: &[PropertyId]) -> Result<()> {
        let entity_type = self
            .entity_type(entity)
            .ok_or_else(|| ConstructionError::UnknownEntityType(format!("#{}", entity.index())))?;
        let invalid = |reason: String| ConstructionError::InvalidKey {
            entity: entity_type.name.clone(),
            reason,
        };

        if properties.is_empty() {
            return Err(invalid("no properties".to_string()).into());
        }

        let mut seen = HashSet::with_capacity(properties.len());
        for p in properties {
            let prop = self.require_property(*p)?;
            if prop.entity_type != entity {
                return Err(invalid(format!(
                    "property {} belongs to another entity type",
                    self.qualified_name(*p)
                ))
                .into());
            }
            if !seen.insert(*p) {
                return Err(invalid(format!("property {} is repeated", prop.name)).into());
            }
        }
        Ok(())
    }
}

impl EntityType {
    /// Whether `key` is this entity type's primary key.
    pub fn is_primary_key(&self, key: KeyId) -> bool {
        self.primary_key == Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::types::ValueType;

    struct BlogPost {
        model: Model,
        blog: EntityTypeId,
        blog_id: PropertyId,
        blog_key: KeyId,
        post: EntityTypeId,
        post_id: PropertyId,
        post_blog_id: PropertyId,
    }

    fn blog_post() -> BlogPost {
        let mut model = Model::new();
        let blog = model.add_entity_type("Blog").unwrap();
        let blog_id = model.add_property(blog, "Id", ValueType::Int32, false).unwrap();
        let blog_key = model.set_primary_key(blog, &[blog_id]).unwrap();

        let post = model.add_entity_type("Post").unwrap();
        let post_id = model.add_property(post, "Id", ValueType::Int32, false).unwrap();
        let post_blog_id = model
            .add_property(post, "BlogId", ValueType::Int32, true)
            .unwrap();
        model.set_primary_key(post, &[post_id]).unwrap();

        BlogPost {
            model,
            blog,
            blog_id,
            blog_key,
            post,
            post_id,
            post_blog_id,
        }
    }

    #[test]
    fn test_add_key_rejects_empty() {
        let mut f = blog_post();
        let err = f.model.add_key(f.blog, &[]).unwrap_err();
        assert!(matches!(
            err,
            Error::Construction(ConstructionError::InvalidKey { .. })
        ));
    }

    #[test]
    fn test_add_key_rejects_foreign_property() {
        let mut f = blog_post();
        let err = f.model.add_key(f.blog, &[f.post_id]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "construction error: invalid key on 'Blog': property Post.Id belongs to another entity type"
        );
        assert_eq!(f.model.keys(f.blog).count(), 1);
    }

    #[test]
    fn test_add_key_rejects_repeated_property() {
        let mut f = blog_post();
        assert!(f.model.add_key(f.post, &[f.post_id, f.post_id]).is_err());
    }

    #[test]
    fn test_set_primary_key_reuses_existing_key() {
        let mut f = blog_post();
        let alt = f.model.add_key(f.post, &[f.post_blog_id, f.post_id]).unwrap();
        let pk = f
            .model
            .set_primary_key(f.post, &[f.post_blog_id, f.post_id])
            .unwrap();
        assert_eq!(pk, alt);
        assert_eq!(f.model.primary_key(f.post), Some(alt));
        assert_eq!(f.model.keys(f.post).count(), 2);
        assert!(f.model.entity_type(f.post).unwrap().is_primary_key(alt));
    }

    #[test]
    fn test_add_foreign_key_indexes_both_ends() {
        let mut f = blog_post();
        let fk = f
            .model
            .add_foreign_key(&[f.post_blog_id], f.blog_key)
            .unwrap();

        let edges: Vec<ForeignKeyEdge> = f.model.foreign_keys_for_property(f.post_blog_id).collect();
        assert_eq!(
            edges,
            vec![ForeignKeyEdge {
                foreign_key: fk,
                index: 0,
                principal: f.blog_id,
            }]
        );
        let referencing: Vec<ForeignKeyId> = f
            .model
            .referencing_foreign_keys(f.blog_key)
            .map(ForeignKey::id)
            .collect();
        assert_eq!(referencing, vec![fk]);

        let foreign_key = f.model.foreign_key(fk).unwrap();
        assert_eq!(foreign_key.entity_type(), f.post);
        assert_eq!(foreign_key.principal_entity_type(), f.blog);
        assert!(!foreign_key.is_required(&f.model));
        assert!(f.model.is_foreign_key(f.post_blog_id));
        assert!(!f.model.is_foreign_key(f.post_id));
    }

    #[test]
    fn test_cardinality_mismatch_creates_nothing() {
        let mut f = blog_post();
        let err = f
            .model
            .add_foreign_key(&[f.post_blog_id, f.post_id], f.blog_key)
            .unwrap_err();
        assert_eq!(
            err,
            Error::Construction(ConstructionError::CardinalityMismatch {
                dependent: 2,
                principal: 1,
            })
        );
        assert_eq!(f.model.foreign_keys(f.post).count(), 0);
        assert_eq!(f.model.foreign_keys_for_property(f.post_blog_id).count(), 0);
        assert_eq!(f.model.referencing_foreign_keys(f.blog_key).count(), 0);
    }

    #[test]
    fn test_foreign_key_rejects_mixed_dependents() {
        let mut f = blog_post();
        let pair = f.model.add_key(f.post, &[f.post_id, f.post_blog_id]).unwrap();
        let err = f
            .model
            .add_foreign_key(&[f.blog_id, f.post_id], pair)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Construction(ConstructionError::InvalidForeignKey { .. })
        ));
    }

    #[test]
    fn test_foreign_key_rejects_empty_and_unknown_key() {
        let mut f = blog_post();
        assert!(f.model.add_foreign_key(&[], f.blog_key).is_err());
        let err = f
            .model
            .add_foreign_key(&[f.post_blog_id], KeyId::new(42))
            .unwrap_err();
        assert_eq!(err, Error::Construction(ConstructionError::UnknownKey(42)));
    }

    #[test]
    fn test_self_referencing_foreign_key() {
        let mut model = Model::new();
        let employee = model.add_entity_type("Employee").unwrap();
        let id = model.add_property(employee, "Id", ValueType::Int32, false).unwrap();
        let manager = model
            .add_property(employee, "ManagerId", ValueType::Int32, true)
            .unwrap();
        let pk = model.set_primary_key(employee, &[id]).unwrap();
        let fk = model.add_foreign_key(&[manager], pk).unwrap();

        let foreign_key = model.foreign_key(fk).unwrap();
        assert_eq!(foreign_key.entity_type(), foreign_key.principal_entity_type());
    }

    #[test]
    fn test_is_key() {
        let f = blog_post();
        assert!(f.model.is_key(f.blog_id));
        assert!(!f.model.is_key(f.post_blog_id));
    }
}
