//! EntityModel Rust: entity metadata graphs for data-access layers.
//!
//! This is the facade crate. It re-exports the metadata graph from
//! `entitymodel-core` and adds the pieces applications use to define models:
//!
//! - [`ModelBuilder`]: define entity types, properties, keys and foreign keys
//!   by name.
//! - [`ModelSource`]: build and validate a model once, on first use, and share
//!   it across threads.
//!
//! The central query is [`Model::generation_property`]: given a property
//! (typically a key that is also a foreign key), find the property whose value
//! generator actually supplies it when a new entity is added.

pub mod builder;
pub mod source;

pub use builder::ModelBuilder;
pub use source::ModelSource;

pub use entitymodel_core::{
    ConstructionError, DEFAULT_IDENTIFIER_PATTERN, DefaultModelValidator, EntityType,
    EntityTypeId, Error, ForeignKey, ForeignKeyEdge, ForeignKeyId, Key, KeyId, LazyRef, Model,
    ModelConfig, ModelValidator, NoopModelValidator, Property, PropertyId, PropertySet, Result,
    ValidationError, ValidationIssue, ValueType, check_identifier,
};

/// Commonly used items.
pub mod prelude {
    pub use crate::{
        Error, Model, ModelBuilder, ModelConfig, ModelSource, PropertyId, Result, ValueType,
    };
}
