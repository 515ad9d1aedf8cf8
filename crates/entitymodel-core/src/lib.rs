//! Core types for EntityModel Rust.
//!
//! `entitymodel-core` is the **metadata layer**: an arena-owned graph of entity
//! types, their properties, candidate keys and foreign keys, plus the resolver
//! that decides which property generates a key value when a new entity is
//! added.
//!
//! # Role In The Architecture
//!
//! - **Model graph**: `Model` owns every `EntityType`, `Property`, `Key` and
//!   `ForeignKey`, addressed by `Copy` handles (`EntityTypeId`, `PropertyId`,
//!   `KeyId`, `ForeignKeyId`).
//! - **Generation resolution**: `Model::generation_property` follows foreign
//!   keys from a dependent property to the property that actually produces its
//!   value, tolerating cycles.
//! - **Deferred construction**: `LazyRef` builds a value exactly once across
//!   concurrent first callers.
//!
//! Query translation, change tracking and persistence consume this crate
//! through the read-only lookups on `Model`; none of them live here.
//!
//! Most applications should use the `entitymodel` facade; reach for
//! `entitymodel-core` directly when only the graph is needed.

pub mod config;
pub mod entity;
pub mod error;
pub mod generation;
pub mod identifiers;
pub mod key;
pub mod lazy;
pub mod model;
pub mod property_set;
pub mod types;
pub mod validate;

pub use config::{DEFAULT_IDENTIFIER_PATTERN, ModelConfig};
pub use entity::{EntityType, Property};
pub use error::{ConstructionError, Error, Result, ValidationError, ValidationIssue};
pub use identifiers::check_identifier;
pub use key::{ForeignKey, ForeignKeyEdge, Key};
pub use lazy::LazyRef;
pub use model::{EntityTypeId, ForeignKeyId, KeyId, Model, PropertyId};
pub use property_set::PropertySet;
pub use types::ValueType;
pub use validate::{DefaultModelValidator, ModelValidator, NoopModelValidator};
