//! Whole-model validation.
//!
//! Construction already rejects structurally invalid keys and foreign keys.
//! Validation runs once a model is complete and checks rules that only make
//! sense for a finished model, such as every entity type having a primary key.

use crate::error::{ValidationError, ValidationIssue};
use crate::model::Model;

/// Checks a finished model.
pub trait ModelValidator: Send + Sync {
    fn validate(&self, model: &Model) -> Result<(), ValidationError>;
}

/// Validator driven by the model's own [`ModelConfig`](crate::ModelConfig).
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultModelValidator;

impl ModelValidator for DefaultModelValidator {
    fn validate(&self, model: &Model) -> Result<(), ValidationError> {
        let config = model.config();
        let mut errors = ValidationError::default();

        for entity in model.entity_types() {
            if config.require_primary_key && entity.primary_key().is_none() {
                errors.push(ValidationIssue::new(entity.name(), "no primary key"));
            }

            if !config.check_foreign_key_types {
                continue;
            }
            for fk in model.foreign_keys(entity.id()) {
                let Some(principal_key) = model.key(fk.principal_key()) else {
                    continue;
                };
                for (dependent, principal) in fk.properties().iter().zip(principal_key.properties()) {
                    let (Some(d), Some(p)) = (model.property(*dependent), model.property(*principal))
                    else {
                        continue;
                    };
                    if d.value_type() != p.value_type() {
                        errors.push(ValidationIssue::new(
                            entity.name(),
                            format!(
                                "foreign key property {} ({}) does not match principal {} ({})",
                                d.name(),
                                d.value_type(),
                                model.qualified_name(*principal),
                                p.value_type()
                            ),
                        ));
                    }
                }
            }
        }

        if !errors.is_empty() {
            tracing::warn!(issues = errors.issues.len(), "Model validation failed");
        }
        errors.into_result()
    }
}

/// A validator that accepts every model.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopModelValidator;

impl ModelValidator for NoopModelValidator {
    fn validate(&self, _model: &Model) -> Result<(), ValidationError> {
        Ok(())
    }
}
