//! Lazily built, validated, shared models.
//!
//! A `ModelSource` owns the definition of a model (a callback that populates a
//! [`ModelBuilder`]) and produces the finished model the first time anyone asks
//! for it. The build runs exactly once even when many threads ask at the same
//! time; afterwards every caller gets the same `Arc<Model>`.

use std::fmt;
use std::sync::Arc;

use entitymodel_core::{
    DefaultModelValidator, LazyRef, Model, ModelConfig, ModelValidator, Result,
};

use crate::builder::ModelBuilder;

type Definition = dyn Fn(&mut ModelBuilder) -> Result<()> + Send + Sync;

/// Builds a model on first use and caches it.
///
/// A failed build is cached too: the definition is deterministic, so running
/// it again would fail the same way.
pub struct ModelSource {
    cell: LazyRef<Result<Arc<Model>>>,
}

impl ModelSource {
    /// Create a source using the default configuration and validator.
    pub fn new(define: impl Fn(&mut ModelBuilder) -> Result<()> + Send + Sync + 'static) -> Self {
        Self::with_options(ModelConfig::default(), DefaultModelValidator, define)
    }

    /// Create a source with an explicit configuration and validator.
    pub fn with_options(
        config: ModelConfig,
        validator: impl ModelValidator + 'static,
        define: impl Fn(&mut ModelBuilder) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        let define: Box<Definition> = Box::new(define);
        let validator: Box<dyn ModelValidator> = Box::new(validator);
        Self {
            cell: LazyRef::new(move || build_model(&config, validator.as_ref(), define.as_ref())),
        }
    }

    /// The model, building and validating it on first call.
    pub fn model(&self) -> Result<Arc<Model>> {
        self.cell.value()
    }

    /// Whether the build has already run.
    pub fn is_built(&self) -> bool {
        self.cell.has_value()
    }
}

impl fmt::Debug for ModelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelSource")
            .field("built", &self.is_built())
            .finish()
    }
}

fn build_model(
    config: &ModelConfig,
    validator: &dyn ModelValidator,
    define: &Definition,
) -> Result<Arc<Model>> {
    let mut builder = ModelBuilder::with_config(config.clone());
    define(&mut builder)?;
    let model = builder.build();
    validator.validate(&model)?;

    tracing::info!(
        entity_types = model.entity_types().count(),
        properties = model.property_count(),
        "Built model"
    );
    Ok(Arc::new(model))
}
