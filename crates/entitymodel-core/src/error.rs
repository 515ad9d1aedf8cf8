//! Error types for model construction and validation.
//!
//! Every structural problem is reported synchronously by the operation that
//! would have introduced it, so a model that was built without error is always
//! a well-formed graph. Value-generation resolution has no error type: finding
//! no generating property is an ordinary `None`.

use std::error::Error as StdError;
use std::fmt;

/// Result alias used throughout EntityModel.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while adding entity types, properties, keys or foreign keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    /// A name is already taken within its scope (the model, or one entity type).
    DuplicateName { scope: String, name: String },
    /// A name does not satisfy the configured identifier rule.
    InvalidIdentifier { name: String, pattern: String },
    /// A key was given no properties, a repeated property, or a property
    /// belonging to a different entity type.
    InvalidKey { entity: String, reason: String },
    /// A foreign key was given no dependent properties, or dependent properties
    /// spread over more than one entity type.
    InvalidForeignKey { reason: String },
    /// Dependent and principal property counts differ.
    CardinalityMismatch { dependent: usize, principal: usize },
    /// An entity type handle or name the model does not know.
    UnknownEntityType(String),
    /// A property handle the model never issued.
    UnknownProperty(usize),
    /// A property name that does not exist on the named entity type.
    UnknownPropertyName { entity: String, name: String },
    /// A key handle the model never issued.
    UnknownKey(usize),
}

impl fmt::Display for ConstructionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstructionError::DuplicateName { scope, name } => {
                write!(f, "duplicate name '{}' in {}", name, scope)
            }
            ConstructionError::InvalidIdentifier { name, pattern } => {
                write!(f, "invalid identifier '{}': must match {}", name, pattern)
            }
            ConstructionError::InvalidKey { entity, reason } => {
                write!(f, "invalid key on '{}': {}", entity, reason)
            }
            ConstructionError::InvalidForeignKey { reason } => {
                write!(f, "invalid foreign key: {}", reason)
            }
            ConstructionError::CardinalityMismatch {
                dependent,
                principal,
            } => write!(
                f,
                "foreign key has {} dependent properties but the principal key has {}",
                dependent, principal
            ),
            ConstructionError::UnknownEntityType(name) => {
                write!(f, "unknown entity type: {}", name)
            }
            ConstructionError::UnknownProperty(id) => write!(f, "unknown property handle #{}", id),
            ConstructionError::UnknownPropertyName { entity, name } => {
                write!(f, "entity type '{}' has no property '{}'", entity, name)
            }
            ConstructionError::UnknownKey(id) => write!(f, "unknown key handle #{}", id),
        }
    }
}

impl StdError for ConstructionError {}

/// A single problem found by a model validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Entity type the issue was found on.
    pub entity: String,
    /// Human-readable description.
    pub message: String,
}

impl ValidationIssue {
    /// Create a new issue.
    pub fn new(entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.entity, self.message)
    }
}

/// All issues reported while validating a finished model.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn push(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    /// Turn the collected issues into a result.
    pub fn into_result(self) -> std::result::Result<(), ValidationError> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "model validation failed with {} issue(s)", self.issues.len())?;
        for issue in &self.issues {
            write!(f, "; {}", issue)?;
        }
        Ok(())
    }
}

impl StdError for ValidationError {}

/// Top-level error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    Construction(ConstructionError),
    Validation(ValidationError),
}

impl Error {
    /// The construction error, if this is one.
    #[must_use]
    pub fn as_construction(&self) -> Option<&ConstructionError> {
        match self {
            Error::Construction(err) => Some(err),
            Error::Validation(_) => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Construction(err) => write!(f, "construction error: {}", err),
            Error::Validation(err) => write!(f, "{}", err),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Construction(err) => Some(err),
            Error::Validation(err) => Some(err),
        }
    }
}

impl From<ConstructionError> for Error {
    fn from(err: ConstructionError) -> Self {
        Error::Construction(err)
    }
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Error::Validation(err)
    }
}
