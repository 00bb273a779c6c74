//! Error types for the book recommender
//!
//! Every fallible operation in the workspace returns [`RecommenderError`].
//! Numerical degradation of the factorization engine and candidates without
//! catalog metadata are deliberately *not* errors: the engines recover from
//! them locally and only log the condition.

use thiserror::Error;

/// Errors surfaced to callers of the recommendation engines
#[derive(Debug, Error)]
pub enum RecommenderError {
    /// Malformed identifiers, out-of-range ratings or parameters.
    /// Rejected before any computation takes place.
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        field: Option<String>,
    },

    /// A requested user or item has no row/column in the rating data
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u64 },

    /// Configuration could not be loaded or failed validation
    #[error("Configuration error: {message}")]
    ConfigurationError {
        message: String,
        key: Option<String>,
    },
}

impl RecommenderError {
    /// Invalid input without a specific field
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: None,
        }
    }

    /// Invalid input attributed to a named field
    pub fn invalid_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Unknown user or item
    pub fn not_found(entity: &'static str, id: impl Into<u64>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Configuration problem tied to a configuration key
    pub fn configuration(message: impl Into<String>, key: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }
}

impl From<config::ConfigError> for RecommenderError {
    fn from(err: config::ConfigError) -> Self {
        Self::ConfigurationError {
            message: err.to_string(),
            key: None,
        }
    }
}
