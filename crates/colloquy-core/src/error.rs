//! Error types for the Colloquy engine
//!
//! Only storage failures are true faults. An unanswered question or a rejected
//! learning attempt is a normal value, never an error.

use thiserror::Error;

/// Result alias used across the crate
pub type ColloquyResult<T> = Result<T, ColloquyError>;

/// Errors produced by the engine
#[derive(Debug, Error)]
pub enum ColloquyError {
    /// The append-only store could not be read or written
    #[error("storage error during '{operation}': {source}")]
    Storage {
        /// Operation that failed
        operation: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A record could not be encoded or decoded
    #[error("serialization error during '{operation}': {message}")]
    Serialization {
        /// Operation that failed
        operation: String,
        /// Description of the failure
        message: String,
    },

    /// The named agent is not configured
    #[error("unknown agent '{name}'")]
    UnknownAgent {
        /// Name as supplied by the caller
        name: String,
    },

    /// A request parameter failed validation
    #[error("invalid {field}: {constraint} (got '{value}')")]
    Validation {
        /// Field being validated
        field: String,
        /// Constraint that was violated
        constraint: String,
        /// Offending value
        value: String,
    },

    /// Configuration is inconsistent
    #[error("configuration error: {message}")]
    Config {
        /// Description of the problem
        message: String,
    },
}

impl ColloquyError {
    /// Create a storage error
    pub fn storage(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Storage {
            operation: operation.into(),
            source,
        }
    }

    /// Create a serialization error
    pub fn serialization(operation: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Serialization {
            operation: operation.into(),
            message: err.to_string(),
        }
    }

    /// Create an unknown-agent error
    pub fn unknown_agent(name: impl Into<String>) -> Self {
        Self::UnknownAgent { name: name.into() }
    }

    /// Create a validation error
    pub fn validation(
        field: impl Into<String>,
        constraint: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::Validation {
            field: field.into(),
            constraint: constraint.into(),
            value: value.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether the error stems from bad caller input rather than a fault
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::UnknownAgent { .. } | Self::Validation { .. })
    }
}
