//! Error types for the lodestar library.
//!
//! Only misuse-class failures surface as errors. Structural problems in a
//! plan and unresolvable index lookups are reported as warnings on the
//! operation's output instead.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for all lodestar operations.
#[derive(Error, Debug)]
pub enum LodestarError {
    /// A merge was requested over zero items
    #[error("Cannot merge an empty list of {what}")]
    EmptyMerge { what: &'static str },
    /// Step explicitly requested by id is not part of the plan
    #[error("Step with ID '{id}' not found in plan")]
    StepNotFound { id: String },
    /// Scope explicitly requested by id is not part of the plan
    #[error("Scope with ID '{id}' not found in plan")]
    ScopeNotFound { id: String },
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> LodestarError {
        LodestarError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl LodestarError {
    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Creates a file system error for the given path.
    pub fn file_system(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileSystem {
            path: path.into(),
            source,
        }
    }

    /// Whether the error stems from caller misuse rather than the
    /// environment.
    pub fn is_misuse(&self) -> bool {
        matches!(
            self,
            Self::EmptyMerge { .. }
                | Self::StepNotFound { .. }
                | Self::ScopeNotFound { .. }
                | Self::InvalidInput { .. }
        )
    }
}

/// Extension trait for Result to provide concise error mapping with
/// anyhow-style context.
pub trait ResultExt<T, E> {
    /// Add context to any error type, converting to LodestarError.
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| LodestarError::Configuration {
            message: format!("{}: {}", context, e),
        })
    }
}

/// Result type alias for lodestar operations
pub type Result<T> = std::result::Result<T, LodestarError>;
