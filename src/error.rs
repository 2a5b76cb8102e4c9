//! Custom error types for AIMS
//!
//! This module defines the error hierarchy for the library using thiserror.
//! Crypto failures are split into `Encryption` and `Decryption` so a caller
//! can never confuse "could not decrypt" with a successfully decrypted value.

use thiserror::Error;

/// The main error type for AIMS operations
#[derive(Error, Debug)]
pub enum AimsError {
    /// Configuration errors (including a missing secret key)
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Encryption failed, or the key itself is malformed
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// A ciphertext token could not be decrypted
    #[error("Decryption error: {0}")]
    Decryption(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// A third-party service (nutrition lookup) failed
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl AimsError {
    /// Create a "not found" error for projects
    pub fn project_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Project",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for tasks
    pub fn task_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Task",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for financial goals
    pub fn goal_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Goal",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for health entries
    pub fn health_entry_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Health entry",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for journal entries
    pub fn journal_entry_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Journal entry",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a decryption failure
    pub fn is_decryption(&self) -> bool {
        matches!(self, Self::Decryption(_))
    }
}

impl From<std::io::Error> for AimsError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AimsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for AimsError {
    fn from(err: csv::Error) -> Self {
        Self::Import(err.to_string())
    }
}

/// Result type alias for AIMS operations
pub type AimsResult<T> = Result<T, AimsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AimsError::Config("AIMS_FIELD_KEY is not set".into());
        assert_eq!(
            err.to_string(),
            "Configuration error: AIMS_FIELD_KEY is not set"
        );
    }

    #[test]
    fn test_not_found_error() {
        let err = AimsError::project_not_found("Garden");
        assert_eq!(err.to_string(), "Project not found: Garden");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_decryption_is_distinct_from_encryption() {
        let dec = AimsError::Decryption("tag mismatch".into());
        let enc = AimsError::Encryption("bad key".into());
        assert!(dec.is_decryption());
        assert!(!enc.is_decryption());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: AimsError = io_err.into();
        assert!(matches!(err, AimsError::Io(_)));
    }
}
