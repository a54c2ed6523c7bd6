//! Error types for recipebox.
//!
//! This module defines all error types used throughout the recipebox crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for recipebox operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Recipe Errors ===
    /// A required field was empty or otherwise invalid.
    ///
    /// Raised before any persistence attempt.
    #[error("invalid {field}: {message}")]
    Validation {
        /// Name of the offending field.
        field: &'static str,
        /// Description of the validation failure.
        message: String,
    },

    /// No recipe exists with the given id.
    #[error("recipe {id} not found")]
    NotFound {
        /// The id that was looked up.
        id: i64,
    },

    /// An import payload could not be parsed.
    #[error("malformed import payload: {0}")]
    Parse(#[source] serde_json::Error),

    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// Reading an input file, such as an attached image, failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Runtime Errors ===
    /// A blocking storage task panicked or was cancelled.
    #[error("storage task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

/// A specialized Result type for recipebox operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new validation error for the given field.
    #[must_use]
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Create a not-found error for the given recipe id.
    #[must_use]
    pub fn not_found(id: i64) -> Self {
        Self::NotFound { id }
    }

    /// Check if this error means the referenced recipe does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error is a validation failure.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if this error came from a malformed import payload.
    #[must_use]
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::not_found(7);
        assert_eq!(err.to_string(), "recipe 7 not found");

        let err = Error::validation("name", "must not be empty");
        assert_eq!(err.to_string(), "invalid name: must not be empty");
    }

    #[test]
    fn test_error_is_not_found() {
        assert!(Error::not_found(1).is_not_found());
        assert!(!Error::validation("name", "empty").is_not_found());
    }

    #[test]
    fn test_error_is_validation() {
        assert!(Error::validation("name", "empty").is_validation());
        assert!(!Error::not_found(1).is_validation());
    }

    #[test]
    fn test_parse_error() {
        let json_err = serde_json::from_str::<Vec<i32>>("[1,").unwrap_err();
        let err = Error::Parse(json_err);
        assert!(err.is_parse());
        assert!(err.to_string().starts_with("malformed import payload"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_rusqlite_error() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let sqlite_err = conn.execute("NOT A STATEMENT", []).unwrap_err();
        let err: Error = sqlite_err.into();
        assert!(matches!(err, Error::DatabaseQuery(_)));
        assert!(err.to_string().starts_with("database query failed"));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<i32>("not valid json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
        assert!(!err.is_parse());
    }

    #[test]
    fn test_database_migration_error_display() {
        let err = Error::DatabaseMigration {
            message: "version mismatch".to_string(),
        };
        assert!(err.to_string().contains("version mismatch"));
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "empty file name".to_string(),
        };
        assert!(err.to_string().contains("empty file name"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }

    #[test]
    fn test_database_open_error_display() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let sqlite_err = conn.execute("NOT A STATEMENT", []).unwrap_err();
        let err = Error::DatabaseOpen {
            path: PathBuf::from("/data/recipes.db"),
            source: sqlite_err,
        };
        let message = err.to_string();
        assert!(message.starts_with("failed to open database at /data/recipes.db"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
