//! Error types for Librarium
//!
//! This module defines error types using thiserror for ergonomic error handling.
//! Errors are categorized by domain (validation, storage, configuration) so
//! callers can decide whether a failure is caused by bad input, by a missing
//! row, or by the database rejecting a statement.

// The sqlx DatabaseError trait is imported anonymously: it is only needed so
// .kind() and .message() resolve on the boxed driver error.
use sqlx::error::DatabaseError as _;
use thiserror::Error;

/// Result type alias using our LibrariumError type
pub type Result<T> = std::result::Result<T, LibrariumError>;

/// Main error type for Librarium
///
/// Each variant carries a descriptive message. Database driver failures are
/// converted automatically via `#[from]` and can be inspected with
/// [`LibrariumError::is_constraint_violation`].
#[derive(Error, Debug)]
pub enum LibrariumError {
    // ===== Validation Errors =====

    /// A record failed application-level validation before it reached SQLite
    #[error("Validation failed: {0}")]
    Validation(String),

    // ===== Database Errors =====

    /// Database schema migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database record not found
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    // ===== Configuration Errors =====

    /// Configuration is invalid or incomplete
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ===== General Errors =====

    /// Internal error that should not normally occur
    #[error("Internal error: {0}")]
    InternalError(String),

    // ===== External Library Errors =====
    // Automatic conversions from external error types

    /// Database driver error from sqlx
    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

// Helper methods for creating common errors
impl LibrariumError {
    /// Create a Validation error with a message
    pub fn validation<S: Into<String>>(message: S) -> Self {
        LibrariumError::Validation(message.into())
    }

    /// Create a RecordNotFound error with a resource name
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        LibrariumError::RecordNotFound(resource.into())
    }

    /// Create an InternalError with a message
    pub fn internal<S: Into<String>>(message: S) -> Self {
        LibrariumError::InternalError(message.into())
    }

    /// Check if error is a validation failure (application-level or SQLite CHECK)
    pub fn is_validation_error(&self) -> bool {
        matches!(self, LibrariumError::Validation(_)) || self.is_constraint_violation()
    }

    /// Check if error is a SQLite constraint violation
    ///
    /// Returns `true` when the database rejected a statement because of a
    /// UNIQUE, FOREIGN KEY, NOT NULL, or CHECK constraint. Useful for telling
    /// "you handed me bad data" apart from "the database is broken".
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            LibrariumError::SqlxError(sqlx::Error::Database(db_err)) => matches!(
                db_err.kind(),
                sqlx::error::ErrorKind::UniqueViolation
                    | sqlx::error::ErrorKind::ForeignKeyViolation
                    | sqlx::error::ErrorKind::NotNullViolation
                    | sqlx::error::ErrorKind::CheckViolation
            ),
            _ => false,
        }
    }

    /// Check if error means a referenced row does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LibrariumError::RecordNotFound(_) | LibrariumError::SqlxError(sqlx::Error::RowNotFound)
        )
    }

    /// Get user-friendly error message suitable for display
    ///
    /// Returns actionable error messages that can be shown in the console
    /// report, with driver internals omitted where appropriate.
    pub fn user_message(&self) -> String {
        match self {
            LibrariumError::SqlxError(sqlx::Error::Database(db_err))
                if self.is_constraint_violation() =>
            {
                format!("The database rejected the data: {}", db_err.message())
            }
            LibrariumError::RecordNotFound(resource) => {
                format!("Could not find {}. Was the seed step skipped?", resource)
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_categorization() {
        let err = LibrariumError::validation("book year 1599 is below 1600");
        assert!(err.is_validation_error());
        assert!(!err.is_not_found());
        assert!(!err.is_constraint_violation());
    }

    #[test]
    fn test_not_found_categorization() {
        let err = LibrariumError::not_found("book 'Dune'");
        assert!(err.is_not_found());
        assert!(!err.is_validation_error());
        assert!(err.user_message().contains("Dune"));
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err = LibrariumError::from(sqlx::Error::RowNotFound);
        assert!(err.is_not_found());
    }

    #[test]
    fn test_error_display() {
        let err = LibrariumError::validation("rating 6 is outside 1..=5");
        assert_eq!(err.to_string(), "Validation failed: rating 6 is outside 1..=5");
    }
}
