//! Error types for mediashare-rs.

use thiserror::Error;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // === Caller Errors ===
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Media item not found: {0}")]
    MediaNotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// A query projected a column that is neither grouped nor
    /// aggregated. Raised before the statement is sent to the
    /// database.
    #[error("Ambiguous projection: {0}")]
    AmbiguousProjection(String),

    // === Database Errors ===
    /// Unique collision, missing foreign key, or check failure
    /// reported by the database.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Database error: {0}")]
    Database(String),

    // === Server Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the stable machine-readable code for this error.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::MediaNotFound(_) => "MEDIA_NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::AmbiguousProjection(_) => "AMBIGUOUS_PROJECTION",
            Self::ConstraintViolation(_) => "CONSTRAINT_VIOLATION",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns whether this error came from the caller rather than
    /// the database or the environment.
    #[must_use]
    pub const fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_)
                | Self::UserNotFound(_)
                | Self::MediaNotFound(_)
                | Self::Validation(_)
                | Self::AmbiguousProjection(_)
        )
    }
}

// === From implementations ===

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(
            AppError::ConstraintViolation("dup".into()).error_code(),
            "CONSTRAINT_VIOLATION"
        );
        assert_eq!(
            AppError::AmbiguousProjection("filesize".into()).error_code(),
            "AMBIGUOUS_PROJECTION"
        );
        assert_eq!(AppError::Database("down".into()).error_code(), "DATABASE_ERROR");
    }

    #[test]
    fn test_caller_error_classification() {
        assert!(AppError::AmbiguousProjection("x".into()).is_caller_error());
        assert!(AppError::Validation("x".into()).is_caller_error());
        assert!(!AppError::ConstraintViolation("x".into()).is_caller_error());
        assert!(!AppError::Database("x".into()).is_caller_error());
    }
}
