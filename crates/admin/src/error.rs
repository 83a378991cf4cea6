//! Unified error handling for admin.

use catalog_core::{OptionError, ProjectionError};
use thiserror::Error;

use crate::catalogue::CatalogueError;
use crate::config::ConfigError;
use crate::db::RepositoryError;
use crate::storage::StorageError;

/// Application-level error type for the product form.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Media upload failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Option edit was rejected.
    #[error("Option error: {0}")]
    Options(#[from] OptionError),

    /// Options cannot be stored.
    #[error("Variant error: {0}")]
    Projection(#[from] ProjectionError),

    /// Option catalogue could not be loaded.
    #[error("Catalogue error: {0}")]
    Catalogue(#[from] CatalogueError),

    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from the user.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether the failure lies outside the user's input.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Database(RepositoryError::Database(_) | RepositoryError::DataCorruption(_))
                | Self::Storage(_)
                | Self::Catalogue(_)
                | Self::Config(_)
                | Self::Internal(_)
        )
    }

    /// Alert text shown to the person filling in the form.
    ///
    /// Internal details of database failures are not exposed.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Database(RepositoryError::Database(_) | RepositoryError::DataCorruption(_))
            | Self::Internal(_) => "Error: Internal server error".to_string(),
            Self::Database(RepositoryError::NotFound) => "Error: Product not found".to_string(),
            Self::Database(RepositoryError::Conflict(message)) => format!("Error: {message}"),
            Self::Storage(e) => format!("Error uploading file: {e}"),
            Self::Options(e) => format!("Error: {e}"),
            Self::Projection(e) => format!("Error: {e}"),
            Self::Catalogue(e) => format!("Error: {e}"),
            Self::Config(e) => format!("Error: {e}"),
            Self::NotFound(what) => format!("Error: {what} not found"),
            Self::BadRequest(message) => format!("Error: {message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product 12".to_string());
        assert_eq!(err.to_string(), "Not found: product 12");

        let err = AppError::BadRequest("unsupported file type".to_string());
        assert_eq!(err.to_string(), "Bad request: unsupported file type");
    }

    #[test]
    fn test_user_message_hides_database_details() {
        let err = AppError::Database(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        assert_eq!(err.user_message(), "Error: Internal server error");
        assert!(err.is_server_error());
    }

    #[test]
    fn test_user_message_shows_conflicts() {
        let err = AppError::Database(RepositoryError::Conflict("slug already exists".to_string()));
        assert_eq!(err.user_message(), "Error: slug already exists");
        assert!(!err.is_server_error());
    }

    #[test]
    fn test_user_message_for_uploads() {
        let err = AppError::Storage(StorageError::Api {
            status: 413,
            message: "Payload too large".to_string(),
        });
        assert_eq!(
            err.user_message(),
            "Error uploading file: API error: 413 - Payload too large"
        );
    }

    #[test]
    fn test_user_message_for_projection() {
        let err = AppError::Projection(ProjectionError::TooManyOptionGroups { count: 4, max: 3 });
        assert_eq!(
            err.user_message(),
            "Error: 4 variant option groups exceed the 3 available option columns"
        );
        assert!(!err.is_server_error());
    }
}
