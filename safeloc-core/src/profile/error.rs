//! Error types for profile operations.
//!
//! This module defines errors that can occur while registering, reading,
//! listing and deleting profiles, including validation, access and storage
//! errors.

use thiserror::Error;

use crate::config::ConfigError;
use crate::location::LocationError;

/// Error type for profile operations.
#[derive(Error, Debug)]
pub enum ProfileError {
    /// Coordinate input failed validation.
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// No approximate location could be derived from a valid coordinate.
    #[error("Approximation failed: {0}")]
    Approximation(String),

    /// Full name is empty or whitespace.
    #[error("Invalid name: {0}")]
    InvalidName(String),

    /// No caller identity was supplied.
    #[error("Missing caller identity")]
    MissingCaller,

    /// Profile not found.
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    /// Owner already has a profile.
    #[error("Profile already exists: {0}")]
    AlreadyExists(String),

    /// Caller's role does not permit the operation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Storage operation failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Database error from `SQLite`.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Service configuration is unusable.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ProfileError {
    /// Returns whether this is an internal failure rather than a problem
    /// with the request.
    #[must_use]
    pub const fn is_generic(&self) -> bool {
        matches!(
            self,
            Self::Storage(_) | Self::Database(_) | Self::Approximation(_)
        )
    }

    /// Returns whether the caller supplied invalid input.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidCoordinate(_) | Self::InvalidName(_) | Self::MissingCaller
        )
    }
}

/// Result type alias for profile operations.
pub type Result<T> = std::result::Result<T, ProfileError>;

impl From<LocationError> for ProfileError {
    fn from(err: LocationError) -> Self {
        match err {
            LocationError::InvalidCoordinate { .. } => Self::InvalidCoordinate(err.to_string()),
            LocationError::InvalidRadius(_)
            | LocationError::InvalidDistance(_)
            | LocationError::InvalidBearing(_)
            | LocationError::ApproximationFailed { .. } => Self::Approximation(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_not_found_display() {
        let err = ProfileError::ProfileNotFound("42".to_string());
        assert_eq!(err.to_string(), "Profile not found: 42");
    }

    #[test]
    fn already_exists_display() {
        let err = ProfileError::AlreadyExists("owner u1".to_string());
        assert_eq!(err.to_string(), "Profile already exists: owner u1");
    }

    #[test]
    fn forbidden_display() {
        let err = ProfileError::Forbidden("cannot delete profile 3".to_string());
        assert_eq!(err.to_string(), "Forbidden: cannot delete profile 3");
    }

    #[test]
    fn invalid_name_display() {
        let err = ProfileError::InvalidName("name is empty".to_string());
        assert_eq!(err.to_string(), "Invalid name: name is empty");
    }

    #[test]
    fn invalid_coordinate_stays_a_validation_error() {
        let err: ProfileError = LocationError::InvalidCoordinate {
            latitude: 91.0,
            longitude: 0.0,
        }
        .into();
        assert!(matches!(err, ProfileError::InvalidCoordinate(_)));
        assert!(err.is_validation());
        assert!(!err.is_generic());
    }

    #[test]
    fn approximation_failures_are_not_validation_errors() {
        for source in [
            LocationError::InvalidRadius(0.0),
            LocationError::ApproximationFailed { attempts: 32 },
        ] {
            let err: ProfileError = source.into();
            assert!(matches!(err, ProfileError::Approximation(_)));
            assert!(!err.is_validation());
            assert!(err.is_generic());
        }
    }

    #[test]
    fn config_errors_are_distinct() {
        let err: ProfileError = ConfigError::Invalid("admin_id must not be empty".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Configuration error: Invalid config value: admin_id must not be empty"
        );
        assert!(!err.is_generic());
        assert!(!err.is_validation());
    }

    #[test]
    fn storage_errors_are_generic() {
        assert!(ProfileError::Storage("lock poisoned".to_string()).is_generic());
        assert!(ProfileError::Database(rusqlite::Error::InvalidQuery).is_generic());
        assert!(!ProfileError::MissingCaller.is_generic());
    }
}
