//! Error types for coordinate validation and geodesic operations.

use thiserror::Error;

/// Error type for location operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocationError {
    /// Latitude or longitude outside the open ranges (-90, 90) / (-180, 180).
    #[error("Invalid coordinate: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate {
        /// Rejected latitude.
        latitude: f64,
        /// Rejected longitude.
        longitude: f64,
    },

    /// Approximation radius is not a finite positive number.
    #[error("Invalid approximation radius: {0} km")]
    InvalidRadius(f64),

    /// Projection distance is negative or not finite.
    #[error("Invalid distance: {0} km")]
    InvalidDistance(f64),

    /// Bearing is not finite.
    #[error("Invalid bearing: {0} degrees")]
    InvalidBearing(f64),

    /// Every draw landed outside the valid coordinate space or the radius.
    #[error("Could not approximate location after {attempts} attempts")]
    ApproximationFailed {
        /// Number of draws made.
        attempts: u32,
    },
}

/// Result type alias for location operations.
pub type Result<T> = std::result::Result<T, LocationError>;
