//! Location module for SafeLocation.
//!
//! Provides the geographic building blocks of the service:
//! - [`Coordinate`], a latitude/longitude pair validated on construction
//! - Geodesic distance and destination-point projection on WGS-84
//! - Randomized approximation of a real location within a bounded radius
//!
//! # Privacy Guarantees
//!
//! - An approximate location is never closer than one fifth of the radius
//! - An approximate location is never farther than the radius
//! - The bound holds for every draw, not just on average
//!
//! # Example Usage
//!
//! ```
//! use safeloc_core::location::{approximate, distance_km, Coordinate};
//!
//! let real = Coordinate::new(56.32, 65.23).unwrap();
//! let fake = approximate(real, 1.0).unwrap();
//!
//! let offset = distance_km(real, fake);
//! assert!(offset > 0.0 && offset <= 1.0);
//! ```

mod error;
pub mod geodesy;
pub mod privacy;
pub mod types;

pub use error::{LocationError, Result};
pub use geodesy::{destination, distance_km};
pub use privacy::{
    approximate, approximate_default, approximate_with, DEFAULT_APPROXIMATION_RADIUS_KM,
};
pub use types::Coordinate;
