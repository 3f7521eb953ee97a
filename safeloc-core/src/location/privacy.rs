//! Privacy-focused location approximation.
//!
//! This module produces the "fake" location disclosed to callers who are
//! neither the profile owner nor the administrator. The fake point is drawn
//! from an annulus around the real one:
//!
//! - distance uniform in `[radius / 5, radius)`, so the offset is never
//!   trivially small
//! - bearing uniform in `[-90, 270)` degrees
//!
//! Sampling is uniform in distance and bearing, not uniform by area, so
//! points cluster slightly towards the inner ring.

use rand::Rng;

use super::error::{LocationError, Result};
use super::geodesy::{destination, distance_km};
use super::types::Coordinate;

/// Default maximum distance between a real and an approximate location.
pub const DEFAULT_APPROXIMATION_RADIUS_KM: f64 = 1.0;

/// Maximum number of draws before [`approximate`] gives up.
pub const MAX_APPROXIMATION_ATTEMPTS: u32 = 32;

/// The minimum offset is this fraction of the radius.
const MIN_DISTANCE_FRACTION: f64 = 0.2;

const BEARING_MIN_DEGREES: f64 = -90.0;
const BEARING_MAX_DEGREES: f64 = 270.0;

/// Produces an approximate location within `max_radius_km` of `real`.
///
/// Uses the thread-local random generator, so repeated calls with the same
/// input return different points. Every returned point satisfies
/// `0 < distance_km(real, result) <= max_radius_km`.
///
/// # Errors
///
/// - [`LocationError::InvalidRadius`] if `max_radius_km` is not finite and
///   positive
/// - [`LocationError::ApproximationFailed`] if no draw produced a valid
///   coordinate within the radius (only plausible right next to a pole)
///
/// # Examples
///
/// ```
/// use safeloc_core::location::{approximate, distance_km, Coordinate};
///
/// let real = Coordinate::new(25.235, 65.632).unwrap();
/// let fake = approximate(real, 1.0).unwrap();
///
/// let offset = distance_km(real, fake);
/// assert!(offset > 0.0 && offset <= 1.0);
/// ```
pub fn approximate(real: Coordinate, max_radius_km: f64) -> Result<Coordinate> {
    approximate_with(&mut rand::thread_rng(), real, max_radius_km)
}

/// Same as [`approximate`] with [`DEFAULT_APPROXIMATION_RADIUS_KM`].
///
/// # Errors
///
/// See [`approximate`].
pub fn approximate_default(real: Coordinate) -> Result<Coordinate> {
    approximate(real, DEFAULT_APPROXIMATION_RADIUS_KM)
}

/// Produces an approximate location using the supplied random generator.
///
/// Draws that project onto a pole or the antimeridian, or whose measured
/// geodesic distance falls outside `(0, max_radius_km]`, are discarded and
/// drawn again.
///
/// # Errors
///
/// See [`approximate`].
pub fn approximate_with<R: Rng + ?Sized>(
    rng: &mut R,
    real: Coordinate,
    max_radius_km: f64,
) -> Result<Coordinate> {
    if !max_radius_km.is_finite() || max_radius_km <= 0.0 {
        return Err(LocationError::InvalidRadius(max_radius_km));
    }

    let min_radius_km = max_radius_km * MIN_DISTANCE_FRACTION;

    for attempt in 1..=MAX_APPROXIMATION_ATTEMPTS {
        let distance = rng.gen_range(min_radius_km..max_radius_km);
        let bearing = rng.gen_range(BEARING_MIN_DEGREES..BEARING_MAX_DEGREES);

        let candidate = match destination(real, distance, bearing) {
            Ok(candidate) => candidate,
            Err(err) => {
                tracing::warn!(attempt, error = %err, "discarding approximation draw");
                continue;
            }
        };

        let offset = distance_km(real, candidate);
        if offset > 0.0 && offset <= max_radius_km {
            return Ok(candidate);
        }

        tracing::warn!(attempt, offset, max_radius_km, "approximation draw outside radius");
    }

    Err(LocationError::ApproximationFailed {
        attempts: MAX_APPROXIMATION_ATTEMPTS,
    })
}
