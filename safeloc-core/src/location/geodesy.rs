//! Geodesic distance and projection on the WGS-84 ellipsoid.
//!
//! Both directions use Vincenty's formulae:
//! - [`distance_km`] solves the inverse problem (two points to a length)
//! - [`destination`] solves the direct problem (point, length and bearing
//!   to a second point)
//!
//! Accuracy is well below a millimetre for the short distances used by the
//! obfuscator.

use super::error::{LocationError, Result};
use super::types::{Coordinate, MAX_LONGITUDE};

/// WGS-84 equatorial radius in meters.
pub const WGS84_SEMI_MAJOR_AXIS_M: f64 = 6_378_137.0;

/// WGS-84 flattening.
pub const WGS84_FLATTENING: f64 = 1.0 / 298.257_223_563;

/// WGS-84 polar radius in meters.
pub const WGS84_SEMI_MINOR_AXIS_M: f64 = WGS84_SEMI_MAJOR_AXIS_M * (1.0 - WGS84_FLATTENING);

/// Mean Earth radius (IUGG) used when the inverse iteration cannot converge.
const MEAN_EARTH_RADIUS_M: f64 = 6_371_008.8;

const CONVERGENCE_THRESHOLD: f64 = 1e-12;
const MAX_ITERATIONS: u32 = 200;

/// Returns the geodesic distance between two coordinates in kilometers.
///
/// The result is `0.0` exactly when the coordinates are identical and does
/// not depend on argument order. Nearly antipodal pairs, where Vincenty's
/// iteration does not converge, fall back to the great-circle distance on
/// the mean Earth radius. So do distinct points too close for the ellipsoid
/// formula to tell apart.
///
/// # Examples
///
/// ```
/// use safeloc_core::location::{distance_km, Coordinate};
///
/// let a = Coordinate::new(0.0, 0.0).unwrap();
/// let b = Coordinate::new(0.0, 1.0).unwrap();
///
/// // One degree of longitude along the equator.
/// assert!((distance_km(a, b) - 111.319_490_8).abs() < 1e-6);
/// assert_eq!(distance_km(a, b), distance_km(b, a));
/// ```
#[must_use]
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    if a == b {
        return 0.0;
    }

    // Evaluate in a fixed order so swapping arguments is bit-for-bit symmetric.
    let (from, to) = if (a.latitude(), a.longitude()) <= (b.latitude(), b.longitude()) {
        (a, b)
    } else {
        (b, a)
    };

    // Vincenty collapses to zero for antipodes and for points closer than
    // its reduced-latitude terms can resolve.
    let meters = vincenty_inverse_m(from, to)
        .filter(|m| *m > 0.0)
        .unwrap_or_else(|| great_circle_m(from, to));

    // Distinct points never measure zero, even below float resolution.
    (meters / 1000.0).max(f64::MIN_POSITIVE)
}

/// Projects a point `distance_km` from `origin` along `bearing_degrees`.
///
/// The bearing is measured clockwise from north and taken modulo 360, so
/// `-90` and `270` are the same direction. The resulting longitude is
/// wrapped into `[-180, 180)`.
///
/// # Errors
///
/// - [`LocationError::InvalidDistance`] for a negative or non-finite distance
/// - [`LocationError::InvalidBearing`] for a non-finite bearing
/// - [`LocationError::InvalidCoordinate`] when the projection lands exactly
///   on a pole or on the antimeridian; such results are rejected, not clamped
///
/// # Examples
///
/// ```
/// use safeloc_core::location::{destination, distance_km, Coordinate};
///
/// let origin = Coordinate::new(56.32, 65.23).unwrap();
/// let moved = destination(origin, 0.5, 45.0).unwrap();
///
/// assert!((distance_km(origin, moved) - 0.5).abs() < 1e-6);
/// ```
pub fn destination(origin: Coordinate, distance_km: f64, bearing_degrees: f64) -> Result<Coordinate> {
    if !distance_km.is_finite() || distance_km < 0.0 {
        return Err(LocationError::InvalidDistance(distance_km));
    }
    if !bearing_degrees.is_finite() {
        return Err(LocationError::InvalidBearing(bearing_degrees));
    }
    if distance_km == 0.0 {
        return Ok(origin);
    }

    let f = WGS84_FLATTENING;
    let b = WGS84_SEMI_MINOR_AXIS_M;
    let s = distance_km * 1000.0;

    let alpha1 = bearing_degrees.rem_euclid(360.0).to_radians();
    let (sin_alpha1, cos_alpha1) = alpha1.sin_cos();

    // Reduced latitude on the auxiliary sphere.
    let tan_u1 = (1.0 - f) * origin.latitude().to_radians().tan();
    let cos_u1 = 1.0 / tan_u1.mul_add(tan_u1, 1.0).sqrt();
    let sin_u1 = tan_u1 * cos_u1;

    let sigma1 = tan_u1.atan2(cos_alpha1);
    let sin_alpha = cos_u1 * sin_alpha1;
    let cos_sq_alpha = sin_alpha.mul_add(-sin_alpha, 1.0);
    let (big_a, big_b) = ellipsoid_series(cos_sq_alpha);

    let first_sigma = s / (b * big_a);
    let mut sigma = first_sigma;
    let mut sin_sigma;
    let mut cos_sigma;
    let mut cos_2sigma_m;
    let mut iterations = 0;
    loop {
        cos_2sigma_m = 2.0_f64.mul_add(sigma1, sigma).cos();
        (sin_sigma, cos_sigma) = sigma.sin_cos();
        let previous = sigma;
        sigma = first_sigma + delta_sigma(big_b, sin_sigma, cos_sigma, cos_2sigma_m);
        iterations += 1;
        if (sigma - previous).abs() < CONVERGENCE_THRESHOLD || iterations >= MAX_ITERATIONS {
            break;
        }
    }

    let tmp = sin_u1 * sin_sigma - cos_u1 * cos_sigma * cos_alpha1;
    let lat2 = (sin_u1 * cos_sigma + cos_u1 * sin_sigma * cos_alpha1)
        .atan2((1.0 - f) * sin_alpha.hypot(tmp));
    let lambda =
        (sin_sigma * sin_alpha1).atan2(cos_u1 * cos_sigma - sin_u1 * sin_sigma * cos_alpha1);
    let c = f / 16.0 * cos_sq_alpha * f.mul_add(3.0_f64.mul_add(-cos_sq_alpha, 4.0), 4.0);
    let l = lambda
        - (1.0 - c)
            * f
            * sin_alpha
            * (sigma
                + c * sin_sigma
                    * (cos_2sigma_m
                        + c * cos_sigma * (2.0 * cos_2sigma_m).mul_add(cos_2sigma_m, -1.0)));

    let lon2 = normalize_longitude(origin.longitude() + l.to_degrees());
    Coordinate::new(lat2.to_degrees(), lon2)
}

/// Wraps a longitude in degrees into `[-180, 180)`.
#[must_use]
pub fn normalize_longitude(longitude: f64) -> f64 {
    (longitude + MAX_LONGITUDE).rem_euclid(2.0 * MAX_LONGITUDE) - MAX_LONGITUDE
}

/// Vincenty inverse. Returns `None` if the iteration does not converge.
fn vincenty_inverse_m(from: Coordinate, to: Coordinate) -> Option<f64> {
    let f = WGS84_FLATTENING;
    let b = WGS84_SEMI_MINOR_AXIS_M;

    let l = (to.longitude() - from.longitude()).to_radians();
    let u1 = ((1.0 - f) * from.latitude().to_radians().tan()).atan();
    let u2 = ((1.0 - f) * to.latitude().to_radians().tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;
    for _ in 0..MAX_ITERATIONS {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        let sin_sigma =
            (cos_u2 * sin_lambda).hypot(cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda);
        if sin_sigma == 0.0 {
            return Some(0.0);
        }

        let cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        let sigma = sin_sigma.atan2(cos_sigma);
        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        let cos_sq_alpha = sin_alpha.mul_add(-sin_alpha, 1.0);

        // Both points on the equator.
        let cos_2sigma_m = if cos_sq_alpha == 0.0 {
            0.0
        } else {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        };

        let c = f / 16.0 * cos_sq_alpha * f.mul_add(3.0_f64.mul_add(-cos_sq_alpha, 4.0), 4.0);
        let previous = lambda;
        lambda = l
            + (1.0 - c)
                * f
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m
                            + c * cos_sigma * (2.0 * cos_2sigma_m).mul_add(cos_2sigma_m, -1.0)));

        if (lambda - previous).abs() < CONVERGENCE_THRESHOLD {
            let (big_a, big_b) = ellipsoid_series(cos_sq_alpha);
            let delta = delta_sigma(big_b, sin_sigma, cos_sigma, cos_2sigma_m);
            return Some(b * big_a * (sigma - delta));
        }
    }

    None
}

/// Vincenty's `A` and `B` coefficients for a given `cos²α`.
fn ellipsoid_series(cos_sq_alpha: f64) -> (f64, f64) {
    let a_sq = WGS84_SEMI_MAJOR_AXIS_M * WGS84_SEMI_MAJOR_AXIS_M;
    let b_sq = WGS84_SEMI_MINOR_AXIS_M * WGS84_SEMI_MINOR_AXIS_M;
    let u_sq = cos_sq_alpha * (a_sq - b_sq) / b_sq;

    let big_a = 1.0
        + u_sq / 16_384.0
            * (4096.0 + u_sq * (-768.0 + u_sq * 175.0_f64.mul_add(-u_sq, 320.0)));
    let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * 47.0_f64.mul_add(-u_sq, 74.0)));
    (big_a, big_b)
}

fn delta_sigma(big_b: f64, sin_sigma: f64, cos_sigma: f64, cos_2sigma_m: f64) -> f64 {
    let cos_2sigma_m_sq = cos_2sigma_m * cos_2sigma_m;
    big_b
        * sin_sigma
        * (cos_2sigma_m
            + big_b / 4.0
                * (cos_sigma * 2.0_f64.mul_add(cos_2sigma_m_sq, -1.0)
                    - big_b / 6.0
                        * cos_2sigma_m
                        * (4.0 * sin_sigma).mul_add(sin_sigma, -3.0)
                        * 4.0_f64.mul_add(cos_2sigma_m_sq, -3.0)))
}

/// Haversine distance on a sphere of mean Earth radius.
fn great_circle_m(from: Coordinate, to: Coordinate) -> f64 {
    let lat1 = from.latitude().to_radians();
    let lat2 = to.latitude().to_radians();
    let d_lat = (to.latitude() - from.latitude()).to_radians();
    let d_lon = (to.longitude() - from.longitude()).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * MEAN_EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}
