//! Location data types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{LocationError, Result};

/// Exclusive latitude bound in degrees. The poles themselves are rejected.
pub const MAX_LATITUDE: f64 = 90.0;

/// Exclusive longitude bound in degrees. The antimeridian is rejected.
pub const MAX_LONGITUDE: f64 = 180.0;

/// A validated geographic coordinate in decimal degrees.
///
/// Both components lie strictly inside their ranges:
/// `-90 < latitude < 90` and `-180 < longitude < 180`. A `Coordinate`
/// can only be obtained through [`Coordinate::new`] (or deserialization,
/// which runs the same checks), so holding one is proof of validity.
///
/// # Examples
///
/// ```
/// use safeloc_core::location::Coordinate;
///
/// let home = Coordinate::new(56.32, 65.23).unwrap();
/// assert_eq!(home.latitude(), 56.32);
///
/// assert!(Coordinate::new(90.0, 0.0).is_err()); // North Pole
/// assert!(Coordinate::new(0.0, -180.0).is_err()); // antimeridian
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate after validating both components.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::InvalidCoordinate`] if either value is not
    /// finite or lies on or outside its bound.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        // NaN fails both comparisons, infinities fail one of them.
        let lat_ok = latitude > -MAX_LATITUDE && latitude < MAX_LATITUDE;
        let lon_ok = longitude > -MAX_LONGITUDE && longitude < MAX_LONGITUDE;

        if lat_ok && lon_ok {
            Ok(Self {
                latitude,
                longitude,
            })
        } else {
            Err(LocationError::InvalidCoordinate {
                latitude,
                longitude,
            })
        }
    }

    /// Latitude in decimal degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in decimal degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lat: {}, lon: {}", self.latitude, self.longitude)
    }
}

/// Unchecked wire shape, only used to route deserialization through
/// [`Coordinate::new`].
#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = LocationError;

    fn try_from(raw: RawCoordinate) -> Result<Self> {
        Self::new(raw.latitude, raw.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_interior_values() {
        let coord = Coordinate::new(56.32, 65.23).unwrap();
        assert_eq!(coord.latitude(), 56.32);
        assert_eq!(coord.longitude(), 65.23);

        assert!(Coordinate::new(0.0, 0.0).is_ok());
        assert!(Coordinate::new(89.999_999, 179.999_999).is_ok());
        assert!(Coordinate::new(-89.999_999, -179.999_999).is_ok());
    }

    #[test]
    fn rejects_poles() {
        assert!(Coordinate::new(90.0, 0.0).is_err());
        assert!(Coordinate::new(-90.0, 0.0).is_err());
    }

    #[test]
    fn rejects_antimeridian() {
        assert!(Coordinate::new(0.0, 180.0).is_err());
        assert!(Coordinate::new(0.0, -180.0).is_err());
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(Coordinate::new(91.0, 0.0).is_err());
        assert!(Coordinate::new(-91.0, 0.0).is_err());
        assert!(Coordinate::new(0.0, 181.0).is_err());
        assert!(Coordinate::new(0.0, -540.0).is_err());
    }

    #[test]
    fn rejects_non_finite() {
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::NAN).is_err());
        assert!(Coordinate::new(f64::INFINITY, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn error_carries_rejected_values() {
        let err = Coordinate::new(95.5, 12.0).unwrap_err();
        assert_eq!(
            err,
            LocationError::InvalidCoordinate {
                latitude: 95.5,
                longitude: 12.0
            }
        );
    }

    #[test]
    fn display_format() {
        let coord = Coordinate::new(25.235, 65.632).unwrap();
        assert_eq!(coord.to_string(), "lat: 25.235, lon: 65.632");
    }

    #[test]
    fn deserialize_validates() {
        let ok: Coordinate =
            serde_json::from_str(r#"{"latitude": 56.32, "longitude": 65.23}"#).unwrap();
        assert_eq!(ok, Coordinate::new(56.32, 65.23).unwrap());

        let pole = serde_json::from_str::<Coordinate>(r#"{"latitude": 90.0, "longitude": 0.0}"#);
        assert!(pole.is_err());
    }

    #[test]
    fn serializes_field_names() {
        let coord = Coordinate::new(1.5, -2.5).unwrap();
        let json = serde_json::to_string(&coord).unwrap();
        assert_eq!(json, r#"{"latitude":1.5,"longitude":-2.5}"#);
    }
}
