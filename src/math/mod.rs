pub mod angle;
pub mod geodesy;

use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, Result};

/// 2D vector type, `x = Δlng`, `y = Δlat`.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Mean Earth radius used by the haversine formula, in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Meters to feet.
pub const FEET_PER_METER: f64 = 3.28084;

/// Default tolerance (degrees) under which two coordinates are the same corner.
pub const COORD_TOLERANCE: f64 = 1e-5;

/// Vectors shorter than this (in degrees) are treated as degenerate.
pub const TOLERANCE: f64 = 1e-12;

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Creates a new point from latitude and longitude.
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns an error if either coordinate is not finite.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinite` for NaN or infinite coordinates.
    pub fn validate(&self) -> Result<()> {
        if self.lat.is_finite() && self.lng.is_finite() {
            Ok(())
        } else {
            Err(GeometryError::NonFinite {
                lat: self.lat,
                lng: self.lng,
            }
            .into())
        }
    }

    /// Returns `true` if both coordinates differ by less than `tolerance`.
    #[must_use]
    pub fn coincides(&self, other: &GeoPoint, tolerance: f64) -> bool {
        (self.lat - other.lat).abs() < tolerance && (self.lng - other.lng).abs() < tolerance
    }

    /// Flat-space vector from `self` to `other`.
    #[must_use]
    pub fn delta_to(&self, other: &GeoPoint) -> Vector2 {
        Vector2::new(other.lng - self.lng, other.lat - self.lat)
    }

    /// `[lat, lng]` pair, as handed to external collaborators.
    #[must_use]
    pub fn to_array(self) -> [f64; 2] {
        [self.lat, self.lng]
    }
}

/// Vector from the first to the last point of a polyline, or `None` if it
/// has fewer than two points.
#[must_use]
pub fn chord(points: &[GeoPoint]) -> Option<Vector2> {
    match (points.first(), points.last()) {
        (Some(a), Some(b)) if points.len() >= 2 => Some(a.delta_to(b)),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn coincides_within_tolerance() {
        let a = GeoPoint::new(40.0, -75.0);
        let b = GeoPoint::new(40.000_005, -75.000_005);
        assert!(a.coincides(&b, COORD_TOLERANCE));
        assert!(b.coincides(&a, COORD_TOLERANCE));
    }

    #[test]
    fn coincides_needs_both_axes() {
        let a = GeoPoint::new(40.0, -75.0);
        let b = GeoPoint::new(40.0, -75.0001);
        assert!(!a.coincides(&b, COORD_TOLERANCE));
    }

    #[test]
    fn validate_rejects_nan() {
        assert!(GeoPoint::new(f64::NAN, 0.0).validate().is_err());
        assert!(GeoPoint::new(1.0, f64::INFINITY).validate().is_err());
        assert!(GeoPoint::new(1.0, 2.0).validate().is_ok());
    }

    #[test]
    fn chord_of_short_polyline() {
        assert!(chord(&[GeoPoint::new(0.0, 0.0)]).is_none());
        let v = chord(&[
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(5.0, 5.0),
            GeoPoint::new(1.0, 2.0),
        ])
        .unwrap();
        assert!((v.x - 2.0).abs() < f64::EPSILON);
        assert!((v.y - 1.0).abs() < f64::EPSILON);
    }
}
