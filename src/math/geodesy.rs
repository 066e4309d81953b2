use super::{chord, GeoPoint, EARTH_RADIUS_M, FEET_PER_METER, TOLERANCE};

/// Great-circle distance between two points in meters (haversine formula).
#[must_use]
pub fn haversine_m(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let d_phi = (b.lat - a.lat).to_radians();
    let d_lambda = (b.lng - a.lng).to_radians();

    let h = (d_phi * 0.5).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda * 0.5).sin().powi(2);
    // Rounding can push h a hair past 1 for antipodal input.
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}

/// Sums the haversine distances between consecutive points, in feet.
///
/// Fewer than two points yield `0.0`.
#[must_use]
pub fn geodesic_length_ft(points: &[GeoPoint]) -> f64 {
    let meters: f64 = points.windows(2).map(|w| haversine_m(&w[0], &w[1])).sum();
    meters * FEET_PER_METER
}

/// Bearing from the first to the last point in degrees, `[0, 360)`.
///
/// Computed as `atan2(Δlng, Δlat)` in flat lng/lat space, which is only
/// meaningful at building scale. Degenerate input (fewer than two points or
/// coincident endpoints) returns `0.0`.
#[must_use]
pub fn bearing_to_north(points: &[GeoPoint]) -> f64 {
    let Some(v) = chord(points) else {
        return 0.0;
    };
    if v.x.abs() < TOLERANCE && v.y.abs() < TOLERANCE {
        return 0.0;
    }
    let mut deg = v.x.atan2(v.y).to_degrees();
    if deg < 0.0 {
        deg += 360.0;
    }
    // -1e-15 + 360.0 rounds to exactly 360.0.
    if deg >= 360.0 {
        deg = 0.0;
    }
    deg
}
