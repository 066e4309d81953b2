use super::{chord, GeoPoint, TOLERANCE};

/// Angle in degrees between two polylines, each taken as the vector from its
/// first to its last point. Result lies in `[0, 180]`.
///
/// Returns `0.0` if either vector is degenerate.
#[must_use]
pub fn angle_between(a: &[GeoPoint], b: &[GeoPoint]) -> f64 {
    let (Some(va), Some(vb)) = (chord(a), chord(b)) else {
        return 0.0;
    };
    let (na, nb) = (va.norm(), vb.norm());
    if na < TOLERANCE || nb < TOLERANCE {
        return 0.0;
    }
    let cos = (va.dot(&vb) / (na * nb)).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// `true` if `angle mod 180` is within `tolerance` of 0 or 180.
#[must_use]
pub fn is_nearly_horizontal(angle: f64, tolerance: f64) -> bool {
    let a = angle.rem_euclid(180.0);
    a < tolerance || a > 180.0 - tolerance
}

/// `true` if the angle is within `tolerance` of perpendicular to horizontal.
#[must_use]
pub fn is_nearly_vertical(angle: f64, tolerance: f64) -> bool {
    is_nearly_horizontal(angle + 90.0, tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn seg(dx: f64, dy: f64) -> [GeoPoint; 2] {
        [GeoPoint::new(0.0, 0.0), GeoPoint::new(dy, dx)]
    }

    #[test]
    fn right_angle() {
        assert_relative_eq!(angle_between(&seg(1.0, 0.0), &seg(0.0, 1.0)), 90.0, epsilon = 1e-9);
    }

    #[test]
    fn parallel_and_opposite() {
        assert_relative_eq!(angle_between(&seg(1.0, 1.0), &seg(2.0, 2.0)), 0.0, epsilon = 1e-5);
        assert_relative_eq!(angle_between(&seg(1.0, 1.0), &seg(-3.0, -3.0)), 180.0, epsilon = 1e-5);
    }

    #[test]
    fn sixty_degrees() {
        let a = seg(1.0, 0.0);
        let b = seg(0.5, 3.0_f64.sqrt() / 2.0);
        assert_relative_eq!(angle_between(&a, &b), 60.0, epsilon = 1e-9);
    }

    #[test]
    fn degenerate_angle_is_zero() {
        assert!(angle_between(&seg(0.0, 0.0), &seg(1.0, 0.0)).abs() < f64::EPSILON);
        assert!(angle_between(&[], &seg(1.0, 0.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn horizontal_band() {
        assert!(is_nearly_horizontal(0.0, 15.0));
        assert!(is_nearly_horizontal(10.0, 15.0));
        assert!(is_nearly_horizontal(350.0, 15.0));
        assert!(is_nearly_horizontal(175.0, 15.0));
        assert!(is_nearly_horizontal(190.0, 15.0));
        assert!(!is_nearly_horizontal(45.0, 15.0));
        assert!(!is_nearly_horizontal(90.0, 15.0));
    }

    #[test]
    fn vertical_band() {
        assert!(is_nearly_vertical(90.0, 20.0));
        assert!(is_nearly_vertical(85.0, 20.0));
        assert!(is_nearly_vertical(260.0, 20.0));
        assert!(!is_nearly_vertical(0.0, 20.0));
        assert!(!is_nearly_vertical(45.0, 20.0));
    }
}
