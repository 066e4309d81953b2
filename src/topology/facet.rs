use crate::error::{GeometryError, Result};
use crate::math::{GeoPoint, TOLERANCE};

slotmap::new_key_type! {
    /// Unique identifier for a facet in the facet store.
    pub struct FacetId;
}

/// One planar roof surface, a closed polygon of boundary points.
///
/// The ring is stored open, with consecutive repeated points collapsed and
/// a trailing point equal to the first dropped.
#[derive(Debug, Clone)]
pub struct FacetData {
    points: Vec<GeoPoint>,
}

impl FacetData {
    /// Creates a facet from its boundary ring.
    ///
    /// # Errors
    ///
    /// Returns an error if a coordinate is not finite or fewer than three
    /// distinct points remain once repeats are collapsed.
    pub fn new(mut points: Vec<GeoPoint>) -> Result<Self> {
        for p in &points {
            p.validate()?;
        }
        let given = points.len();
        points.dedup_by(|next, prev| prev.coincides(next, TOLERANCE));
        while points.len() > 1
            && points
                .first()
                .zip(points.last())
                .is_some_and(|(first, last)| first.coincides(last, TOLERANCE))
        {
            points.pop();
        }
        if points.len() < given {
            tracing::debug!(given, kept = points.len(), "repeated facet points collapsed");
        }
        if points.len() < 3 {
            return Err(GeometryError::TooFewFacetPoints(points.len()).into());
        }
        Ok(Self { points })
    }

    /// Boundary points in drawing order.
    #[must_use]
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    /// Consecutive point pairs, wrapping from the last point to the first.
    pub fn segments(&self) -> impl Iterator<Item = (GeoPoint, GeoPoint)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn triangle() -> Vec<GeoPoint> {
        vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 1.0),
            GeoPoint::new(1.0, 0.0),
        ]
    }

    #[test]
    fn segments_wrap() {
        let facet = FacetData::new(triangle()).unwrap();
        let segs: Vec<_> = facet.segments().collect();
        assert_eq!(segs.len(), 3);
        assert_eq!(segs[2].0, GeoPoint::new(1.0, 0.0));
        assert_eq!(segs[2].1, GeoPoint::new(0.0, 0.0));
    }

    #[test]
    fn closing_point_dropped() {
        let mut ring = triangle();
        ring.push(ring[0]);
        let facet = FacetData::new(ring).unwrap();
        assert_eq!(facet.points().len(), 3);
    }

    #[test]
    fn repeated_points_collapse() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 1.0);
        let c = GeoPoint::new(1.0, 0.0);
        let facet = FacetData::new(vec![a, a, b, b, b, c, a, a]).unwrap();
        assert_eq!(facet.points(), &[a, b, c]);
    }

    #[test]
    fn too_few_points() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 1.0);
        for ring in [vec![a, b, a], vec![a, b, b], vec![a, a, a, a]] {
            assert!(matches!(
                FacetData::new(ring),
                Err(crate::RooflineError::Geometry(GeometryError::TooFewFacetPoints(n))) if n < 3
            ));
        }
    }
}
