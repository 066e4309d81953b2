use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, Result};
use crate::math::geodesy::{bearing_to_north, geodesic_length_ft};
use crate::math::GeoPoint;

use super::facet::FacetId;

slotmap::new_key_type! {
    /// Unique identifier for an edge, stable for the lifetime of a session.
    pub struct EdgeId;
}

/// Architectural role of a roof edge.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EdgeType {
    /// Horizontal peak where two facets meet at the top.
    Ridge,
    /// Convex sloped edge between two facets.
    Hip,
    /// Concave sloped edge between two facets.
    Valley,
    /// Lowest perimeter edge of a facet.
    Eave,
    /// Sloped gable-end edge.
    Rake,
    /// Small isolated feature such as a chimney or vent.
    Penetration,
    #[default]
    Unlabeled,
}

impl EdgeType {
    /// All edge types, in reporting order.
    pub const ALL: [EdgeType; 7] = [
        EdgeType::Ridge,
        EdgeType::Hip,
        EdgeType::Valley,
        EdgeType::Eave,
        EdgeType::Rake,
        EdgeType::Penetration,
        EdgeType::Unlabeled,
    ];
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EdgeType::Ridge => "ridge",
            EdgeType::Hip => "hip",
            EdgeType::Valley => "valley",
            EdgeType::Eave => "eave",
            EdgeType::Rake => "rake",
            EdgeType::Penetration => "penetration",
            EdgeType::Unlabeled => "unlabeled",
        })
    }
}

/// One boundary segment of one or more roof facets, plus its labeling state.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeData {
    /// Start and end point, or a short polyline between them.
    pub geometry: Vec<GeoPoint>,
    pub edge_type: EdgeType,
    /// Geodesic length in feet.
    pub length_ft: f64,
    /// Bearing of the chord, `[0, 360)`.
    pub angle_to_north: f64,
    /// Relative height rank (1 = highest), when supplied externally.
    pub elevation_rank: Option<u32>,
    /// `edge_type` came from the classifier rather than the user.
    pub auto_detected: bool,
    /// Classifier certainty, 0–100.
    pub confidence_score: u8,
    pub detection_reason: String,
    /// Locked: auto-detect passes leave this edge alone.
    pub user_modified: bool,
    /// Edges sharing an endpoint with this one.
    pub connects_to: BTreeSet<EdgeId>,
    pub display_order: usize,
    /// Facets this edge bounds.
    pub facets: Vec<FacetId>,
    /// Bounds two or more facets.
    pub shared: bool,
}

impl EdgeData {
    /// Creates an unlabeled edge with length and bearing precomputed.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two points are given or any coordinate
    /// is not finite.
    pub fn new(geometry: Vec<GeoPoint>) -> Result<Self> {
        if geometry.len() < 2 {
            return Err(GeometryError::TooFewEdgePoints(geometry.len()).into());
        }
        for p in &geometry {
            p.validate()?;
        }
        let mut edge = Self {
            geometry,
            edge_type: EdgeType::Unlabeled,
            length_ft: 0.0,
            angle_to_north: 0.0,
            elevation_rank: None,
            auto_detected: false,
            confidence_score: 0,
            detection_reason: String::new(),
            user_modified: false,
            connects_to: BTreeSet::new(),
            display_order: 0,
            facets: Vec::new(),
            shared: false,
        };
        edge.refresh_measurements();
        Ok(edge)
    }

    /// Sets the elevation rank, builder style.
    #[must_use]
    pub fn with_elevation_rank(mut self, rank: u32) -> Self {
        self.elevation_rank = Some(rank);
        self
    }

    /// Recomputes `length_ft` and `angle_to_north` from `geometry`.
    pub fn refresh_measurements(&mut self) {
        self.length_ft = geodesic_length_ft(&self.geometry);
        self.angle_to_north = bearing_to_north(&self.geometry);
    }

    /// First and last point of the geometry.
    #[must_use]
    pub fn endpoints(&self) -> Option<(GeoPoint, GeoPoint)> {
        match (self.geometry.first(), self.geometry.last()) {
            (Some(a), Some(b)) => Some((*a, *b)),
            _ => None,
        }
    }

    /// Returns the edge to the unlabeled, unlocked state. Geometry,
    /// connectivity and elevation rank are kept.
    pub fn clear_label(&mut self) {
        self.edge_type = EdgeType::Unlabeled;
        self.auto_detected = false;
        self.confidence_score = 0;
        self.detection_reason.clear();
        self.user_modified = false;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_edge_is_unlabeled_with_measurements() {
        let edge = EdgeData::new(vec![GeoPoint::new(40.0, -75.0), GeoPoint::new(40.0, -74.9999)])
            .unwrap();
        assert_eq!(edge.edge_type, EdgeType::Unlabeled);
        assert_eq!(edge.confidence_score, 0);
        assert!(!edge.auto_detected && !edge.user_modified);
        assert!((edge.angle_to_north - 90.0).abs() < 1e-9);
        assert!(edge.length_ft > 25.0 && edge.length_ft < 30.0);
    }

    #[test]
    fn single_point_rejected() {
        assert!(EdgeData::new(vec![GeoPoint::new(0.0, 0.0)]).is_err());
        assert!(EdgeData::new(vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(f64::NAN, 0.0)]).is_err());
    }

    #[test]
    fn clear_label_keeps_geometry() {
        let mut edge = EdgeData::new(vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(1e-4, 0.0)])
            .unwrap()
            .with_elevation_rank(1);
        edge.edge_type = EdgeType::Ridge;
        edge.user_modified = true;
        edge.confidence_score = 95;
        edge.detection_reason = "x".into();
        edge.clear_label();
        assert_eq!(edge.edge_type, EdgeType::Unlabeled);
        assert!(!edge.user_modified);
        assert_eq!(edge.confidence_score, 0);
        assert!(edge.detection_reason.is_empty());
        assert_eq!(edge.elevation_rank, Some(1));
        assert_eq!(edge.geometry.len(), 2);
    }

    #[test]
    fn display_matches_serde_name() {
        for t in EdgeType::ALL {
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{t}\""));
        }
    }
}
