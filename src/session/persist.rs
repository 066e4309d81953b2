use serde::{Deserialize, Serialize};
use slotmap::Key;

use crate::error::{BoxError, PersistError};
use crate::operations::summary::LengthTotals;
use crate::topology::{EdgeData, EdgeId, EdgeSet, EdgeType};

/// One edge as handed to external storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub id: u64,
    pub edge_type: EdgeType,
    /// `[lat, lng]` pairs.
    pub geometry: Vec<[f64; 2]>,
    pub length_ft: f64,
    pub angle_to_north: f64,
    pub auto_detected: bool,
    pub confidence_score: u8,
    pub detection_reason: String,
    pub user_modified: bool,
    pub shared: bool,
    pub display_order: usize,
}

impl EdgeRecord {
    #[must_use]
    pub fn new(id: EdgeId, edge: &EdgeData) -> Self {
        Self {
            id: id.data().as_ffi(),
            edge_type: edge.edge_type,
            geometry: edge.geometry.iter().map(|p| p.to_array()).collect(),
            length_ft: edge.length_ft,
            angle_to_north: edge.angle_to_north,
            auto_detected: edge.auto_detected,
            confidence_score: edge.confidence_score,
            detection_reason: edge.detection_reason.clone(),
            user_modified: edge.user_modified,
            shared: edge.shared,
            display_order: edge.display_order,
        }
    }
}

/// Everything a save hands to the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavePayload {
    pub measurement_id: String,
    pub edges: Vec<EdgeRecord>,
    /// Length in feet per edge type.
    pub totals: LengthTotals,
}

impl SavePayload {
    #[must_use]
    pub fn new(measurement_id: impl Into<String>, edges: &EdgeSet) -> Self {
        Self {
            measurement_id: measurement_id.into(),
            edges: edges.iter().map(|(id, e)| EdgeRecord::new(id, e)).collect(),
            totals: LengthTotals::from_edges(edges),
        }
    }

    /// Encodes the payload as JSON.
    ///
    /// # Errors
    ///
    /// Returns `PersistError::Encode` if serialization fails.
    pub fn to_json(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// External storage for finished measurements.
///
/// Implementations either store the whole payload or fail; the session keeps
/// its edges either way so a failed save can be retried.
pub trait MeasurementStore {
    /// Stores the payload under `payload.measurement_id`.
    ///
    /// # Errors
    ///
    /// Returns whatever error the backing store reports.
    fn save_edges(&mut self, payload: &SavePayload) -> Result<(), BoxError>;
}
