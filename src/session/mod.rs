mod history;
pub mod persist;

use history::History;
pub use persist::{EdgeRecord, MeasurementStore, SavePayload};

use crate::config::ClassifierConfig;
use crate::error::{PersistError, Result, SessionError};
use crate::math::GeoPoint;
use crate::operations::classify::{auto_detect_all_edges, AutoDetectReport};
use crate::operations::extract::ExtractEdges;
use crate::operations::summary::{LabelStats, LengthTotals};
use crate::topology::connectivity::resolve_connectivity;
use crate::topology::{EdgeData, EdgeId, EdgeSet, EdgeType, FacetStore};

/// Where a labeling session is in its lifecycle.
///
/// `Detecting`, `Editing` and `Saving` are only held for the duration of the
/// call that enters them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Detecting,
    Reviewing,
    Editing,
    Saving,
    Saved,
    Cancelled,
}

impl SessionState {
    /// `true` once the session has been saved or cancelled.
    #[must_use]
    pub fn is_closed(self) -> bool {
        matches!(self, SessionState::Saved | SessionState::Cancelled)
    }
}

/// Mutable working set of edges for one measurement, with undo/redo.
///
/// Every mutating call that changes at least one edge records a full
/// snapshot; undo and redo restore those snapshots. Once saved or cancelled,
/// mutating calls fail with [`SessionError::Closed`].
#[derive(Debug)]
pub struct LabelingSession {
    edges: EdgeSet,
    history: History<EdgeSet>,
    config: ClassifierConfig,
    state: SessionState,
}

impl LabelingSession {
    /// Starts a session from drawn facets: extracts deduplicated edges,
    /// measures them and resolves connectivity.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or a facet segment cannot
    /// form an edge.
    pub fn new(facets: &FacetStore, config: ClassifierConfig) -> Result<Self> {
        config.validate()?;
        let edges = ExtractEdges::new(config.connection_tolerance_deg).execute(facets)?;
        Ok(Self::start(edges, config))
    }

    /// Starts a session from raw polygons, one facet each.
    ///
    /// # Errors
    ///
    /// Returns an error if a polygon is not a valid facet or the config is
    /// invalid.
    pub fn from_polygons<I>(polygons: I, config: ClassifierConfig) -> Result<Self>
    where
        I: IntoIterator<Item = Vec<GeoPoint>>,
    {
        Self::new(&FacetStore::from_polygons(polygons)?, config)
    }

    /// Starts a session over an existing edge collection, e.g. one loaded
    /// back from storage. Connectivity is recomputed.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid.
    pub fn from_edges(mut edges: EdgeSet, config: ClassifierConfig) -> Result<Self> {
        config.validate()?;
        resolve_connectivity(&mut edges, config.connection_tolerance_deg);
        Ok(Self::start(edges, config))
    }

    fn start(edges: EdgeSet, config: ClassifierConfig) -> Self {
        tracing::info!(edges = edges.len(), "labeling session started");
        Self {
            history: History::new(edges.clone()),
            edges,
            config,
            state: SessionState::Idle,
        }
    }

    #[must_use]
    pub fn edges(&self) -> &EdgeSet {
        &self.edges
    }

    /// Returns the edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the id does not belong to this session.
    pub fn edge(&self, id: EdgeId) -> Result<&EdgeData> {
        self.edges.edge(id)
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.state.is_closed() && self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.state.is_closed() && self.history.can_redo()
    }

    /// Number of snapshots recorded, including the initial one.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    #[must_use]
    pub fn stats(&self) -> LabelStats {
        LabelStats::from_edges(&self.edges, self.config.high_confidence_threshold)
    }

    #[must_use]
    pub fn totals(&self) -> LengthTotals {
        LengthTotals::from_edges(&self.edges)
    }

    /// Classifies every unlocked edge and records a snapshot.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Closed` if the session is saved or cancelled.
    pub fn auto_detect(&mut self) -> Result<AutoDetectReport> {
        self.ensure_open()?;
        self.state = SessionState::Detecting;
        let report = auto_detect_all_edges(&mut self.edges, &self.config);
        self.commit();
        self.state = SessionState::Reviewing;
        tracing::info!(
            classified = report.classified,
            locked = report.locked,
            unlabeled = report.unlabeled,
            "auto-detect complete"
        );
        Ok(report)
    }

    /// Sets an edge's type by hand and locks it against auto-detect.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is closed or the id is unknown.
    pub fn relabel(&mut self, id: EdgeId, edge_type: EdgeType) -> Result<()> {
        self.ensure_open()?;
        let edge = self.edges.edge_mut(id)?;
        self.state = SessionState::Editing;
        edge.edge_type = edge_type;
        edge.user_modified = true;
        edge.auto_detected = false;
        tracing::info!(edge = edge.display_order, %edge_type, "edge relabeled");
        self.commit();
        self.state = SessionState::Reviewing;
        Ok(())
    }

    /// Locks every pending suggestion at or above the configured
    /// high-confidence threshold. Returns how many edges were accepted.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Closed` if the session is saved or cancelled.
    pub fn accept_high_confidence(&mut self) -> Result<usize> {
        self.accept(Some(self.config.high_confidence_threshold))
    }

    /// Like [`Self::accept_high_confidence`] with no confidence floor.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Closed` if the session is saved or cancelled.
    pub fn accept_all_suggestions(&mut self) -> Result<usize> {
        self.accept(None)
    }

    fn accept(&mut self, min_confidence: Option<u8>) -> Result<usize> {
        self.ensure_open()?;
        let mut accepted = 0;
        for (_, edge) in self.edges.iter_mut() {
            if !edge.auto_detected || edge.user_modified {
                continue;
            }
            if min_confidence.is_some_and(|min| edge.confidence_score < min) {
                continue;
            }
            edge.user_modified = true;
            accepted += 1;
        }
        // Unlike the other bulk actions, an accept that locks nothing leaves
        // history untouched instead of recording an identical snapshot.
        if accepted > 0 {
            self.commit();
            self.state = SessionState::Reviewing;
        }
        tracing::info!(accepted, ?min_confidence, "suggestions accepted");
        Ok(accepted)
    }

    /// Restores the previous snapshot. Returns `false` at the start of history.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Closed` if the session is saved or cancelled.
    pub fn undo(&mut self) -> Result<bool> {
        self.ensure_open()?;
        let snapshot = self.history.undo();
        Ok(self.restore(snapshot, "undo"))
    }

    /// Re-applies the next snapshot. Returns `false` at the end of history.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Closed` if the session is saved or cancelled.
    pub fn redo(&mut self) -> Result<bool> {
        self.ensure_open()?;
        let snapshot = self.history.redo();
        Ok(self.restore(snapshot, "redo"))
    }

    fn restore(&mut self, snapshot: Option<EdgeSet>, action: &'static str) -> bool {
        let Some(snapshot) = snapshot else {
            return false;
        };
        self.edges = snapshot;
        self.state = if self.history.cursor() == 0 {
            SessionState::Idle
        } else {
            SessionState::Reviewing
        };
        tracing::info!(cursor = self.history.cursor(), action, "history restored");
        true
    }

    /// Clears every edge back to unlabeled and unlocked.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Closed` if the session is saved or cancelled.
    pub fn reset(&mut self) -> Result<()> {
        self.ensure_open()?;
        for (_, edge) in self.edges.iter_mut() {
            edge.clear_label();
        }
        self.commit();
        self.state = SessionState::Idle;
        tracing::info!(edges = self.edges.len(), "labels reset");
        Ok(())
    }

    /// Clears the label and lock of a single edge.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is closed or the id is unknown.
    pub fn unlock(&mut self, id: EdgeId) -> Result<()> {
        self.ensure_open()?;
        self.edges.edge_mut(id)?.clear_label();
        self.commit();
        self.state = SessionState::Reviewing;
        Ok(())
    }

    /// Attaches or clears the externally supplied elevation rank of an edge.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is closed or the id is unknown.
    pub fn set_elevation_rank(&mut self, id: EdgeId, rank: Option<u32>) -> Result<()> {
        self.ensure_open()?;
        let edge = self.edges.edge_mut(id)?;
        if edge.elevation_rank == rank {
            return Ok(());
        }
        edge.elevation_rank = rank;
        self.commit();
        Ok(())
    }

    /// Moves every edge endpoint at `from` to `to`, re-measures the touched
    /// edges and recomputes connectivity. Returns the number of points moved.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is closed or `to` is not finite.
    pub fn move_vertex(&mut self, from: GeoPoint, to: GeoPoint) -> Result<usize> {
        self.ensure_open()?;
        to.validate()?;
        let tolerance = self.config.connection_tolerance_deg;
        let mut moved = 0;
        for (_, edge) in self.edges.iter_mut() {
            let mut touched = false;
            for p in edge.geometry.iter_mut().filter(|p| p.coincides(&from, tolerance)) {
                *p = to;
                touched = true;
                moved += 1;
            }
            if touched {
                edge.refresh_measurements();
            }
        }
        if moved > 0 {
            resolve_connectivity(&mut self.edges, tolerance);
            self.commit();
            tracing::info!(moved, "vertex moved");
        }
        Ok(moved)
    }

    /// Hands the edges to `store` under `measurement_id`.
    ///
    /// On success the session is `Saved` and accepts no further edits. On
    /// failure the edges and state are left as they were so the save can be
    /// retried.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Closed` if already saved or cancelled, or
    /// `PersistError::Store` if the store rejects the payload.
    pub fn save<S>(&mut self, measurement_id: &str, store: &mut S) -> Result<()>
    where
        S: MeasurementStore + ?Sized,
    {
        self.ensure_open()?;
        let previous = self.state;
        self.state = SessionState::Saving;
        let payload = SavePayload::new(measurement_id, &self.edges);
        if let Err(source) = store.save_edges(&payload) {
            self.state = previous;
            tracing::warn!(measurement_id, error = %source, "save failed");
            return Err(PersistError::Store {
                measurement_id: measurement_id.to_owned(),
                source,
            }
            .into());
        }
        self.state = SessionState::Saved;
        tracing::info!(measurement_id, edges = payload.edges.len(), "measurement saved");
        Ok(())
    }

    /// Abandons the session without persisting anything.
    pub fn cancel(&mut self) {
        if !self.state.is_closed() {
            self.state = SessionState::Cancelled;
            tracing::info!("labeling session cancelled");
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.state.is_closed() {
            return Err(SessionError::Closed(self.state).into());
        }
        Ok(())
    }

    fn commit(&mut self) {
        self.history.push(self.edges.clone());
    }
}
