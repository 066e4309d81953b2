pub mod connectivity;
pub mod edge;
pub mod facet;

pub use edge::{EdgeData, EdgeId, EdgeType};
pub use facet::{FacetData, FacetId};

use crate::error::{Result, TopologyError};
use crate::math::GeoPoint;
use slotmap::SlotMap;

/// Arena owning the roof facets drawn by the user.
#[derive(Debug, Default, Clone)]
pub struct FacetStore {
    facets: SlotMap<FacetId, FacetData>,
}

impl FacetStore {
    /// Creates a new, empty facet store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from raw polygons, one facet per polygon.
    ///
    /// # Errors
    ///
    /// Returns an error if any polygon is not a valid facet.
    pub fn from_polygons<I>(polygons: I) -> Result<Self>
    where
        I: IntoIterator<Item = Vec<GeoPoint>>,
    {
        let mut store = Self::new();
        for points in polygons {
            store.add_facet(FacetData::new(points)?);
        }
        Ok(store)
    }

    /// Inserts a facet and returns its ID.
    pub fn add_facet(&mut self, data: FacetData) -> FacetId {
        self.facets.insert(data)
    }

    /// Iterates facets in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (FacetId, &FacetData)> {
        self.facets.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.facets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }
}

/// Flat arena of roof edges, addressed by [`EdgeId`].
///
/// Edges are never removed, so iteration follows insertion order, which is
/// also `display_order`. Cloning produces a fully independent copy, which is
/// what the session history stores.
#[derive(Debug, Default, Clone)]
pub struct EdgeSet {
    edges: SlotMap<EdgeId, EdgeData>,
}

impl EdgeSet {
    /// Creates a new, empty edge set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an edge, assigning the next display order, and returns its ID.
    pub fn insert(&mut self, mut data: EdgeData) -> EdgeId {
        data.display_order = self.edges.len();
        self.edges.insert(data)
    }

    /// Returns a reference to the edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the set.
    pub fn edge(&self, id: EdgeId) -> Result<&EdgeData> {
        self.edges
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("edge".into()).into())
    }

    /// Returns a mutable reference to the edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the set.
    pub fn edge_mut(&mut self, id: EdgeId) -> Result<&mut EdgeData> {
        self.edges
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("edge".into()).into())
    }

    /// Returns the edge data if present.
    #[must_use]
    pub fn get(&self, id: EdgeId) -> Option<&EdgeData> {
        self.edges.get(id)
    }

    /// Iterates edges in display order.
    pub fn iter(&self) -> impl Iterator<Item = (EdgeId, &EdgeData)> {
        self.edges.iter()
    }

    /// Iterates edges mutably in display order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EdgeId, &mut EdgeData)> {
        self.edges.iter_mut()
    }

    /// Edge ids in display order.
    #[must_use]
    pub fn ids(&self) -> Vec<EdgeId> {
        self.edges.keys().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

impl PartialEq for EdgeSet {
    fn eq(&self, other: &Self) -> bool {
        self.edges.len() == other.edges.len()
            && self
                .edges
                .iter()
                .zip(other.edges.iter())
                .all(|((ka, a), (kb, b))| ka == kb && a == b)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn segment(lat: f64) -> EdgeData {
        EdgeData::new(vec![GeoPoint::new(lat, 0.0), GeoPoint::new(lat, 1e-4)]).unwrap()
    }

    #[test]
    fn insert_assigns_display_order() {
        let mut set = EdgeSet::new();
        let a = set.insert(segment(0.0));
        let b = set.insert(segment(1.0));
        assert_eq!(set.edge(a).unwrap().display_order, 0);
        assert_eq!(set.edge(b).unwrap().display_order, 1);
        assert_eq!(set.ids(), vec![a, b]);
    }

    #[test]
    fn unknown_id_is_an_error() {
        let mut other = EdgeSet::new();
        let foreign = other.insert(segment(0.0));
        other.insert(segment(1.0));
        let set = EdgeSet::new();
        assert!(set.edge(foreign).is_err());
        assert!(set.get(foreign).is_none());
    }

    #[test]
    fn clone_is_independent() {
        let mut set = EdgeSet::new();
        let a = set.insert(segment(0.0));
        let snapshot = set.clone();
        set.edge_mut(a).unwrap().edge_type = EdgeType::Ridge;
        assert_eq!(snapshot.edge(a).unwrap().edge_type, EdgeType::Unlabeled);
        assert_ne!(snapshot, set);
    }

    #[test]
    fn facet_store_from_polygons() {
        let store = FacetStore::from_polygons(vec![vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 1e-4),
            GeoPoint::new(1e-4, 1e-4),
        ]])
        .unwrap();
        assert_eq!(store.len(), 1);
        let (_, facet) = store.iter().next().unwrap();
        assert_eq!(facet.points().len(), 3);
    }
}
