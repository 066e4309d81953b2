use std::collections::{BTreeSet, HashMap};

use slotmap::SecondaryMap;

use crate::math::GeoPoint;

use super::{EdgeData, EdgeId, EdgeSet};

/// `true` if any endpoint of `a` coincides with any endpoint of `b`.
#[must_use]
pub fn edges_touch(a: &EdgeData, b: &EdgeData, tolerance: f64) -> bool {
    let (Some((a0, a1)), Some((b0, b1))) = (a.endpoints(), b.endpoints()) else {
        return false;
    };
    [a0, a1]
        .iter()
        .any(|p| p.coincides(&b0, tolerance) || p.coincides(&b1, tolerance))
}

/// Ids of every other edge sharing an endpoint with `edge`.
///
/// Pairwise scan over the whole set. An id not in the set has no connections.
#[must_use]
pub fn find_connecting_edges(edge: EdgeId, edges: &EdgeSet, tolerance: f64) -> BTreeSet<EdgeId> {
    let Some(target) = edges.get(edge) else {
        return BTreeSet::new();
    };
    edges
        .iter()
        .filter(|&(id, other)| id != edge && edges_touch(target, other, tolerance))
        .map(|(id, _)| id)
        .collect()
}

/// Grid index from coordinate cell to the edges with an endpoint in it.
///
/// Cells are `tolerance` wide, so two coinciding points always fall in the
/// same or adjacent cells.
#[derive(Debug)]
pub struct VertexIndex {
    cell: f64,
    cells: HashMap<(i64, i64), Vec<EdgeId>>,
}

impl VertexIndex {
    /// Creates an empty index for the given tolerance.
    #[must_use]
    pub fn new(tolerance: f64) -> Self {
        Self {
            cell: tolerance,
            cells: HashMap::new(),
        }
    }

    /// Indexes both endpoints of every edge in the set.
    #[must_use]
    pub fn from_edges(edges: &EdgeSet, tolerance: f64) -> Self {
        let mut index = Self::new(tolerance);
        for (id, edge) in edges.iter() {
            index.insert_edge(id, edge);
        }
        index
    }

    /// Indexes both endpoints of one edge.
    pub fn insert_edge(&mut self, id: EdgeId, edge: &EdgeData) {
        if let Some((a, b)) = edge.endpoints() {
            self.insert(&a, id);
            self.insert(&b, id);
        }
    }

    /// Records that `id` has an endpoint at `point`.
    pub fn insert(&mut self, point: &GeoPoint, id: EdgeId) {
        let key = self.key(point);
        let ids = self.cells.entry(key).or_default();
        if !ids.contains(&id) {
            ids.push(id);
        }
    }

    /// Edges with an endpoint in the 3×3 cell neighbourhood of `point`.
    /// A superset of the edges touching `point`; callers filter by tolerance.
    #[must_use]
    pub fn candidates(&self, point: &GeoPoint) -> BTreeSet<EdgeId> {
        let (cx, cy) = self.key(point);
        let mut out = BTreeSet::new();
        for dx in -1..=1_i64 {
            for dy in -1..=1_i64 {
                let key = (cx.saturating_add(dx), cy.saturating_add(dy));
                if let Some(ids) = self.cells.get(&key) {
                    out.extend(ids.iter().copied());
                }
            }
        }
        out
    }

    #[allow(clippy::cast_possible_truncation)]
    fn key(&self, point: &GeoPoint) -> (i64, i64) {
        (
            (point.lat / self.cell).floor() as i64,
            (point.lng / self.cell).floor() as i64,
        )
    }
}

/// Connections of every edge, computed through a [`VertexIndex`].
///
/// Gives the same sets as calling [`find_connecting_edges`] per edge.
#[must_use]
pub fn connection_map(edges: &EdgeSet, tolerance: f64) -> SecondaryMap<EdgeId, BTreeSet<EdgeId>> {
    let index = VertexIndex::from_edges(edges, tolerance);
    let mut map = SecondaryMap::with_capacity(edges.len());
    for (id, edge) in edges.iter() {
        let mut connected = BTreeSet::new();
        if let Some((a, b)) = edge.endpoints() {
            let candidates = index.candidates(&a).into_iter().chain(index.candidates(&b));
            for other_id in candidates {
                if other_id == id || connected.contains(&other_id) {
                    continue;
                }
                if let Some(other) = edges.get(other_id) {
                    if edges_touch(edge, other, tolerance) {
                        connected.insert(other_id);
                    }
                }
            }
        }
        map.insert(id, connected);
    }
    map
}

/// Recomputes `connects_to` for every edge in the set.
pub fn resolve_connectivity(edges: &mut EdgeSet, tolerance: f64) {
    let mut map = connection_map(edges, tolerance);
    for (id, edge) in edges.iter_mut() {
        edge.connects_to = map.remove(id).unwrap_or_default();
    }
    tracing::debug!(edges = edges.len(), "connectivity resolved");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::COORD_TOLERANCE;

    fn p(lat: f64, lng: f64) -> GeoPoint {
        GeoPoint::new(40.0 + lat, -75.0 + lng)
    }

    fn edge(a: GeoPoint, b: GeoPoint) -> EdgeData {
        EdgeData::new(vec![a, b]).unwrap()
    }

    #[test]
    fn shared_corner_within_tolerance() {
        let mut set = EdgeSet::new();
        let a = set.insert(edge(p(0.0, 0.0), p(1e-4, 0.0)));
        let b = set.insert(edge(p(1e-4 + 3e-6, -2e-6), p(1e-4, 1e-4)));
        let c = set.insert(edge(p(5e-4, 5e-4), p(6e-4, 5e-4)));

        let from_a = find_connecting_edges(a, &set, COORD_TOLERANCE);
        assert_eq!(from_a, BTreeSet::from([b]));
        assert!(find_connecting_edges(b, &set, COORD_TOLERANCE).contains(&a));
        assert!(find_connecting_edges(c, &set, COORD_TOLERANCE).is_empty());
    }

    #[test]
    fn start_start_and_end_end_count() {
        let mut set = EdgeSet::new();
        let a = set.insert(edge(p(0.0, 0.0), p(1e-4, 0.0)));
        let b = set.insert(edge(p(0.0, 0.0), p(0.0, 1e-4)));
        let c = set.insert(edge(p(2e-4, 2e-4), p(1e-4, 0.0)));
        assert_eq!(find_connecting_edges(a, &set, COORD_TOLERANCE), BTreeSet::from([b, c]));
    }

    #[test]
    fn too_far_apart() {
        let mut set = EdgeSet::new();
        let a = set.insert(edge(p(0.0, 0.0), p(1e-4, 0.0)));
        set.insert(edge(p(1e-4 + 2e-5, 0.0), p(3e-4, 0.0)));
        assert!(find_connecting_edges(a, &set, COORD_TOLERANCE).is_empty());
    }

    #[test]
    fn index_matches_pairwise_scan() {
        let mut set = EdgeSet::new();
        let corners = [p(0.0, 0.0), p(0.0, 1e-4), p(1e-4, 1e-4), p(1e-4, 0.0), p(5e-5, 5e-5)];
        for (i, a) in corners.iter().enumerate() {
            for b in &corners[i + 1..] {
                set.insert(edge(*a, *b));
            }
        }
        set.insert(edge(p(9e-6, 0.0), p(9e-4, 9e-4)));

        let map = connection_map(&set, COORD_TOLERANCE);
        for id in set.ids() {
            assert_eq!(map[id], find_connecting_edges(id, &set, COORD_TOLERANCE));
        }
    }

    #[test]
    fn resolve_is_symmetric() {
        let mut set = EdgeSet::new();
        set.insert(edge(p(0.0, 0.0), p(1e-4, 0.0)));
        set.insert(edge(p(1e-4, 0.0), p(1e-4, 1e-4)));
        set.insert(edge(p(1e-4, 1e-4), p(0.0, 0.0)));
        resolve_connectivity(&mut set, COORD_TOLERANCE);
        for (id, e) in set.iter() {
            assert_eq!(e.connects_to.len(), 2);
            for other in &e.connects_to {
                assert!(set.edge(*other).unwrap().connects_to.contains(&id));
            }
        }
    }
}
