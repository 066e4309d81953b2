use crate::error::Result;
use crate::math::GeoPoint;
use crate::topology::connectivity::{resolve_connectivity, VertexIndex};
use crate::topology::{EdgeData, EdgeId, EdgeSet, FacetStore};

/// Derives the deduplicated edge collection from a set of facets.
///
/// Each facet contributes its consecutive vertex pairs. A segment whose
/// endpoints match an existing edge (in either direction, within tolerance)
/// is merged into that edge and marked `shared`. The matching tolerance is
/// capped at half the segment's extent so the sides of a facet smaller than
/// the tolerance stay distinct.
pub struct ExtractEdges {
    tolerance: f64,
}

impl ExtractEdges {
    /// Creates a new `ExtractEdges` operation.
    #[must_use]
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Executes the operation, returning edges with measurements and
    /// connectivity filled in.
    ///
    /// # Errors
    ///
    /// Returns an error if a segment cannot form a valid edge.
    pub fn execute(&self, facets: &FacetStore) -> Result<EdgeSet> {
        let mut edges = EdgeSet::new();
        let mut index = VertexIndex::new(self.tolerance);

        for (facet_id, facet) in facets.iter() {
            for (a, b) in facet.segments() {
                if let Some(existing) = self.find_matching(&index, &edges, &a, &b) {
                    let edge = edges.edge_mut(existing)?;
                    if !edge.facets.contains(&facet_id) {
                        edge.facets.push(facet_id);
                    }
                    edge.shared = edge.facets.len() > 1;
                    continue;
                }

                let mut edge = EdgeData::new(vec![a, b])?;
                edge.facets.push(facet_id);
                let id = edges.insert(edge);
                index.insert(&a, id);
                index.insert(&b, id);
            }
        }

        resolve_connectivity(&mut edges, self.tolerance);
        tracing::info!(
            facets = facets.len(),
            edges = edges.len(),
            shared = edges.iter().filter(|(_, e)| e.shared).count(),
            "edges extracted"
        );
        Ok(edges)
    }

    fn find_matching(
        &self,
        index: &VertexIndex,
        edges: &EdgeSet,
        a: &GeoPoint,
        b: &GeoPoint,
    ) -> Option<EdgeId> {
        let extent = (b.lat - a.lat).abs().max((b.lng - a.lng).abs());
        let tol = self.tolerance.min(extent * 0.5);
        index.candidates(a).into_iter().find(|&id| {
            edges
                .get(id)
                .and_then(EdgeData::endpoints)
                .is_some_and(|(s, e)| {
                    (s.coincides(a, tol) && e.coincides(b, tol))
                        || (s.coincides(b, tol) && e.coincides(a, tol))
                })
        })
    }
}
