use std::collections::BTreeMap;

use serde::Serialize;

use crate::topology::{EdgeSet, EdgeType};

/// Total edge length in feet per edge type. Every type is present.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LengthTotals(BTreeMap<EdgeType, f64>);

impl LengthTotals {
    /// Sums `length_ft` by `edge_type`.
    #[must_use]
    pub fn from_edges(edges: &EdgeSet) -> Self {
        let mut totals: BTreeMap<EdgeType, f64> =
            EdgeType::ALL.iter().map(|&t| (t, 0.0)).collect();
        for (_, edge) in edges.iter() {
            *totals.entry(edge.edge_type).or_insert(0.0) += edge.length_ft;
        }
        Self(totals)
    }

    /// Total length of one type.
    #[must_use]
    pub fn get(&self, edge_type: EdgeType) -> f64 {
        self.0.get(&edge_type).copied().unwrap_or(0.0)
    }

    /// Sum over all types.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EdgeType, f64)> + '_ {
        self.0.iter().map(|(&t, &len)| (t, len))
    }
}

/// Labeling progress counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LabelStats {
    pub total: usize,
    pub labeled: usize,
    pub unlabeled: usize,
    pub locked: usize,
    /// Auto-detected and not yet accepted.
    pub pending_suggestions: usize,
    /// Pending suggestions at or above the high-confidence threshold.
    pub pending_high_confidence: usize,
}

impl LabelStats {
    #[must_use]
    pub fn from_edges(edges: &EdgeSet, high_confidence_threshold: u8) -> Self {
        let mut stats = Self::default();
        for (_, edge) in edges.iter() {
            stats.total += 1;
            if edge.edge_type == EdgeType::Unlabeled {
                stats.unlabeled += 1;
            } else {
                stats.labeled += 1;
            }
            if edge.user_modified {
                stats.locked += 1;
            } else if edge.auto_detected {
                stats.pending_suggestions += 1;
                if edge.confidence_score >= high_confidence_threshold {
                    stats.pending_high_confidence += 1;
                }
            }
        }
        stats
    }
}
