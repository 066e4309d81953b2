use std::collections::BTreeSet;

use crate::config::ClassifierConfig;
use crate::math::angle::{angle_between, is_nearly_horizontal, is_nearly_vertical};
use crate::math::geodesy::bearing_to_north;
use crate::topology::connectivity::{connection_map, find_connecting_edges};
use crate::topology::{EdgeData, EdgeId, EdgeSet, EdgeType};

/// Outcome of classifying a single edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub edge_type: EdgeType,
    /// 0–100.
    pub confidence_score: u8,
    pub detection_reason: String,
}

impl Detection {
    fn new(edge_type: EdgeType, confidence_score: u8, detection_reason: String) -> Self {
        Self {
            edge_type,
            confidence_score,
            detection_reason,
        }
    }

    fn insufficient() -> Self {
        Self::new(
            EdgeType::Unlabeled,
            30,
            "Insufficient geometric information".to_owned(),
        )
    }
}

/// Counts from one auto-detect pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutoDetectReport {
    /// Edges that received a fresh classification.
    pub classified: usize,
    /// Locked edges passed through untouched.
    pub locked: usize,
    /// Classified edges that still came out `Unlabeled`.
    pub unlabeled: usize,
}

/// Infers the type of `edge` from its orientation and the edges it touches.
///
/// Never fails: an id missing from the set, like any edge the rules cannot
/// place, comes back `Unlabeled` with confidence 30.
#[must_use]
pub fn detect_edge_type(edge: EdgeId, edges: &EdgeSet, config: &ClassifierConfig) -> Detection {
    let Some(data) = edges.get(edge) else {
        return Detection::insufficient();
    };
    let connections = find_connecting_edges(edge, edges, config.connection_tolerance_deg);
    classify(data, &connections, edges, config)
}

/// Order in which [`auto_detect_all_edges`] visits edges: highest first
/// (elevation rank 1 before 2), unranked last, ties in display order.
#[must_use]
pub fn classification_order(edges: &EdgeSet) -> Vec<EdgeId> {
    let mut order: Vec<(EdgeId, Option<u32>, usize)> = edges
        .iter()
        .map(|(id, e)| (id, e.elevation_rank, e.display_order))
        .collect();
    order.sort_by_key(|&(_, rank, display)| (rank.is_none(), rank, display));
    order.into_iter().map(|(id, _, _)| id).collect()
}

/// Classifies every unlocked edge in place, in [`classification_order`].
///
/// Locked edges are left exactly as they are. Every other edge gets a new
/// type, confidence and reason, `auto_detected = true`, and fresh
/// `connects_to`.
pub fn auto_detect_all_edges(edges: &mut EdgeSet, config: &ClassifierConfig) -> AutoDetectReport {
    let mut connections = connection_map(edges, config.connection_tolerance_deg);

    let mut report = AutoDetectReport::default();
    let mut results = Vec::with_capacity(edges.len());
    for id in classification_order(edges) {
        let Some(edge) = edges.get(id) else {
            continue;
        };
        if edge.user_modified {
            report.locked += 1;
            continue;
        }
        let connected = connections.remove(id).unwrap_or_default();
        let detection = classify(edge, &connected, edges, config);
        tracing::debug!(
            edge = edge.display_order,
            edge_type = %detection.edge_type,
            confidence = detection.confidence_score,
            "edge classified"
        );
        results.push((id, detection, connected));
    }

    for (id, detection, connected) in results {
        let Ok(edge) = edges.edge_mut(id) else {
            continue;
        };
        if detection.edge_type == EdgeType::Unlabeled {
            report.unlabeled += 1;
        }
        edge.edge_type = detection.edge_type;
        edge.confidence_score = detection.confidence_score;
        edge.detection_reason = detection.detection_reason;
        edge.auto_detected = true;
        edge.connects_to = connected;
        report.classified += 1;
    }
    report
}

/// Ordered decision tree; the first matching branch wins.
fn classify(
    edge: &EdgeData,
    connections: &BTreeSet<EdgeId>,
    edges: &EdgeSet,
    config: &ClassifierConfig,
) -> Detection {
    let angle = bearing_to_north(&edge.geometry);
    let count = connections.len();

    if is_nearly_horizontal(angle, config.horizontal_tolerance_deg) {
        if count >= 2 && edge.elevation_rank == Some(1) {
            return Detection::new(
                EdgeType::Ridge,
                95,
                format!("Horizontal edge at highest elevation, connects {count} edges"),
            );
        }
        match count {
            2 => {
                return Detection::new(
                    EdgeType::Ridge,
                    75,
                    format!("Horizontal edge ({angle:.0}°) joining 2 edges"),
                )
            }
            1 => {
                return Detection::new(
                    EdgeType::Eave,
                    70,
                    format!("Horizontal edge ({angle:.0}°) with a single connection"),
                )
            }
            0 => {
                return Detection::new(
                    EdgeType::Eave,
                    65,
                    format!("Horizontal edge ({angle:.0}°) with no connections, likely perimeter"),
                )
            }
            // Unranked horizontal edges with 3+ connections use the angle rules.
            _ => {}
        }
    }

    if count >= 3 {
        let avg = average_angle(edge, connections, edges);
        return if avg < config.valley_max_angle_deg {
            Detection::new(
                EdgeType::Valley,
                92,
                format!("Internal corner: average angle {avg:.0}° across {count} edges"),
            )
        } else if avg > config.hip_min_angle_deg && avg < config.hip_max_angle_deg {
            Detection::new(
                EdgeType::Hip,
                90,
                format!("External corner: average angle {avg:.0}° across {count} edges"),
            )
        } else {
            Detection::new(
                EdgeType::Ridge,
                70,
                format!("Connects {count} edges at average angle {avg:.0}°"),
            )
        };
    }

    if count == 2 {
        let avg = average_angle(edge, connections, edges);
        return if avg < config.valley_max_angle_deg {
            Detection::new(
                EdgeType::Valley,
                88,
                format!("Sloped edge meeting 2 edges at average angle {avg:.0}° (concave)"),
            )
        } else if avg > config.hip_min_angle_deg {
            Detection::new(
                EdgeType::Hip,
                85,
                format!("Sloped edge meeting 2 edges at average angle {avg:.0}° (convex)"),
            )
        } else {
            Detection::new(
                EdgeType::Ridge,
                65,
                format!("Sloped edge meeting 2 edges at average angle {avg:.0}°"),
            )
        };
    }

    if count == 1 {
        return if is_nearly_vertical(angle, config.vertical_tolerance_deg) {
            Detection::new(
                EdgeType::Rake,
                80,
                format!("Near-vertical edge ({angle:.0}°) with a single connection"),
            )
        } else {
            Detection::new(
                EdgeType::Eave,
                60,
                format!("Edge at {angle:.0}° with a single connection"),
            )
        };
    }

    if edge.length_ft < config.penetration_max_length_ft {
        return Detection::new(
            EdgeType::Penetration,
            70,
            format!("Isolated short edge ({:.1} ft), likely a roof feature", edge.length_ft),
        );
    }

    Detection::insufficient()
}

/// Mean angle between `edge` and each connected edge, `0.0` if none resolve.
#[allow(clippy::cast_precision_loss)]
fn average_angle(edge: &EdgeData, connections: &BTreeSet<EdgeId>, edges: &EdgeSet) -> f64 {
    let angles: Vec<f64> = connections
        .iter()
        .filter_map(|id| edges.get(*id))
        .map(|other| angle_between(&edge.geometry, &other.geometry))
        .collect();
    if angles.is_empty() {
        return 0.0;
    }
    angles.iter().sum::<f64>() / angles.len() as f64
}
