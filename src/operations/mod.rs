pub mod classify;
pub mod extract;
pub mod summary;

pub use classify::{auto_detect_all_edges, detect_edge_type, AutoDetectReport, Detection};
pub use extract::ExtractEdges;
pub use summary::{LabelStats, LengthTotals};
