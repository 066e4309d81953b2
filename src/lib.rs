pub mod config;
pub mod error;
pub mod math;
pub mod operations;
pub mod session;
pub mod topology;

pub use config::ClassifierConfig;
pub use error::{Result, RooflineError};
pub use math::GeoPoint;
pub use session::{LabelingSession, SessionState};
pub use topology::{EdgeData, EdgeId, EdgeSet, EdgeType, FacetStore};
