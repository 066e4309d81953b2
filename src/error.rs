use thiserror::Error;

/// Top-level error type for the roofline crate.
#[derive(Debug, Error)]
pub enum RooflineError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Errors raised while validating input geometry.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("facet needs at least 3 distinct points, got {0}")]
    TooFewFacetPoints(usize),

    #[error("edge needs at least 2 points, got {0}")]
    TooFewEdgePoints(usize),

    #[error("non-finite coordinate ({lat}, {lng})")]
    NonFinite { lat: f64, lng: f64 },
}

/// Errors related to id lookups in the facet and edge arenas.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),
}

/// Errors related to the labeling session lifecycle.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session is closed ({0:?})")]
    Closed(crate::session::SessionState),
}

/// Errors raised while loading or validating a classifier configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid classifier config: {0}")]
    Invalid(String),

    #[error("failed to parse classifier config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Boxed error returned by a persistence collaborator.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while handing a session to external storage.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to save measurement {measurement_id}: {source}")]
    Store {
        measurement_id: String,
        #[source]
        source: BoxError,
    },

    #[error("failed to encode save payload: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Convenience type alias for results using [`RooflineError`].
pub type Result<T> = std::result::Result<T, RooflineError>;
