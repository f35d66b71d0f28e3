use thiserror::Error;

/// Top-level error type for tour path synthesis and playback.
#[derive(Debug, Error)]
pub enum TourError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors raised while building a camera path.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("insufficient data: {available} usable point(s), at least {required} required")]
    InsufficientData { available: usize, required: usize },
}

/// Errors caused by the external configuration.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("unknown camera strategy: {0:?}")]
    UnknownStrategy(String),

    #[error("invalid value for {key}: {reason}")]
    InvalidParameter { key: &'static str, reason: String },
}

/// Convenience type alias for results using [`TourError`].
pub type Result<T> = std::result::Result<T, TourError>;
