use thiserror::Error;

use crate::scene::ObjectId;

/// Top-level error type for the cadbane editor core.
#[derive(Debug, Error)]
pub enum CadbaneError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Object(#[from] ObjectError),

    #[error(transparent)]
    Tessellation(#[from] TessellationError),
}

/// Errors raised while constructing or evaluating geometry.
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

    #[error("control point ({row}, {col}) is outside the {rows}x{cols} grid")]
    ControlPointOutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
}

/// Errors related to objects held by the scene.
#[derive(Debug, Error)]
pub enum ObjectError {
    #[error("object {0} not found")]
    NotFound(ObjectId),

    #[error("object {id} is not a {expected}")]
    WrongKind { id: ObjectId, expected: &'static str },
}

/// Errors related to tessellation.
#[derive(Debug, Error)]
pub enum TessellationError {
    #[error("invalid tessellation parameters: {0}")]
    InvalidParameters(String),

    #[error("tessellation failed: {0}")]
    Failed(String),
}

/// Convenience type alias for results using [`CadbaneError`].
pub type Result<T> = std::result::Result<T, CadbaneError>;
