//! Error types shared by the planner core and its collaborators.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlannerError>;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("invalid coordinate ({latitude}, {longitude})")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    #[error("empty input: {0}")]
    EmptyInput(&'static str),

    #[error("item {index} has negative or non-finite weight {weight}")]
    NegativeWeight { index: usize, weight: f64 },

    #[error("item {index} has negative or non-finite value {value}")]
    NegativeValue { index: usize, value: f64 },

    #[error("capacity must be a non-negative number, got {0}")]
    NegativeCapacity(f64),

    #[error("distance matrix must be square, row {row} has {len} entries for {size} locations")]
    MatrixShape { row: usize, len: usize, size: usize },

    #[error("distance at ({row}, {col}) must be a non-negative number, got {value}")]
    InvalidDistance { row: usize, col: usize, value: f64 },

    #[error("geocoding failed: {0}")]
    Geocoding(String),

    #[error("routing service failed: {0}")]
    Routing(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Rejects a negative or non-finite capacity bound.
pub(crate) fn check_capacity(capacity: f64) -> Result<()> {
    if capacity.is_finite() && capacity >= 0.0 {
        Ok(())
    } else {
        Err(PlannerError::NegativeCapacity(capacity))
    }
}

/// Rejects a negative or non-finite weight at `index`.
pub(crate) fn check_weight(index: usize, weight: f64) -> Result<()> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(())
    } else {
        Err(PlannerError::NegativeWeight { index, weight })
    }
}
