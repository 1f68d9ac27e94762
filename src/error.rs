//! Error types for loading inputs and running projections

use thiserror::Error;

/// Precondition violations detected when a simulation is started
#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    #[error("priority allocations are missing or empty")]
    EmptyAllocations,
    #[error("terminal year {terminal_year} is before start year {start_year}")]
    InvalidHorizon { start_year: i32, terminal_year: i32 },
}

/// Problems with a priority allocation set
#[derive(Debug, Error, PartialEq)]
pub enum PriorityError {
    #[error("priority allocations must not be empty")]
    Empty,
    #[error("priority allocation weights must sum to more than zero")]
    NonPositiveTotal,
    #[error("priority allocation weights must sum to 1.0 (got {0})")]
    NotNormalized(f64),
    #[error("duplicate priority bucket: {0}")]
    DuplicateBucket(String),
    #[error("negative weight for bucket {0}")]
    NegativeWeight(String),
}

/// Failures reading input documents or writing reports
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
