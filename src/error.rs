//! Error types for the calculation engine and its input surfaces

use crate::params::ValidationReport;
use thiserror::Error;

pub type CalcResult<T> = Result<T, CalcError>;

#[derive(Debug, Error)]
pub enum CalcError {
    #[error("invalid horizon: years must be at least 1 (got {years})")]
    InvalidHorizon { years: u32 },

    #[error("invalid parameters: {0}")]
    InvalidParams(ValidationReport),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
