//! Contribution Growth - per-year attribution of a recurring investment plan
//!
//! This library provides:
//! - Validation of plan input against declared bounds (errors, warnings, infos)
//! - Annual-lump and monthly compounding models that split the final value
//!   into what each contribution year grows to
//! - Return analytics (profit rate, CAGR, money-weighted return)
//! - Batch and sensitivity runs over many plans

pub mod error;
pub mod format;
pub mod params;
pub mod projection;
pub mod scenario;

// Re-export commonly used types
pub use error::{CalcError, CalcResult};
pub use params::{CompoundingMode, InvestmentParams, RawParams, ValidationIssue, ValidationReport};
pub use projection::{
    calculate, calculate_with_monthly_compounding, future_value, performance_stats,
    InvestmentResult, PerformanceStats, YearlyContribution,
};
pub use scenario::ScenarioRunner;
