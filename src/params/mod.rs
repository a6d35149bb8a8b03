//! Plan parameters, validation, and batch loading

mod data;
mod validate;
pub mod loader;

pub use data::{CompoundingMode, InvestmentParams, RawParams};
pub use validate::{
    validate, Field, Severity, ValidationIssue, ValidationReport, MAX_ANNUAL_AMOUNT,
    MAX_ANNUAL_RATE, MAX_TOTAL_INVESTMENT, MAX_YEARS, MIN_AMOUNT, MIN_ANNUAL_RATE, MIN_YEARS,
    SOFT_MAX_RATE, SOFT_MIN_RATE,
};
pub use loader::{load_plans, load_plans_from_reader, PlanRecord};
