//! Contribution attribution engine and derived analytics

mod contributions;
mod engine;
mod irr;

pub use contributions::{
    performance_stats, InvestmentResult, InvestmentSummary, PerformanceStats, YearlyContribution,
};
pub use engine::{
    annuity_future_value, calculate, calculate_with_mode, calculate_with_monthly_compounding,
    future_value, normalize_rate, DEFAULT_RATE, MONTHS_PER_YEAR,
};
pub use irr::{money_weighted_return, periodic_irr};
