//! Per-year contribution records and aggregate results

use serde::{Deserialize, Serialize};

use crate::params::{CompoundingMode, InvestmentParams};

/// What one contribution year grows to by the horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyContribution {
    /// Contribution year, 1-indexed
    pub year: u32,
    pub monthly_amount: f64,
    pub annual_amount: f64,
    /// Cumulative principal through this year
    pub total_contributed: f64,
    /// Value of this year's contribution at the horizon
    pub current_value: f64,
    /// Same as `current_value`; kept for output-shape stability
    pub contribution: f64,
}

impl YearlyContribution {
    pub fn new(year: u32, monthly_amount: f64, current_value: f64) -> Self {
        let annual_amount = monthly_amount * 12.0;
        Self {
            year,
            monthly_amount,
            annual_amount,
            total_contributed: annual_amount * year as f64,
            current_value,
            contribution: current_value,
        }
    }

    /// Growth earned on this year's contribution
    pub fn growth(&self) -> f64 {
        self.contribution - self.annual_amount
    }
}

/// Complete result of one calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentResult {
    pub mode: CompoundingMode,
    pub total_value: f64,
    pub total_contributed: f64,
    pub total_profit: f64,
    /// Profit over principal; 0 when nothing was contributed
    pub profit_rate: f64,
    /// Ordered by year ascending
    pub yearly_contributions: Vec<YearlyContribution>,
}

impl InvestmentResult {
    /// Aggregate a per-year sequence. `total_value` is defined as the sum of
    /// `contribution` in year order.
    pub fn from_contributions(
        params: &InvestmentParams,
        mode: CompoundingMode,
        yearly_contributions: Vec<YearlyContribution>,
    ) -> Self {
        let total_value: f64 = yearly_contributions.iter().map(|c| c.contribution).sum();
        let total_contributed = params.total_contributed();
        let total_profit = total_value - total_contributed;
        let profit_rate = if total_contributed > 0.0 {
            total_profit / total_contributed
        } else {
            0.0
        };

        Self {
            mode,
            total_value,
            total_contributed,
            total_profit,
            profit_rate,
            yearly_contributions,
        }
    }

    pub fn years(&self) -> u32 {
        self.yearly_contributions.len() as u32
    }

    /// Look up a contribution year (1-indexed)
    pub fn contribution_for_year(&self, year: u32) -> Option<&YearlyContribution> {
        if year == 0 {
            return None;
        }
        self.yearly_contributions.get((year - 1) as usize)
    }

    pub fn performance_stats(&self) -> PerformanceStats {
        performance_stats(&self.yearly_contributions)
    }

    pub fn summary(&self) -> InvestmentSummary {
        let first_year_value = self
            .yearly_contributions
            .first()
            .map(|c| c.contribution)
            .unwrap_or(0.0);
        let last_year_value = self
            .yearly_contributions
            .last()
            .map(|c| c.contribution)
            .unwrap_or(0.0);

        InvestmentSummary {
            years: self.years(),
            total_value: self.total_value,
            total_contributed: self.total_contributed,
            total_profit: self.total_profit,
            profit_rate: self.profit_rate,
            growth_multiple: ratio_or_zero(self.total_value, self.total_contributed),
            first_year_share: ratio_or_zero(first_year_value, self.total_value),
            last_year_value,
        }
    }
}

/// Headline figures for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentSummary {
    pub years: u32,
    pub total_value: f64,
    pub total_contributed: f64,
    pub total_profit: f64,
    pub profit_rate: f64,
    /// total_value / total_contributed
    pub growth_multiple: f64,
    /// Share of the final value attributable to year 1
    pub first_year_share: f64,
    pub last_year_value: f64,
}

/// Return analytics over a contribution sequence
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceStats {
    pub average_annual_return: f64,
    pub total_return_rate: f64,
    pub compound_annual_growth_rate: f64,
}

/// Derive return statistics from an already-computed sequence.
///
/// All zero for an empty sequence or one with no principal. The CAGR is a
/// real root of `total_value / principal`, so it is NaN when the total value
/// is negative (rates below -100%); the other two figures stay finite.
pub fn performance_stats(yearly_contributions: &[YearlyContribution]) -> PerformanceStats {
    if yearly_contributions.is_empty() {
        return PerformanceStats::default();
    }

    let years = yearly_contributions.len() as f64;
    let total_value: f64 = yearly_contributions.iter().map(|c| c.contribution).sum();
    let total_contributed: f64 = yearly_contributions.iter().map(|c| c.annual_amount).sum();

    if total_contributed <= 0.0 {
        return PerformanceStats::default();
    }

    let total_return_rate = (total_value - total_contributed) / total_contributed;
    let compound_annual_growth_rate = (total_value / total_contributed).powf(1.0 / years) - 1.0;

    PerformanceStats {
        average_annual_return: total_return_rate / years,
        total_return_rate,
        compound_annual_growth_rate,
    }
}

fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}
