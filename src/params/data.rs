//! Parameter records for a recurring contribution plan

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::validate::{validate, ValidationReport};
use crate::error::{CalcError, CalcResult};

/// How contributions are timed when compounding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompoundingMode {
    /// Each year's twelve payments are treated as one deposit at year end
    #[default]
    AnnualLump,
    /// Every monthly payment compounds on its own at annual_rate / 12
    Monthly,
}

impl CompoundingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompoundingMode::AnnualLump => "annual",
            CompoundingMode::Monthly => "monthly",
        }
    }
}

impl fmt::Display for CompoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompoundingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "annual" | "annual_lump" | "yearly" => Ok(CompoundingMode::AnnualLump),
            "monthly" => Ok(CompoundingMode::Monthly),
            other => Err(format!("Unknown compounding mode: {}", other)),
        }
    }
}

/// Unvalidated plan input as it arrives from a user-facing surface.
///
/// `monthly_amount` is the canonical amount field. `annual_amount` is the
/// legacy spelling and is only consulted when `monthly_amount` is absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_amount: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_amount: Option<f64>,

    pub annual_rate: f64,

    /// Kept as a float so fractional or non-finite horizons can be reported
    pub years: f64,
}

impl RawParams {
    pub fn new(monthly_amount: f64, annual_rate: f64, years: f64) -> Self {
        Self {
            monthly_amount: Some(monthly_amount),
            annual_amount: None,
            annual_rate,
            years,
        }
    }

    /// Build from the legacy annual amount field
    pub fn from_annual(annual_amount: f64, annual_rate: f64, years: f64) -> Self {
        Self {
            monthly_amount: None,
            annual_amount: Some(annual_amount),
            annual_rate,
            years,
        }
    }

    /// Monthly amount, derived from the legacy field when needed
    pub fn resolved_monthly_amount(&self) -> Option<f64> {
        self.monthly_amount
            .or_else(|| self.annual_amount.map(|annual| annual / 12.0))
    }

    /// Check against the declared bounds without consuming the input
    pub fn validate(&self) -> ValidationReport {
        validate(self)
    }
}

/// A validated contribution plan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InvestmentParams {
    /// Amount contributed every month
    pub monthly_amount: f64,

    /// Nominal annual growth rate as a fraction (0.05 = 5%)
    pub annual_rate: f64,

    /// Contribution years, also the valuation horizon
    pub years: u32,
}

impl InvestmentParams {
    /// Build without bounds checks. The engine still rejects `years == 0`.
    pub fn new(monthly_amount: f64, annual_rate: f64, years: u32) -> Self {
        Self {
            monthly_amount,
            annual_rate,
            years,
        }
    }

    /// Validate raw input and keep any non-blocking issues for display
    pub fn from_raw(raw: &RawParams) -> CalcResult<(Self, ValidationReport)> {
        let report = validate(raw);
        if report.has_errors() {
            return Err(CalcError::InvalidParams(report));
        }

        // A missing or non-finite amount, or a fractional horizon, is an error above
        let monthly_amount = match raw.resolved_monthly_amount() {
            Some(amount) => amount,
            None => return Err(CalcError::InvalidParams(report)),
        };

        let params = Self {
            monthly_amount,
            annual_rate: raw.annual_rate,
            years: raw.years as u32,
        };
        Ok((params, report))
    }

    pub fn annual_amount(&self) -> f64 {
        self.monthly_amount * 12.0
    }

    pub fn total_months(&self) -> u32 {
        self.years * 12
    }

    pub fn total_contributed(&self) -> f64 {
        self.monthly_amount * 12.0 * self.years as f64
    }
}

impl TryFrom<RawParams> for InvestmentParams {
    type Error = CalcError;

    fn try_from(raw: RawParams) -> Result<Self, Self::Error> {
        Self::from_raw(&raw).map(|(params, _)| params)
    }
}
