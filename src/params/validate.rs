//! Bounds checks for contribution plan input
//!
//! Validation never fails: it always returns a report listing every issue it
//! found, in the order the checks ran. Only `Severity::Error` issues block a
//! calculation; warnings and infos are for display.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::data::RawParams;

/// Minimum contribution amount, checked against the field as supplied
pub const MIN_AMOUNT: f64 = 1_000.0;

/// Maximum contribution per year (monthly amount × 12)
pub const MAX_ANNUAL_AMOUNT: f64 = 100_000_000.0;

pub const MIN_ANNUAL_RATE: f64 = 0.0001;
pub const MAX_ANNUAL_RATE: f64 = 0.3;

/// Rates outside this band are allowed but flagged
pub const SOFT_MIN_RATE: f64 = -0.05;
pub const SOFT_MAX_RATE: f64 = 0.15;

pub const MIN_YEARS: u32 = 1;
pub const MAX_YEARS: u32 = 50;

/// Ceiling on annual amount × years before a warning is raised
pub const MAX_TOTAL_INVESTMENT: f64 = 100_000_000_000.0;

/// Negative rates over a longer horizon than this are flagged
const NEGATIVE_RATE_HORIZON: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Default or fallback applied
    Info,
    /// Allowed, but statistically unusual or risky
    Warning,
    /// Hard range or type violation; blocks calculation
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    MonthlyAmount,
    AnnualAmount,
    AnnualRate,
    Years,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::MonthlyAmount => "monthly_amount",
            Field::AnnualAmount => "annual_amount",
            Field::AnnualRate => "annual_rate",
            Field::Years => "years",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single finding against one input field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub field: Field,
    pub message: String,
    /// The offending value (NaN when the field was missing)
    pub value: f64,
    pub severity: Severity,
}

impl ValidationIssue {
    pub fn error(field: Field, value: f64, message: impl Into<String>) -> Self {
        Self { field, message: message.into(), value, severity: Severity::Error }
    }

    pub fn warning(field: Field, value: f64, message: impl Into<String>) -> Self {
        Self { field, message: message.into(), value, severity: Severity::Warning }
    }

    pub fn info(field: Field, value: f64, message: impl Into<String>) -> Self {
        Self { field, message: message.into(), value, severity: Severity::Info }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {} (value: {})", self.severity, self.field, self.message, self.value)
    }
}

/// Ordered list of issues found for one plan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<ValidationIssue> {
        self.issues
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(ValidationIssue::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.with_severity(Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.with_severity(Severity::Warning)
    }

    pub fn infos(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.with_severity(Severity::Info)
    }

    /// Issues raised against one field
    pub fn for_field(&self, field: Field) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |issue| issue.field == field)
    }

    fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |issue| issue.severity == severity)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", issue)?;
        }
        Ok(())
    }
}

/// Check a raw plan against the declared bounds
pub fn validate(raw: &RawParams) -> ValidationReport {
    let mut report = ValidationReport::new();

    let annual_amount = check_amount(raw, &mut report);
    let rate_ok = check_rate(raw.annual_rate, &mut report);
    let years_ok = check_years(raw.years, &mut report);

    // Cross-field consistency only makes sense on finite inputs
    if let Some((field, annual)) = annual_amount {
        if years_ok {
            let total = annual * raw.years;
            if total > MAX_TOTAL_INVESTMENT {
                report.push(ValidationIssue::warning(
                    field,
                    total,
                    "Total projected investment exceeds 100,000,000,000",
                ));
            }
        }
    }

    if rate_ok && years_ok && raw.annual_rate < 0.0 && raw.years > NEGATIVE_RATE_HORIZON {
        report.push(ValidationIssue::warning(
            Field::AnnualRate,
            raw.annual_rate,
            "Negative return over more than 10 years carries a high risk of capital loss",
        ));
    }

    if report.has_errors() {
        debug!("Validation rejected plan {:?}: {}", raw, report);
    } else if report.warnings().next().is_some() {
        warn!("Plan accepted with warnings: {}", report);
    }

    report
}

/// Returns the annual-equivalent amount and its field when it is finite
fn check_amount(raw: &RawParams, report: &mut ValidationReport) -> Option<(Field, f64)> {
    let (field, supplied, annual) = match (raw.monthly_amount, raw.annual_amount) {
        (Some(monthly), _) => (Field::MonthlyAmount, monthly, monthly * 12.0),
        (None, Some(annual)) => {
            report.push(ValidationIssue::info(
                Field::AnnualAmount,
                annual,
                "annual_amount is a legacy field; monthly amount derived as annual_amount / 12",
            ));
            (Field::AnnualAmount, annual, annual)
        }
        (None, None) => {
            report.push(ValidationIssue::error(
                Field::MonthlyAmount,
                f64::NAN,
                "Contribution amount is required",
            ));
            return None;
        }
    };

    if !supplied.is_finite() {
        report.push(ValidationIssue::error(field, supplied, "Amount must be a finite number"));
        return None;
    }
    if supplied <= 0.0 {
        report.push(ValidationIssue::error(field, supplied, "Amount must be greater than zero"));
    } else if supplied < MIN_AMOUNT {
        report.push(ValidationIssue::error(field, supplied, "Amount is below the minimum of 1,000"));
    } else if annual > MAX_ANNUAL_AMOUNT {
        report.push(ValidationIssue::error(
            field,
            supplied,
            "Annual contribution exceeds the maximum of 100,000,000",
        ));
    }

    Some((field, annual))
}

/// Returns true when the rate is finite
fn check_rate(rate: f64, report: &mut ValidationReport) -> bool {
    if !rate.is_finite() {
        report.push(ValidationIssue::error(Field::AnnualRate, rate, "Rate must be a finite number"));
        return false;
    }

    if rate < MIN_ANNUAL_RATE {
        report.push(ValidationIssue::error(
            Field::AnnualRate,
            rate,
            "Rate is below the minimum of 0.01%",
        ));
    } else if rate > MAX_ANNUAL_RATE {
        report.push(ValidationIssue::error(
            Field::AnnualRate,
            rate,
            "Rate exceeds the maximum of 30%",
        ));
    }

    if rate > SOFT_MAX_RATE {
        report.push(ValidationIssue::warning(
            Field::AnnualRate,
            rate,
            "Expected return above 15% is historically unusual",
        ));
    } else if rate < SOFT_MIN_RATE {
        report.push(ValidationIssue::warning(
            Field::AnnualRate,
            rate,
            "Expected return below -5% is historically unusual",
        ));
    }

    true
}

/// Returns true when the horizon is a finite whole number
fn check_years(years: f64, report: &mut ValidationReport) -> bool {
    if !years.is_finite() {
        report.push(ValidationIssue::error(Field::Years, years, "Years must be a finite number"));
        return false;
    }
    if years.fract() != 0.0 {
        report.push(ValidationIssue::error(Field::Years, years, "Years must be a whole number"));
        return false;
    }
    if years < MIN_YEARS as f64 || years > MAX_YEARS as f64 {
        report.push(ValidationIssue::error(Field::Years, years, "Years must be between 1 and 50"));
    }
    true
}
