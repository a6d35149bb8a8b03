//! Money-weighted return (IRR) of a contribution schedule
//!
//! Treats each payment as an outflow on its contribution date and the final
//! value as a single inflow at the horizon. For the annual-lump model this
//! recovers the plan's annual rate.

use super::contributions::InvestmentResult;
use super::engine::MONTHS_PER_YEAR;
use crate::params::CompoundingMode;

const TOLERANCE: f64 = 1e-12;
const MAX_ITERATIONS: usize = 200;

/// Lowest periodic rate the solver will try
const RATE_FLOOR: f64 = -0.99;
const RATE_CEILING: f64 = 10.0;

/// Longest schedule the solver will build (1,000 years of monthly payments)
const MAX_PERIODS: u32 = 12_000;

/// Periodic IRR of a cashflow schedule, solved with Newton-Raphson and a
/// bisection fallback.
///
/// # Arguments
/// * `cashflows` - Cash flow per period, index = period (positive = inflow, negative = outflow)
///
/// # Returns
/// * `Option<f64>` - Rate per period as a decimal, or None if there is no sign change or no
///   root in [-99%, 1000%]
pub fn periodic_irr(cashflows: &[f64]) -> Option<f64> {
    if cashflows.is_empty() {
        return None;
    }

    let has_inflow = cashflows.iter().any(|&cf| cf > 0.0);
    let has_outflow = cashflows.iter().any(|&cf| cf < 0.0);
    if !has_inflow || !has_outflow {
        return None;
    }

    let mut rate = 0.01;
    for _ in 0..MAX_ITERATIONS {
        let (npv, slope) = npv_with_slope(cashflows, rate);
        if slope.abs() < 1e-20 {
            break;
        }

        let next = (rate - npv / slope).clamp(RATE_FLOOR, RATE_CEILING);
        if (next - rate).abs() < TOLERANCE {
            return Some(next);
        }
        rate = next;
    }

    bisect(cashflows)
}

/// Effective annual money-weighted return of a calculated plan.
///
/// Payments fall at the end of each period of their contribution year
/// (yearly for the annual-lump model, monthly for the monthly model) and the
/// total value is received at the end of the last contribution year.
///
/// # Arguments
/// * `result` - A calculated plan; its `mode` picks the payment frequency
///
/// # Returns
/// * `Option<f64>` - Annual rate as a decimal (e.g., 0.05 for 5%), or None if the schedule
///   has no solution or the contribution years are inconsistent (empty, or a year 0)
pub fn money_weighted_return(result: &InvestmentResult) -> Option<f64> {
    let periods_per_year = match result.mode {
        CompoundingMode::AnnualLump => 1,
        CompoundingMode::Monthly => MONTHS_PER_YEAR,
    };

    let cashflows = contribution_cashflows(result, periods_per_year)?;
    periodic_irr(&cashflows).map(|rate| (1.0 + rate).powi(periods_per_year as i32) - 1.0)
}

/// Cashflow schedule: payments during each listed year, final value at the
/// end of the latest one. Missing years contribute nothing.
fn contribution_cashflows(result: &InvestmentResult, periods_per_year: u32) -> Option<Vec<f64>> {
    let contributions = &result.yearly_contributions;
    if contributions.iter().any(|c| c.year == 0) {
        return None;
    }

    let last_year = contributions.iter().map(|c| c.year).max()?;
    let periods = last_year.checked_mul(periods_per_year).filter(|&p| p <= MAX_PERIODS)? as usize;
    let mut cashflows = vec![0.0; periods + 1];

    for contribution in contributions {
        let payment = contribution.annual_amount / periods_per_year as f64;
        let first = ((contribution.year - 1) * periods_per_year) as usize;
        for cf in &mut cashflows[first + 1..=first + periods_per_year as usize] {
            *cf -= payment;
        }
    }

    cashflows[periods] += result.total_value;
    Some(cashflows)
}

fn npv_with_slope(cashflows: &[f64], rate: f64) -> (f64, f64) {
    let base = 1.0 + rate;
    cashflows
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(npv, slope), (t, &cf)| {
            let t = t as i32;
            (npv + cf / base.powi(t), slope - t as f64 * cf / base.powi(t + 1))
        })
}

fn npv(cashflows: &[f64], rate: f64) -> f64 {
    npv_with_slope(cashflows, rate).0
}

fn bisect(cashflows: &[f64]) -> Option<f64> {
    let mut low = RATE_FLOOR;
    let mut high = RATE_CEILING;
    let mut npv_low = npv(cashflows, low);

    if npv_low * npv(cashflows, high) > 0.0 {
        return None;
    }

    for _ in 0..MAX_ITERATIONS {
        let mid = (low + high) / 2.0;
        let npv_mid = npv(cashflows, mid);

        if npv_mid.abs() < TOLERANCE || (high - low) / 2.0 < TOLERANCE {
            return Some(mid);
        }

        if npv_mid * npv_low < 0.0 {
            high = mid;
        } else {
            low = mid;
            npv_low = npv_mid;
        }
    }

    None
}
