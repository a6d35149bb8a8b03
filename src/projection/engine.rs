//! Contribution attribution engine
//!
//! Decomposes the final value of a recurring contribution plan into the part
//! each contribution year grows to by the horizon. All functions are pure and
//! deterministic.

use log::{debug, warn};

use super::contributions::{InvestmentResult, YearlyContribution};
use crate::error::{CalcError, CalcResult};
use crate::params::{CompoundingMode, InvestmentParams};

/// Rate used in place of a non-finite rate
pub const DEFAULT_RATE: f64 = 0.01;

pub const MONTHS_PER_YEAR: u32 = 12;

/// Replace a non-finite rate with `DEFAULT_RATE`
pub fn normalize_rate(rate: f64) -> f64 {
    if rate.is_finite() {
        rate
    } else {
        DEFAULT_RATE
    }
}

/// Value of `present_value` after compounding at `rate` for `periods`.
///
/// Uses `powf` so results match `(1 + rate)^periods` bit for bit for any
/// `u32` period count. Rates at or below -100% are not clamped.
pub fn future_value(present_value: f64, rate: f64, periods: u32) -> f64 {
    let rate = normalize_rate(rate);
    if periods == 0 {
        return present_value;
    }

    present_value * (1.0 + rate).powf(periods as f64)
}

/// Future value of `periods` end-of-period payments (ordinary annuity)
pub fn annuity_future_value(payment: f64, rate: f64, periods: u32) -> f64 {
    let rate = normalize_rate(rate);
    if rate.abs() < 1e-12 {
        return payment * periods as f64;
    }

    payment * ((1.0 + rate).powf(periods as f64) - 1.0) / rate
}

/// Annual-lump model: each year's twelve payments are one deposit at year
/// end, compounded for the remaining `years - year` years.
pub fn calculate(params: &InvestmentParams) -> CalcResult<InvestmentResult> {
    ensure_horizon(params)?;

    let annual_amount = params.annual_amount();
    let yearly: Vec<YearlyContribution> = (1..=params.years)
        .map(|year| {
            let remaining_years = params.years - year;
            let value = future_value(annual_amount, params.annual_rate, remaining_years);
            YearlyContribution::new(year, params.monthly_amount, value)
        })
        .collect();

    let result = InvestmentResult::from_contributions(params, CompoundingMode::AnnualLump, yearly);
    debug!(
        "Annual-lump calculation: monthly={} rate={} years={} -> total_value={:.2}",
        params.monthly_amount, params.annual_rate, params.years, result.total_value
    );
    Ok(result)
}

/// Monthly model: every payment compounds on its own at `annual_rate / 12`
/// for `total_months - month_index` months, where `month_index` runs from 1.
pub fn calculate_with_monthly_compounding(params: &InvestmentParams) -> CalcResult<InvestmentResult> {
    ensure_horizon(params)?;

    let monthly_rate = normalize_rate(params.annual_rate) / MONTHS_PER_YEAR as f64;
    let total_months = params.total_months();

    let yearly: Vec<YearlyContribution> = (1..=params.years)
        .map(|year| {
            let first_month = (year - 1) * MONTHS_PER_YEAR;
            let value: f64 = (1..=MONTHS_PER_YEAR)
                .map(|month| {
                    let remaining_months = total_months - (first_month + month);
                    future_value(params.monthly_amount, monthly_rate, remaining_months)
                })
                .sum();
            YearlyContribution::new(year, params.monthly_amount, value)
        })
        .collect();

    let result = InvestmentResult::from_contributions(params, CompoundingMode::Monthly, yearly);
    debug!(
        "Monthly calculation: monthly={} rate={} years={} -> total_value={:.2}",
        params.monthly_amount, params.annual_rate, params.years, result.total_value
    );
    Ok(result)
}

/// Dispatch on the selected compounding model
pub fn calculate_with_mode(
    params: &InvestmentParams,
    mode: CompoundingMode,
) -> CalcResult<InvestmentResult> {
    match mode {
        CompoundingMode::AnnualLump => calculate(params),
        CompoundingMode::Monthly => calculate_with_monthly_compounding(params),
    }
}

fn ensure_horizon(params: &InvestmentParams) -> CalcResult<()> {
    if params.years == 0 {
        return Err(CalcError::InvalidHorizon { years: params.years });
    }
    if !params.annual_rate.is_finite() {
        warn!(
            "Non-finite annual rate {}; compounding at default {}",
            params.annual_rate, DEFAULT_RATE
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params(monthly: f64, rate: f64, years: u32) -> InvestmentParams {
        InvestmentParams::new(monthly, rate, years)
    }

    #[test]
    fn test_zero_periods_returns_present_value() {
        for rate in [0.0, 0.05, -0.3, -1.5, 2.0] {
            assert_eq!(future_value(1234.5, rate, 0), 1234.5);
        }
    }

    #[test]
    fn test_non_finite_rate_uses_default() {
        for periods in [0, 1, 7, 30] {
            for pv in [0.0, 100.0, 399_996.0] {
                assert_eq!(future_value(pv, f64::NAN, periods), future_value(pv, 0.01, periods));
                assert_eq!(
                    future_value(pv, f64::INFINITY, periods),
                    future_value(pv, 0.01, periods)
                );
            }
        }
    }

    #[test]
    fn test_matches_standard_exponentiation() {
        for rate in [0.0001_f64, 0.03, 0.05, 0.0725, 0.3, -0.02] {
            for periods in [1_u32, 2, 7, 29, 50, 600] {
                let expected = 1_000.0 * (1.0 + rate).powf(periods as f64);
                assert_eq!(future_value(1_000.0, rate, periods), expected);
            }
        }
    }

    #[test]
    fn test_large_period_count_does_not_wrap() {
        let periods = 3_000_000_000;
        assert_eq!(future_value(1.0, 0.01, periods), f64::INFINITY);
        assert_eq!(future_value(1.0, -0.01, periods), 0.0);
        assert_eq!(future_value(1.0, 0.0, u32::MAX), 1.0);
        assert!(annuity_future_value(1.0, 0.01, periods).is_infinite());
    }

    #[test]
    fn test_rate_at_or_below_minus_one_is_not_clamped() {
        assert_eq!(future_value(100.0, -1.0, 3), 0.0);
        assert_relative_eq!(future_value(100.0, -1.5, 2), 25.0, epsilon = 1e-12);
        assert_relative_eq!(future_value(100.0, -1.5, 3), -12.5, epsilon = 1e-12);
    }

    #[test]
    fn test_sum_invariant() {
        for p in [params(33_333.0, 0.05, 30), params(1_000.0, 0.3, 50), params(5_000.0, -0.02, 12)] {
            for result in [calculate(&p).unwrap(), calculate_with_monthly_compounding(&p).unwrap()] {
                let sum: f64 = result.yearly_contributions.iter().map(|c| c.contribution).sum();
                assert_eq!(sum, result.total_value);
            }
        }
    }

    #[test]
    fn test_zero_rate_identity() {
        let result = calculate(&params(10_000.0, 0.0, 15)).unwrap();
        for c in &result.yearly_contributions {
            assert_eq!(c.current_value, c.annual_amount);
        }
        assert_eq!(result.total_value, result.total_contributed);
        assert_eq!(result.total_profit, 0.0);
        assert_eq!(result.profit_rate, 0.0);

        let monthly = calculate_with_monthly_compounding(&params(10_000.0, 0.0, 15)).unwrap();
        for c in &monthly.yearly_contributions {
            assert_eq!(c.current_value, c.annual_amount);
        }
    }

    #[test]
    fn test_total_value_increases_with_years() {
        let mut previous = 0.0;
        for years in 1..=50 {
            let total = calculate(&params(10_000.0, 0.05, years)).unwrap().total_value;
            assert!(total > previous, "years={} total={} previous={}", years, total, previous);
            previous = total;
        }
    }

    #[test]
    fn test_monthly_exceeds_annual_lump() {
        let p = params(10_000.0, 0.05, 10);
        let annual = calculate(&p).unwrap();
        let monthly = calculate_with_monthly_compounding(&p).unwrap();

        assert!(monthly.total_value > annual.total_value);
        assert_eq!(monthly.total_contributed, annual.total_contributed);
        for (m, a) in monthly.yearly_contributions.iter().zip(&annual.yearly_contributions) {
            assert!(m.contribution >= a.contribution, "year {}", m.year);
        }
    }

    #[test]
    fn test_monthly_last_payment_does_not_compound() {
        let p = params(1_000.0, 0.12, 1);
        let result = calculate_with_monthly_compounding(&p).unwrap();
        // 12 payments at 1%/month, the last with zero months remaining
        let expected = annuity_future_value(1_000.0, 0.01, 12);
        assert_relative_eq!(result.total_value, expected, max_relative = 1e-12);
    }

    #[test]
    fn test_reference_scenario() {
        let p = params(33_333.0, 0.05, 30);
        let result = calculate(&p).unwrap();

        assert_eq!(result.total_contributed, 11_999_880.0);
        assert_eq!(result.yearly_contributions.len(), 30);

        let first = &result.yearly_contributions[0];
        assert_eq!(first.year, 1);
        assert_eq!(first.annual_amount, 399_996.0);
        assert_eq!(first.current_value, 399_996.0 * 1.05_f64.powf(29.0));

        let last = &result.yearly_contributions[29];
        assert_eq!(last.year, 30);
        assert_eq!(last.current_value, 399_996.0);
        assert_eq!(last.total_contributed, 11_999_880.0);

        let series: f64 = (1..=30).map(|y| 399_996.0 * 1.05_f64.powf((30 - y) as f64)).sum();
        assert_eq!(result.total_value, series);
        assert_relative_eq!(result.total_value, series, max_relative = 1e-12);
        assert_relative_eq!(
            result.total_value,
            annuity_future_value(399_996.0, 0.05, 30),
            max_relative = 1e-12
        );
        assert_relative_eq!(
            result.profit_rate,
            (result.total_value - 11_999_880.0) / 11_999_880.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_years_ascending() {
        let result = calculate(&params(5_000.0, 0.07, 8)).unwrap();
        let years: Vec<u32> = result.yearly_contributions.iter().map(|c| c.year).collect();
        assert_eq!(years, (1..=8).collect::<Vec<_>>());
    }

    #[test]
    fn test_zero_years_rejected() {
        let p = params(10_000.0, 0.05, 0);
        assert!(matches!(calculate(&p), Err(CalcError::InvalidHorizon { years: 0 })));
        assert!(matches!(
            calculate_with_monthly_compounding(&p),
            Err(CalcError::InvalidHorizon { years: 0 })
        ));
    }

    #[test]
    fn test_nan_rate_calculation_matches_default() {
        let nan = calculate(&params(10_000.0, f64::NAN, 10)).unwrap();
        let default = calculate(&params(10_000.0, DEFAULT_RATE, 10)).unwrap();
        assert_eq!(nan.total_value, default.total_value);

        let nan_monthly = calculate_with_monthly_compounding(&params(10_000.0, f64::NAN, 10)).unwrap();
        let default_monthly =
            calculate_with_monthly_compounding(&params(10_000.0, DEFAULT_RATE, 10)).unwrap();
        assert_eq!(nan_monthly.total_value, default_monthly.total_value);
    }

    #[test]
    fn test_repeat_calls_are_identical() {
        let p = params(12_345.0, 0.061, 27);
        assert_eq!(calculate(&p).unwrap(), calculate(&p).unwrap());
        assert_eq!(
            calculate_with_mode(&p, CompoundingMode::Monthly).unwrap(),
            calculate_with_monthly_compounding(&p).unwrap()
        );
    }
}
