//! Scenario runner for batch and sensitivity runs
//!
//! Every run is independent, so batches and rate × horizon grids are
//! evaluated in parallel.

use log::info;
use rayon::prelude::*;
use serde::Serialize;

use crate::error::{CalcError, CalcResult};
use crate::params::{CompoundingMode, InvestmentParams, PlanRecord, RawParams, ValidationReport};
use crate::projection::{calculate_with_mode, InvestmentResult};

/// Outcome of one plan in a batch
#[derive(Debug)]
pub struct PlanOutcome {
    pub label: String,
    /// Validation findings; empty when the plan was clean
    pub report: ValidationReport,
    pub result: CalcResult<InvestmentResult>,
}

/// One cell of a sensitivity grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensitivityPoint {
    pub annual_rate: f64,
    pub years: u32,
    pub total_value: f64,
    pub total_contributed: f64,
    pub total_profit: f64,
    pub profit_rate: f64,
    /// Non-blocking validation findings for this cell
    pub warnings: usize,
}

/// Runs plans under one compounding mode
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::with_mode(CompoundingMode::Monthly);
/// let grid = runner.sensitivity(10_000.0, &[0.03, 0.05, 0.07], &[10, 20, 30])?;
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ScenarioRunner {
    mode: CompoundingMode,
}

impl ScenarioRunner {
    /// Runner using the annual-lump model
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mode: CompoundingMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> CompoundingMode {
        self.mode
    }

    /// Run one already-validated plan
    pub fn run(&self, params: &InvestmentParams) -> CalcResult<InvestmentResult> {
        calculate_with_mode(params, self.mode)
    }

    /// Validate, then run. Warnings are returned alongside the result.
    pub fn run_raw(&self, raw: &RawParams) -> CalcResult<(InvestmentResult, ValidationReport)> {
        let (params, report) = InvestmentParams::from_raw(raw)?;
        let result = self.run(&params)?;
        Ok((result, report))
    }

    /// Run many plans; each keeps its own validation report and result
    pub fn run_batch(&self, plans: &[PlanRecord]) -> Vec<PlanOutcome> {
        info!("Running {} plans ({} compounding)", plans.len(), self.mode);

        plans
            .par_iter()
            .map(|plan| {
                let label = plan.label.clone();
                match InvestmentParams::from_raw(&plan.raw) {
                    Ok((params, report)) => PlanOutcome {
                        label,
                        report,
                        result: self.run(&params),
                    },
                    Err(CalcError::InvalidParams(report)) => PlanOutcome {
                        label,
                        report: report.clone(),
                        result: Err(CalcError::InvalidParams(report)),
                    },
                    Err(e) => PlanOutcome {
                        label,
                        report: ValidationReport::new(),
                        result: Err(e),
                    },
                }
            })
            .collect()
    }

    /// Evaluate every rate × horizon combination for one monthly amount.
    /// Points are ordered rate-major, matching the input order.
    ///
    /// Each cell is validated like a single plan; the whole grid is rejected
    /// with `CalcError::InvalidParams` if any cell has an error.
    pub fn sensitivity(
        &self,
        monthly_amount: f64,
        rates: &[f64],
        horizons: &[u32],
    ) -> CalcResult<Vec<SensitivityPoint>> {
        let grid: Vec<(f64, u32)> = rates
            .iter()
            .flat_map(|&rate| horizons.iter().map(move |&years| (rate, years)))
            .collect();

        info!("Sensitivity grid: {} rates x {} horizons", rates.len(), horizons.len());

        grid.par_iter()
            .map(|&(annual_rate, years)| -> CalcResult<SensitivityPoint> {
                let raw = RawParams::new(monthly_amount, annual_rate, years as f64);
                let (result, report) = self.run_raw(&raw)?;
                Ok(SensitivityPoint {
                    annual_rate,
                    years,
                    total_value: result.total_value,
                    total_contributed: result.total_contributed,
                    total_profit: result.total_profit,
                    profit_rate: result.profit_rate,
                    warnings: report.warnings().count(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Field;

    fn record(label: &str, raw: RawParams) -> PlanRecord {
        PlanRecord { label: label.to_string(), raw }
    }

    #[test]
    fn test_run_batch_keeps_order_and_reports() {
        let plans = vec![
            record("ok", RawParams::new(10_000.0, 0.05, 10.0)),
            record("too-long", RawParams::new(10_000.0, 0.05, 51.0)),
            record("high-rate", RawParams::new(10_000.0, 0.2, 10.0)),
        ];

        let outcomes = ScenarioRunner::new().run_batch(&plans);
        assert_eq!(outcomes.len(), 3);

        assert_eq!(outcomes[0].label, "ok");
        assert!(outcomes[0].report.is_empty());
        assert!(outcomes[0].result.is_ok());

        assert!(matches!(outcomes[1].result, Err(CalcError::InvalidParams(_))));
        assert!(outcomes[1].report.has_errors());

        assert!(outcomes[2].result.is_ok());
        assert_eq!(outcomes[2].report.warnings().count(), 1);
    }

    #[test]
    fn test_sensitivity_grid() {
        let runner = ScenarioRunner::new();
        let grid = runner.sensitivity(10_000.0, &[0.03, 0.05, 0.07], &[10, 20]).unwrap();

        assert_eq!(grid.len(), 6);
        assert_eq!((grid[0].annual_rate, grid[0].years), (0.03, 10));
        assert_eq!((grid[1].annual_rate, grid[1].years), (0.03, 20));
        assert_eq!((grid[5].annual_rate, grid[5].years), (0.07, 20));

        // Higher rate, same horizon: higher value
        assert!(grid[4].total_value > grid[2].total_value);
        assert!(grid[2].total_value > grid[0].total_value);
    }

    #[test]
    fn test_sensitivity_rejects_zero_horizon() {
        let result = ScenarioRunner::new().sensitivity(10_000.0, &[0.05], &[0, 10]);
        match result {
            Err(CalcError::InvalidParams(report)) => {
                assert!(report.errors().all(|issue| issue.field == Field::Years));
            }
            other => panic!("expected InvalidParams, got {:?}", other),
        }
    }

    #[test]
    fn test_sensitivity_validates_every_cell() {
        let runner = ScenarioRunner::new();
        let result = runner.sensitivity(-5.0, &[5.0], &[200]);
        match result {
            Err(CalcError::InvalidParams(report)) => {
                let fields: Vec<Field> = report.errors().map(|issue| issue.field).collect();
                assert_eq!(fields, vec![Field::MonthlyAmount, Field::AnnualRate, Field::Years]);
            }
            other => panic!("expected InvalidParams, got {:?}", other),
        }

        // One bad rate rejects the whole grid
        assert!(runner.sensitivity(10_000.0, &[0.05, 0.5], &[10]).is_err());
    }

    #[test]
    fn test_sensitivity_counts_warnings() {
        let grid = ScenarioRunner::new().sensitivity(10_000.0, &[0.05, 0.2], &[10]).unwrap();
        assert_eq!(grid[0].warnings, 0);
        assert_eq!(grid[1].warnings, 1);
    }

    #[test]
    fn test_run_batch_reports_match_single_validation() {
        let plans = vec![
            record("clean", RawParams::new(10_000.0, 0.05, 10.0)),
            record("legacy", RawParams::from_annual(120_000.0, 0.2, 10.0)),
            record("rejected", RawParams::new(500.0, 0.05, 0.0)),
        ];

        let outcomes = ScenarioRunner::new().run_batch(&plans);
        for (plan, outcome) in plans.iter().zip(&outcomes) {
            assert_eq!(outcome.report, plan.raw.validate(), "plan {}", plan.label);
        }
        match &outcomes[2].result {
            Err(CalcError::InvalidParams(report)) => assert_eq!(report, &outcomes[2].report),
            other => panic!("expected InvalidParams, got {:?}", other),
        }
    }

    #[test]
    fn test_mode_is_applied() {
        let params = InvestmentParams::new(10_000.0, 0.05, 10);
        let annual = ScenarioRunner::new().run(&params).unwrap();
        let monthly = ScenarioRunner::with_mode(CompoundingMode::Monthly).run(&params).unwrap();

        assert_eq!(annual.mode, CompoundingMode::AnnualLump);
        assert_eq!(monthly.mode, CompoundingMode::Monthly);
        assert!(monthly.total_value > annual.total_value);
    }
}
