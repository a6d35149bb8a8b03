//! Load batches of plans from CSV
//!
//! Expected columns: `label` (optional), `monthly_amount`, `annual_amount`
//! (legacy, optional), `annual_rate`, `years`. Rows are returned unvalidated.

use csv::{Reader, Trim};
use log::info;
use std::io::Read;
use std::path::Path;

use super::RawParams;
use crate::error::CalcResult;

/// Raw CSV row; empty cells deserialize to `None`
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    monthly_amount: Option<f64>,
    #[serde(default)]
    annual_amount: Option<f64>,
    annual_rate: f64,
    years: f64,
}

impl CsvRow {
    fn into_plan(self, row_number: usize) -> PlanRecord {
        let label = self
            .label
            .filter(|label| !label.trim().is_empty())
            .unwrap_or_else(|| format!("plan-{}", row_number));

        PlanRecord {
            label,
            raw: RawParams {
                monthly_amount: self.monthly_amount,
                annual_amount: self.annual_amount,
                annual_rate: self.annual_rate,
                years: self.years,
            },
        }
    }
}

/// One named plan from a batch file
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRecord {
    pub label: String,
    pub raw: RawParams,
}

/// Load all plans from a CSV file
pub fn load_plans<P: AsRef<Path>>(path: P) -> CalcResult<Vec<PlanRecord>> {
    let path = path.as_ref();
    let reader = csv::ReaderBuilder::new().trim(Trim::All).from_path(path)?;
    let plans = collect_plans(reader)?;
    info!("Loaded {} plans from {}", plans.len(), path.display());
    Ok(plans)
}

/// Load plans from any reader (e.g., string buffer, stdin)
pub fn load_plans_from_reader<R: Read>(reader: R) -> CalcResult<Vec<PlanRecord>> {
    let reader = csv::ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    collect_plans(reader)
}

fn collect_plans<R: Read>(mut reader: Reader<R>) -> CalcResult<Vec<PlanRecord>> {
    let mut plans = Vec::new();

    for (i, result) in reader.deserialize().enumerate() {
        let row: CsvRow = result?;
        plans.push(row.into_plan(i + 1));
    }

    Ok(plans)
}
