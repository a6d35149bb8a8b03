//! Contribution Growth CLI
//!
//! Validates a plan, runs the selected compounding model and prints the
//! per-year breakdown. Every plan flag also reads from a `PLAN_*` environment
//! variable. Exits with status 2 when input fails validation.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use contribution_growth::format::{
    format_currency, format_percent, write_breakdown_csv, write_breakdown_table,
};
use contribution_growth::params::load_plans;
use contribution_growth::projection::money_weighted_return;
use contribution_growth::scenario::ScenarioRunner;
use contribution_growth::{CalcError, CompoundingMode, InvestmentResult, RawParams, ValidationReport};
use log::info;
use serde_json::json;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process;

const EXIT_INVALID_INPUT: i32 = 2;

#[derive(Parser)]
#[command(
    name = "contribution-growth",
    version,
    about = "Attribute the final value of a recurring investment plan to each contribution year"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table, global = true, env = "PLAN_OUTPUT")]
    output: OutputFormat,

    /// Compounding model: annual (lump per year) or monthly
    #[arg(long, default_value = "annual", global = true, env = "PLAN_MODE")]
    mode: CompoundingMode,
}

#[derive(Subcommand)]
enum Command {
    /// Calculate a single plan from flags or environment
    Calculate(PlanArgs),
    /// Calculate a single plan read from a JSON file
    File {
        /// Path to a JSON object with monthly_amount, annual_rate, years
        path: PathBuf,
    },
    /// Calculate every plan in a CSV file
    Batch {
        /// CSV with label, monthly_amount, annual_amount, annual_rate, years
        path: PathBuf,
    },
    /// Sweep annual rates and horizons for one monthly amount
    Sensitivity(SensitivityArgs),
}

#[derive(Args)]
struct PlanArgs {
    /// Amount contributed every month
    #[arg(long, env = "PLAN_MONTHLY_AMOUNT", allow_negative_numbers = true)]
    monthly_amount: Option<f64>,

    /// Legacy: amount contributed every year (used when --monthly-amount is absent)
    #[arg(long, env = "PLAN_ANNUAL_AMOUNT", allow_negative_numbers = true)]
    annual_amount: Option<f64>,

    /// Annual growth rate as a fraction (0.05 = 5%)
    #[arg(long, env = "PLAN_ANNUAL_RATE", allow_negative_numbers = true)]
    annual_rate: f64,

    /// Contribution years (also the valuation horizon)
    #[arg(long, env = "PLAN_YEARS", allow_negative_numbers = true)]
    years: f64,
}

impl From<PlanArgs> for RawParams {
    fn from(args: PlanArgs) -> Self {
        RawParams {
            monthly_amount: args.monthly_amount,
            annual_amount: args.annual_amount,
            annual_rate: args.annual_rate,
            years: args.years,
        }
    }
}

#[derive(Args)]
struct SensitivityArgs {
    /// Amount contributed every month
    #[arg(long, env = "PLAN_MONTHLY_AMOUNT")]
    monthly_amount: f64,

    /// Comma-separated annual rates
    #[arg(long, value_delimiter = ',', default_value = "0.03,0.05,0.07", allow_negative_numbers = true)]
    rates: Vec<f64>,

    /// Comma-separated horizons in years
    #[arg(long = "years", value_delimiter = ',', default_value = "10,20,30")]
    horizons: Vec<u32>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {:#}", e);
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let runner = ScenarioRunner::with_mode(cli.mode);

    match cli.command {
        Command::Calculate(args) => run_single(&runner, &args.into(), cli.output),
        Command::File { path } => {
            let file = File::open(&path)
                .with_context(|| format!("Unable to open plan file {}", path.display()))?;
            let raw: RawParams = serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("Invalid plan JSON in {}", path.display()))?;
            run_single(&runner, &raw, cli.output)
        }
        Command::Batch { path } => run_batch(&runner, &path, cli.output),
        Command::Sensitivity(args) => run_sensitivity(&runner, &args, cli.output),
    }
}

fn run_single(runner: &ScenarioRunner, raw: &RawParams, output: OutputFormat) -> Result<i32> {
    let (result, report) = match runner.run_raw(raw) {
        Ok(ok) => ok,
        Err(CalcError::InvalidParams(report)) => {
            print_issues(&report);
            return Ok(EXIT_INVALID_INPUT);
        }
        Err(e) => return Err(e.into()),
    };

    print_issues(&report);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match output {
        OutputFormat::Table => {
            write_breakdown_table(&mut out, &result)?;
            if let Some(mwr) = money_weighted_return(&result) {
                writeln!(out, "Money-weighted:    {}", format_percent(mwr, 2))?;
            }
        }
        OutputFormat::Json => {
            let value = single_json(&result, &report);
            serde_json::to_writer_pretty(&mut out, &value)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => write_breakdown_csv(&mut out, &result)?,
    }

    Ok(0)
}

fn single_json(result: &InvestmentResult, report: &ValidationReport) -> serde_json::Value {
    json!({
        "result": result,
        "summary": result.summary(),
        "performance": result.performance_stats(),
        "money_weighted_return": money_weighted_return(result),
        "issues": report.issues(),
    })
}

fn run_batch(runner: &ScenarioRunner, path: &Path, output: OutputFormat) -> Result<i32> {
    let plans = load_plans(path)
        .with_context(|| format!("Unable to load plans from {}", path.display()))?;
    let outcomes = runner.run_batch(&plans);
    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    info!("Batch complete: {} plans, {} rejected", outcomes.len(), failed);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match output {
        OutputFormat::Table => {
            writeln!(out, "{:<20} {:>18} {:>18} {:>10}  {}", "Plan", "Total Value", "Contributed", "Profit", "Notes")?;
            writeln!(out, "{}", "-".repeat(80))?;
            for outcome in &outcomes {
                match &outcome.result {
                    Ok(result) => writeln!(
                        out,
                        "{:<20} {:>18} {:>18} {:>10}  {} issue(s)",
                        outcome.label,
                        format_currency(result.total_value),
                        format_currency(result.total_contributed),
                        format_percent(result.profit_rate, 2),
                        outcome.report.len(),
                    )?,
                    Err(e) => writeln!(out, "{:<20} {:>18} {:>18} {:>10}  {}", outcome.label, "-", "-", "-", e)?,
                }
            }
        }
        OutputFormat::Json => {
            let rows: Vec<serde_json::Value> = outcomes
                .iter()
                .map(|outcome| match &outcome.result {
                    Ok(result) => json!({
                        "label": outcome.label,
                        "summary": result.summary(),
                        "issues": outcome.report.issues(),
                    }),
                    Err(e) => json!({
                        "label": outcome.label,
                        "error": e.to_string(),
                        "issues": outcome.report.issues(),
                    }),
                })
                .collect();
            serde_json::to_writer_pretty(&mut out, &rows)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(&mut out);
            wtr.write_record(["label", "status", "total_value", "total_contributed", "total_profit", "profit_rate"])?;
            for outcome in &outcomes {
                match &outcome.result {
                    Ok(result) => wtr.write_record([
                        outcome.label.clone(),
                        "ok".to_string(),
                        result.total_value.to_string(),
                        result.total_contributed.to_string(),
                        result.total_profit.to_string(),
                        result.profit_rate.to_string(),
                    ])?,
                    Err(_) => wtr.write_record([outcome.label.as_str(), "invalid", "", "", "", ""])?,
                }
            }
            wtr.flush()?;
        }
    }

    Ok(if failed > 0 { EXIT_INVALID_INPUT } else { 0 })
}

fn run_sensitivity(runner: &ScenarioRunner, args: &SensitivityArgs, output: OutputFormat) -> Result<i32> {
    let points = match runner.sensitivity(args.monthly_amount, &args.rates, &args.horizons) {
        Ok(points) => points,
        Err(CalcError::InvalidParams(report)) => {
            print_issues(&report);
            return Ok(EXIT_INVALID_INPUT);
        }
        Err(e) => return Err(e.into()),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match output {
        OutputFormat::Table => {
            writeln!(out, "{:>8} {:>6} {:>18} {:>18} {:>10}", "Rate", "Years", "Total Value", "Contributed", "Profit")?;
            writeln!(out, "{}", "-".repeat(64))?;
            for p in &points {
                writeln!(
                    out,
                    "{:>8} {:>6} {:>18} {:>18} {:>10}",
                    format_percent(p.annual_rate, 2),
                    p.years,
                    format_currency(p.total_value),
                    format_currency(p.total_contributed),
                    format_percent(p.profit_rate, 1),
                )?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &points)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(&mut out);
            for p in &points {
                wtr.serialize(p)?;
            }
            wtr.flush()?;
        }
    }

    Ok(0)
}

/// Validation findings go to stderr so stdout stays machine-readable
fn print_issues(report: &ValidationReport) {
    for issue in report.issues() {
        eprintln!("{}", issue);
    }
}
