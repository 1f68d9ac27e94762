//! Net worth projection CLI
//!
//! Projects one plan against one household snapshot and prints the yearly
//! roll-up. Optional CSV and JSON outputs.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use log::{info, warn};

use networth_projection::plan::{load_request, Lifestyle, PlanPriority};
use networth_projection::projection::{InflationAdjustment, TaxTreatment};
use networth_projection::report::{write_monthly_csv, write_yearly_csv};
use networth_projection::snapshot::load_snapshot;
use networth_projection::{ProjectionEngine, SimulationConfig};

#[derive(Parser, Debug)]
#[command(
    name = "networth",
    about = "Deterministic month-by-month household net worth projection"
)]
struct Cli {
    #[arg(long, help = "Household snapshot JSON")]
    snapshot: PathBuf,
    #[arg(long, help = "Simulation request JSON")]
    request: PathBuf,
    #[arg(long, help = "First simulated month (YYYY-MM-DD); defaults to today")]
    start: Option<NaiveDate>,
    #[arg(
        long = "lifestyle",
        help = "Lifestyle preset used to build the priority when the request has none (repeatable)"
    )]
    lifestyles: Vec<Lifestyle>,
    #[arg(long)]
    yearly_csv: Option<PathBuf>,
    #[arg(long)]
    monthly_csv: Option<PathBuf>,
    #[arg(long, help = "Write the full monthly result as JSON")]
    json: Option<PathBuf>,
    #[arg(long, default_value_t = TaxTreatment::ReportOnly, help = "report-only or deduct")]
    tax_treatment: TaxTreatment,
    #[arg(long, default_value_t = InflationAdjustment::Subtract, help = "subtract or deflate")]
    inflation_mode: InflationAdjustment,
    #[arg(long, help = "Annual emergency debt rate in percent")]
    emergency_rate: Option<f64>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let snapshot = load_snapshot(&cli.snapshot)
        .with_context(|| format!("failed to load snapshot {}", cli.snapshot.display()))?;
    let mut request = load_request(&cli.request)
        .with_context(|| format!("failed to load request {}", cli.request.display()))?;

    if request.allocations().is_none() && !cli.lifestyles.is_empty() {
        let priority = PlanPriority::from_lifestyles(&cli.lifestyles);
        info!("Built priority from {} lifestyle preset(s)", cli.lifestyles.len());
        request.priority = Some(priority);
    }
    if let Some(priority) = &request.priority {
        if let Err(err) = priority.validate() {
            warn!("Plan {} priority is not normalised: {}", request.plan_id, err);
        }
    }

    let mut config = SimulationConfig {
        tax_treatment: cli.tax_treatment,
        inflation_adjustment: cli.inflation_mode,
        ..Default::default()
    };
    if let Some(rate) = cli.emergency_rate {
        config.emergency_debt_annual_rate = rate;
    }

    let start = cli.start.unwrap_or_else(|| chrono::Local::now().date_naive());

    let engine = ProjectionEngine::new(config);
    let result = engine
        .simulate(&snapshot, &request, start)
        .with_context(|| format!("plan {} could not be simulated", request.plan_id))?;
    let summary = result.yearly_summary();

    println!("Plan {}: {} months from {}", result.plan_id, result.points.len(), start);
    println!(
        "{:>6} {:>16} {:>14} {:>14} {:>14} {:>14} {:>14}",
        "Year", "NetWorth", "Savings", "Investments", "Debts", "Assets", "NetCashFlow"
    );
    println!("{}", "-".repeat(98));
    for row in summary.rows() {
        println!(
            "{:>6} {:>16.2} {:>14.2} {:>14.2} {:>14.2} {:>14.2} {:>14.2}",
            row.year,
            row.net_worth,
            row.total_savings,
            row.total_investments,
            row.total_debts,
            row.total_assets,
            row.net_cash_flow,
        );
    }

    if let Some(path) = &cli.yearly_csv {
        let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        write_yearly_csv(&summary, BufWriter::new(file))?;
        println!("Yearly summary written to {}", path.display());
    }

    if let Some(path) = &cli.monthly_csv {
        let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        write_monthly_csv(&result, BufWriter::new(file))?;
        println!("Monthly points written to {}", path.display());
    }

    if let Some(path) = &cli.json {
        let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &result)?;
        println!("Result written to {}", path.display());
    }

    Ok(())
}
