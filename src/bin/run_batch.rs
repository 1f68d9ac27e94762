//! Run many plans against one household snapshot
//!
//! Projects every request file in parallel and writes each plan's terminal
//! net worth to CSV.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use log::{error, info};

use networth_projection::plan::load_request;
use networth_projection::projection::{InflationAdjustment, TaxTreatment};
use networth_projection::report::write_terminal_csv;
use networth_projection::snapshot::load_snapshot;
use networth_projection::{ScenarioRunner, SimulationConfig, SimulationRequest};

#[derive(Parser, Debug)]
#[command(name = "run_batch", about = "Project many plans against one snapshot in parallel")]
struct Cli {
    #[arg(long)]
    snapshot: PathBuf,
    #[arg(long = "request", required = true, help = "Request JSON (repeatable)")]
    requests: Vec<PathBuf>,
    #[arg(long, help = "First simulated month (YYYY-MM-DD); defaults to today")]
    start: Option<NaiveDate>,
    #[arg(long, default_value = "batch_terminal_net_worth.csv")]
    output: PathBuf,
    #[arg(long, default_value_t = TaxTreatment::ReportOnly)]
    tax_treatment: TaxTreatment,
    #[arg(long, default_value_t = InflationAdjustment::Subtract)]
    inflation_mode: InflationAdjustment,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let start = Instant::now();

    let snapshot = load_snapshot(&cli.snapshot)
        .with_context(|| format!("failed to load snapshot {}", cli.snapshot.display()))?;
    let requests = cli
        .requests
        .iter()
        .map(|path| load_request(path).with_context(|| format!("failed to load request {}", path.display())))
        .collect::<Result<Vec<SimulationRequest>>>()?;
    println!("Loaded {} plans in {:?}", requests.len(), start.elapsed());

    let config = SimulationConfig {
        tax_treatment: cli.tax_treatment,
        inflation_adjustment: cli.inflation_mode,
        ..Default::default()
    };
    let start_date = cli.start.unwrap_or_else(|| chrono::Local::now().date_naive());
    let runner = ScenarioRunner::with_config(snapshot, start_date, config);

    println!("Running projections...");
    let proj_start = Instant::now();
    let outcomes = runner.run_batch(&requests);
    println!("Projections complete in {:?}", proj_start.elapsed());

    let mut results = Vec::with_capacity(outcomes.len());
    for (request, outcome) in requests.iter().zip(outcomes) {
        match outcome {
            Ok(result) => results.push(result),
            Err(err) => error!("Plan {} skipped: {}", request.plan_id, err),
        }
    }
    info!("{} of {} plans projected", results.len(), requests.len());

    let file = File::create(&cli.output).with_context(|| format!("failed to create {}", cli.output.display()))?;
    write_terminal_csv(&results, BufWriter::new(file))?;
    println!("Output written to {}", cli.output.display());

    println!("\nBatch Summary:");
    for result in &results {
        println!("  Plan {:>6}: {:>3} years, final net worth ${:.2}", result.plan_id, result.years, result.final_net_worth());
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
