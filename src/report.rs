//! CSV output for simulation results

use std::io::Write;

use crate::error::LoadError;
use crate::projection::SimulationResult;
use crate::summary::YearlySummary;

const YEARLY_HEADER: &[&str] = &[
    "year",
    "net_worth",
    "total_savings",
    "total_investments",
    "total_debts",
    "total_assets",
    "net_cash_flow",
    "total_repayment",
    "total_income",
    "total_spend",
    "total_dividend",
    "total_deposit",
    "total_tax",
];

const MONTHLY_HEADER: &[&str] = &[
    "month_index",
    "date",
    "net_worth",
    "net_cash_flow",
    "repayment",
    "total_savings",
    "total_investments",
    "total_debts",
    "total_assets",
    "income",
    "spend",
    "dividend",
    "deposit",
    "tax",
];

const TERMINAL_HEADER: &[&str] = &["plan_id", "years", "final_net_worth"];

fn format_amount(value: f64) -> String {
    format!("{:.2}", value)
}

fn csv_writer<W: Write>(writer: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer)
}

/// One row per calendar year, columns named after the summary fields
pub fn write_yearly_csv(summary: &YearlySummary, writer: impl Write) -> Result<(), LoadError> {
    let mut csv = csv_writer(writer);
    csv.write_record(YEARLY_HEADER)?;

    for row in summary.rows() {
        csv.write_record(&[
            row.year.to_string(),
            format_amount(row.net_worth),
            format_amount(row.total_savings),
            format_amount(row.total_investments),
            format_amount(row.total_debts),
            format_amount(row.total_assets),
            format_amount(row.net_cash_flow),
            format_amount(row.total_repayment),
            format_amount(row.total_income),
            format_amount(row.total_spend),
            format_amount(row.total_dividend),
            format_amount(row.total_deposit),
            format_amount(row.total_tax),
        ])?;
    }

    csv.flush()?;
    Ok(())
}

/// One row per simulated month with ledger totals and flow buckets
pub fn write_monthly_csv(result: &SimulationResult, writer: impl Write) -> Result<(), LoadError> {
    let mut csv = csv_writer(writer);
    csv.write_record(MONTHLY_HEADER)?;

    for point in &result.points {
        csv.write_record(&[
            point.month_index.to_string(),
            point.date.format("%Y-%m-%d").to_string(),
            format_amount(point.net_worth),
            format_amount(point.net_cash_flow),
            format_amount(point.repayment),
            format_amount(point.total_savings()),
            format_amount(point.total_investments()),
            format_amount(point.total_debts()),
            format_amount(point.total_assets()),
            format_amount(point.buckets.income),
            format_amount(point.buckets.spend),
            format_amount(point.buckets.dividend),
            format_amount(point.buckets.deposit),
            format_amount(point.buckets.tax),
        ])?;
    }

    csv.flush()?;
    Ok(())
}

/// One row per plan with its final net worth
pub fn write_terminal_csv(results: &[SimulationResult], writer: impl Write) -> Result<(), LoadError> {
    let mut csv = csv_writer(writer);
    csv.write_record(TERMINAL_HEADER)?;

    for result in results {
        csv.write_record(&[
            result.plan_id.to_string(),
            result.years.to_string(),
            format_amount(result.final_net_worth()),
        ])?;
    }

    csv.flush()?;
    Ok(())
}
