//! Calendar-year roll-up of monthly simulation points

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::projection::{SimulationPoint, SimulationResult};
use crate::rates::round2;

/// Annual metrics as parallel sequences ordered by year
///
/// Balance metrics take the last simulated month of each year; flow metrics
/// are summed over the months simulated in that year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YearlySummary {
    pub years: Vec<i32>,

    // Year-end balances
    pub net_worth: Vec<f64>,
    pub total_savings: Vec<f64>,
    pub total_investments: Vec<f64>,
    pub total_debts: Vec<f64>,
    pub total_assets: Vec<f64>,

    // Flows summed over the year
    pub net_cash_flow: Vec<f64>,
    pub total_repayment: Vec<f64>,
    pub total_income: Vec<f64>,
    pub total_spend: Vec<f64>,
    pub total_dividend: Vec<f64>,
    pub total_deposit: Vec<f64>,
    pub total_tax: Vec<f64>,
}

/// One year of a [`YearlySummary`], for row-oriented output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearlyRow {
    pub year: i32,
    pub net_worth: f64,
    pub total_savings: f64,
    pub total_investments: f64,
    pub total_debts: f64,
    pub total_assets: f64,
    pub net_cash_flow: f64,
    pub total_repayment: f64,
    pub total_income: f64,
    pub total_spend: f64,
    pub total_dividend: f64,
    pub total_deposit: f64,
    pub total_tax: f64,
}

#[derive(Default)]
struct YearAccumulator<'a> {
    last: Option<&'a SimulationPoint>,
    net_cash_flow: f64,
    repayment: f64,
    income: f64,
    spend: f64,
    dividend: f64,
    deposit: f64,
    tax: f64,
}

impl<'a> YearAccumulator<'a> {
    fn add(&mut self, point: &'a SimulationPoint) {
        self.last = Some(point);
        self.net_cash_flow += point.net_cash_flow;
        self.repayment += point.repayment;
        self.income += point.buckets.income;
        self.spend += point.buckets.spend;
        self.dividend += point.buckets.dividend;
        self.deposit += point.buckets.deposit;
        self.tax += point.buckets.tax;
    }
}

/// Group a run's points by calendar year
pub fn summarize(result: &SimulationResult) -> YearlySummary {
    let mut by_year: BTreeMap<i32, YearAccumulator> = BTreeMap::new();
    for point in &result.points {
        by_year.entry(point.date.year()).or_default().add(point);
    }

    let mut summary = YearlySummary::default();
    for (year, acc) in by_year {
        let Some(last) = acc.last else { continue };

        summary.years.push(year);
        summary.net_worth.push(last.net_worth);
        summary.total_savings.push(round2(last.total_savings()));
        summary.total_investments.push(round2(last.total_investments()));
        summary.total_debts.push(round2(last.total_debts()));
        summary.total_assets.push(round2(last.total_assets()));

        summary.net_cash_flow.push(round2(acc.net_cash_flow));
        summary.total_repayment.push(round2(acc.repayment));
        summary.total_income.push(round2(acc.income));
        summary.total_spend.push(round2(acc.spend));
        summary.total_dividend.push(round2(acc.dividend));
        summary.total_deposit.push(round2(acc.deposit));
        summary.total_tax.push(round2(acc.tax));
    }

    summary
}

impl YearlySummary {
    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Zip the parallel sequences into one row per year
    pub fn rows(&self) -> Vec<YearlyRow> {
        (0..self.len())
            .map(|i| YearlyRow {
                year: self.years[i],
                net_worth: self.net_worth[i],
                total_savings: self.total_savings[i],
                total_investments: self.total_investments[i],
                total_debts: self.total_debts[i],
                total_assets: self.total_assets[i],
                net_cash_flow: self.net_cash_flow[i],
                total_repayment: self.total_repayment[i],
                total_income: self.total_income[i],
                total_spend: self.total_spend[i],
                total_dividend: self.total_dividend[i],
                total_deposit: self.total_deposit[i],
                total_tax: self.total_tax[i],
            })
            .collect()
    }
}
