//! Simulation output structures

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ledger::LedgerSnapshot;
use crate::summary::{summarize, YearlySummary};

/// Flow metrics for one month, rounded to cents
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FlowBuckets {
    pub income: f64,
    pub spend: f64,
    pub dividend: f64,
    pub deposit: f64,
    pub tax: f64,
}

/// State of the household at the end of one simulated month
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationPoint {
    /// Months since the start date (0-indexed)
    pub month_index: u32,
    pub date: NaiveDate,

    pub net_worth: f64,

    /// Cash available before deposits, debt service and allocation
    pub net_cash_flow: f64,

    /// Debt principal retired this month
    pub repayment: f64,

    // Ledger balances, one entry per ledger
    pub savings: Vec<LedgerSnapshot>,
    pub investments: Vec<LedgerSnapshot>,
    pub debts: Vec<LedgerSnapshot>,
    pub assets: Vec<LedgerSnapshot>,

    pub buckets: FlowBuckets,
}

fn total(snapshots: &[LedgerSnapshot]) -> f64 {
    snapshots.iter().map(|s| s.amount).sum()
}

impl SimulationPoint {
    pub fn total_savings(&self) -> f64 {
        total(&self.savings)
    }

    pub fn total_investments(&self) -> f64 {
        total(&self.investments)
    }

    pub fn total_debts(&self) -> f64 {
        total(&self.debts)
    }

    pub fn total_assets(&self) -> f64 {
        total(&self.assets)
    }
}

/// Complete month-by-month projection for one plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub plan_id: i64,

    /// Whole years covered (point count / 12)
    pub years: u32,

    pub points: Vec<SimulationPoint>,
}

impl SimulationResult {
    pub fn new(plan_id: i64) -> Self {
        Self {
            plan_id,
            years: 0,
            points: Vec::new(),
        }
    }

    /// Append the next month
    pub fn add_point(&mut self, point: SimulationPoint) {
        self.points.push(point);
        self.years = (self.points.len() / 12) as u32;
    }

    pub fn final_net_worth(&self) -> f64 {
        self.points.last().map(|p| p.net_worth).unwrap_or(0.0)
    }

    /// Roll the monthly points up into calendar years
    pub fn yearly_summary(&self) -> YearlySummary {
        summarize(self)
    }
}
