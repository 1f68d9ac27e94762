//! Recurring revenue, expense and tax preprocessing
//!
//! Raw records are converted once, before the month loop, into monthly
//! amounts with resolved active windows.

use chrono::{Datelike, NaiveDate};

use crate::plan::SimulationRequest;
use crate::snapshot::{value, RecurringRecord, Snapshot, TaxCategory, TaxRecord};

/// Revenue category that stops at retirement
pub const EMPLOYMENT_INCOME: &str = "INCOME";

/// A revenue or expense line in monthly terms
#[derive(Debug, Clone, PartialEq)]
pub struct RecurringCashItem {
    pub monthly_amount: f64,
    /// First active date (inclusive)
    pub active_from: NaiveDate,
    /// Last active date (inclusive)
    pub active_until: NaiveDate,
    pub category: Option<String>,
}

impl RecurringCashItem {
    fn from_record(record: &RecurringRecord, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            monthly_amount: record
                .frequency
                .unwrap_or_default()
                .monthly_equivalent(value(record.amount)),
            active_from: record.start_date.unwrap_or(start),
            active_until: record.end_date.unwrap_or(end),
            category: record.category.clone(),
        }
    }

    pub fn is_active(&self, date: NaiveDate) -> bool {
        self.active_from <= date && date <= self.active_until
    }

    pub fn is_employment_income(&self) -> bool {
        self.category.as_deref() == Some(EMPLOYMENT_INCOME)
    }
}

/// A flat-rate tax rule with the rate as a decimal fraction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaxRule {
    pub category: TaxCategory,
    pub rate: f64,
}

impl TaxRule {
    fn from_record(record: &TaxRecord) -> Self {
        Self {
            category: record.category,
            rate: value(record.rate) / 100.0,
        }
    }

    /// Tax owed on a month's gross income
    pub fn tax_on(&self, income: f64) -> f64 {
        match self.category {
            TaxCategory::IncomeTax => income * self.rate,
            TaxCategory::Other => 0.0,
        }
    }
}

/// Preprocessed recurring flows for one run
#[derive(Debug, Clone, Default)]
pub struct CashFlowSchedule {
    pub revenues: Vec<RecurringCashItem>,
    pub expenses: Vec<RecurringCashItem>,
    pub taxes: Vec<TaxRule>,
}

impl CashFlowSchedule {
    /// Convert snapshot flows, defaulting windows to the start date and the end of
    /// the terminal year
    pub fn from_snapshot(snapshot: &Snapshot, start_date: NaiveDate, terminal_year: i32) -> Self {
        let end = NaiveDate::from_ymd_opt(terminal_year, 12, 31).unwrap_or(NaiveDate::MAX);

        Self {
            revenues: snapshot
                .revenues
                .iter()
                .map(|r| RecurringCashItem::from_record(r, start_date, end))
                .collect(),
            expenses: snapshot
                .expenses
                .iter()
                .map(|r| RecurringCashItem::from_record(r, start_date, end))
                .collect(),
            taxes: snapshot.taxes.iter().map(TaxRule::from_record).collect(),
        }
    }

    /// Gross income for the month; employment income stops from the retirement year
    pub fn income_for(&self, date: NaiveDate, request: &SimulationRequest) -> f64 {
        let retired = request.is_retired_in(date.year());
        self.revenues
            .iter()
            .filter(|r| r.is_active(date))
            .filter(|r| !(retired && r.is_employment_income()))
            .map(|r| r.monthly_amount)
            .sum()
    }

    /// Tax owed on the month's gross income
    pub fn tax_for(&self, income: f64) -> f64 {
        self.taxes.iter().map(|t| t.tax_on(income)).sum()
    }

    /// Active expense lines for the month, excluding the plan's extra spend
    pub fn expense_for(&self, date: NaiveDate) -> f64 {
        self.expenses
            .iter()
            .filter(|e| e.is_active(date))
            .map(|e| e.monthly_amount)
            .sum()
    }
}
