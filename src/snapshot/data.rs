//! Snapshot records describing a household's instruments and recurring flows
//!
//! Records are read-only values. Numeric fields are optional so that absent or
//! `null` entries in an input document read as zero.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::rates::Frequency;

fn default_savings_category() -> String {
    "SAVINGS".to_string()
}

fn default_investment_category() -> String {
    "INVEST".to_string()
}

fn default_debt_category() -> String {
    "DEBT".to_string()
}

fn default_asset_category() -> String {
    "ASSET".to_string()
}

/// Read a null field as the type's default
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn category_or<'de, D>(deserializer: D, fallback: fn() -> String) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(fallback))
}

fn savings_category<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    category_or(deserializer, default_savings_category)
}

fn investment_category<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    category_or(deserializer, default_investment_category)
}

fn debt_category<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    category_or(deserializer, default_debt_category)
}

fn asset_category<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    category_or(deserializer, default_asset_category)
}

/// Absent and null amounts read as zero
pub(crate) fn value(v: Option<f64>) -> f64 {
    v.unwrap_or(0.0)
}

/// Absent, null and zero rates fall back to `default`
pub(crate) fn rate_or(v: Option<f64>, default: f64) -> f64 {
    match v {
        Some(rate) if rate != 0.0 => rate,
        _ => default,
    }
}

/// How accrued interest is credited on an asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompoundMode {
    /// Interest accrues on principal only
    Simple,
    /// Interest accrues on principal plus accrued interest
    #[default]
    Compound,
}

/// Category of a tax rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaxCategory {
    /// Flat rate on the month's gross income
    IncomeTax,
    /// Recorded but not modeled; also used when the category is missing
    #[default]
    #[serde(other)]
    Other,
}

/// A savings account, deposit or installment plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsRecord {
    #[serde(default = "default_savings_category", deserialize_with = "savings_category")]
    pub category: String,
    #[serde(default)]
    pub amount: Option<f64>,
    /// Annual interest rate in percent
    #[serde(default)]
    pub interest_rate: Option<f64>,
    #[serde(default)]
    pub compound: Option<CompoundMode>,
    #[serde(default)]
    pub deposit: Option<f64>,
    #[serde(default)]
    pub deposit_frequency: Option<Frequency>,
    #[serde(default)]
    pub maturity_date: Option<NaiveDate>,
}

/// A brokerage position, fund or other market investment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentRecord {
    #[serde(default = "default_investment_category", deserialize_with = "investment_category")]
    pub category: String,
    #[serde(default)]
    pub amount: Option<f64>,
    /// Annual return in percent
    #[serde(default)]
    pub roi: Option<f64>,
    /// Annual dividend yield in percent
    #[serde(default)]
    pub dividend: Option<f64>,
    #[serde(default)]
    pub compound: Option<CompoundMode>,
    #[serde(default)]
    pub deposit: Option<f64>,
    #[serde(default)]
    pub deposit_frequency: Option<Frequency>,
    #[serde(default)]
    pub maturity_date: Option<NaiveDate>,
}

/// A standalone loan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtRecord {
    #[serde(default = "default_debt_category", deserialize_with = "debt_category")]
    pub category: String,
    #[serde(default)]
    pub loan_amount: Option<f64>,
    /// Scheduled monthly repayment
    #[serde(default)]
    pub repay_amount: Option<f64>,
    /// Annual interest rate in percent
    #[serde(default)]
    pub interest_rate: Option<f64>,
}

/// A fixed asset (real estate, jewelry) with an optional attached loan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetRecord {
    #[serde(default = "default_asset_category", deserialize_with = "asset_category")]
    pub category: String,
    #[serde(default)]
    pub amount: Option<f64>,
    /// Annual appreciation in percent
    #[serde(default)]
    pub roi: Option<f64>,
    /// Annual rental or dividend yield in percent
    #[serde(default)]
    pub dividend: Option<f64>,
    /// Annual interest rate of the attached loan in percent
    #[serde(default)]
    pub interest_rate: Option<f64>,
    #[serde(default)]
    pub loan_amount: Option<f64>,
    #[serde(default)]
    pub repay_amount: Option<f64>,
}

/// A recurring revenue or expense line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringRecord {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub frequency: Option<Frequency>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

/// A flat tax rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: TaxCategory,
    /// Rate in percent
    #[serde(default)]
    pub rate: Option<f64>,
    #[serde(default)]
    pub frequency: Option<Frequency>,
}

/// Everything the engine needs to know about a household at the start date
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub savings: Vec<SavingsRecord>,
    #[serde(default)]
    pub investments: Vec<InvestmentRecord>,
    #[serde(default)]
    pub debts: Vec<DebtRecord>,
    #[serde(default)]
    pub assets: Vec<AssetRecord>,
    #[serde(default)]
    pub revenues: Vec<RecurringRecord>,
    #[serde(default)]
    pub expenses: Vec<RecurringRecord>,
    #[serde(default)]
    pub taxes: Vec<TaxRecord>,
}

impl SavingsRecord {
    /// Create a compounding savings record with no deposit or maturity
    pub fn new(category: &str, amount: f64, interest_rate: f64) -> Self {
        Self {
            category: category.to_string(),
            amount: Some(amount),
            interest_rate: Some(interest_rate),
            compound: None,
            deposit: None,
            deposit_frequency: None,
            maturity_date: None,
        }
    }

    /// Scheduled deposit converted to a monthly amount
    pub fn monthly_deposit(&self) -> f64 {
        self.deposit_frequency
            .unwrap_or_default()
            .monthly_equivalent(value(self.deposit))
    }
}

impl InvestmentRecord {
    pub fn new(category: &str, amount: f64, roi: f64) -> Self {
        Self {
            category: category.to_string(),
            amount: Some(amount),
            roi: Some(roi),
            dividend: None,
            compound: None,
            deposit: None,
            deposit_frequency: None,
            maturity_date: None,
        }
    }

    /// Scheduled deposit converted to a monthly amount
    pub fn monthly_deposit(&self) -> f64 {
        self.deposit_frequency
            .unwrap_or_default()
            .monthly_equivalent(value(self.deposit))
    }
}

impl DebtRecord {
    pub fn new(category: &str, loan_amount: f64, interest_rate: f64, repay_amount: f64) -> Self {
        Self {
            category: category.to_string(),
            loan_amount: Some(loan_amount),
            repay_amount: Some(repay_amount),
            interest_rate: Some(interest_rate),
        }
    }
}

impl AssetRecord {
    pub fn new(category: &str, amount: f64, roi: f64) -> Self {
        Self {
            category: category.to_string(),
            amount: Some(amount),
            roi: Some(roi),
            dividend: None,
            interest_rate: None,
            loan_amount: None,
            repay_amount: None,
        }
    }

    /// Whether this asset carries a loan that needs its own debt ledger
    pub fn has_loan(&self) -> bool {
        value(self.loan_amount) > 0.0
    }
}

impl RecurringRecord {
    pub fn new(category: &str, amount: f64, frequency: Frequency) -> Self {
        Self {
            category: Some(category.to_string()),
            amount: Some(amount),
            frequency: Some(frequency),
            start_date: None,
            end_date: None,
        }
    }

    /// Restrict the record to an inclusive date window
    pub fn between(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }
}
