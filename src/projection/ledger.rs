//! Per-instrument balance tracking

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::rates::{monthly_rate, round2};
use crate::snapshot::CompoundMode;

/// What an instrument is, which decides how it grows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerKind {
    Savings,
    Investment,
    Debt,
    FixedAsset,
}

impl LedgerKind {
    pub fn is_debt(&self) -> bool {
        matches!(self, LedgerKind::Debt)
    }
}

/// Rounded view of a ledger for output
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub amount: f64,
    pub principal: f64,
    pub interest: f64,
}

/// Mutable balance of a single instrument during one run
#[derive(Debug, Clone)]
pub struct InstrumentLedger {
    pub category: String,
    pub kind: LedgerKind,
    pub compound: CompoundMode,

    /// Base balance; never negative
    pub principal: f64,

    /// Accrued growth on assets. Debts fold growth into principal.
    pub interest: f64,

    /// Effective monthly growth rate
    pub monthly_rate: f64,

    /// Effective monthly dividend rate
    pub monthly_dividend_rate: f64,

    /// Deposit added every month until maturity
    pub scheduled_deposit: f64,

    /// Date the balance is swept to surplus savings
    pub maturity_date: Option<NaiveDate>,

    /// Mandatory monthly repayment on debts
    pub scheduled_repayment: f64,
}

impl InstrumentLedger {
    /// Create a compounding ledger from an amount and an annual rate in percent
    pub fn new(category: impl Into<String>, kind: LedgerKind, amount: f64, annual_rate_pct: f64) -> Self {
        Self {
            category: category.into(),
            kind,
            compound: CompoundMode::Compound,
            principal: amount.max(0.0),
            interest: 0.0,
            monthly_rate: monthly_rate(annual_rate_pct),
            monthly_dividend_rate: 0.0,
            scheduled_deposit: 0.0,
            maturity_date: None,
            scheduled_repayment: 0.0,
        }
    }

    pub fn with_compound(mut self, compound: CompoundMode) -> Self {
        self.compound = compound;
        self
    }

    /// Annual dividend yield in percent
    pub fn with_dividend_rate(mut self, annual_dividend_pct: f64) -> Self {
        self.monthly_dividend_rate = monthly_rate(annual_dividend_pct);
        self
    }

    pub fn with_deposit(mut self, monthly_deposit: f64) -> Self {
        self.scheduled_deposit = monthly_deposit;
        self
    }

    pub fn with_maturity(mut self, maturity_date: Option<NaiveDate>) -> Self {
        self.maturity_date = maturity_date;
        self
    }

    pub fn with_repayment(mut self, monthly_repayment: f64) -> Self {
        self.scheduled_repayment = monthly_repayment;
        self
    }

    /// Principal plus accrued interest
    pub fn balance(&self) -> f64 {
        self.principal + self.interest
    }

    pub fn add_principal(&mut self, amount: f64) {
        self.principal += amount;
    }

    /// Draw down the balance, interest first
    pub fn subtract_total(&mut self, amount: f64) {
        if self.interest >= amount {
            self.interest -= amount;
        } else {
            let remaining = amount - self.interest;
            self.interest = 0.0;
            self.principal = (self.principal - remaining).max(0.0);
        }
    }

    /// Retire up to `amount` of principal, returning what was actually retired
    pub fn pay_down(&mut self, amount: f64) -> f64 {
        let paid = self.principal.min(amount).max(0.0);
        self.principal -= paid;
        paid
    }

    /// Apply one month of growth
    pub fn apply_growth(&mut self) {
        match (self.kind, self.compound) {
            (LedgerKind::Debt, _) => {
                self.principal += self.principal * self.monthly_rate;
            }
            (_, CompoundMode::Simple) => {
                self.interest += self.principal * self.monthly_rate;
            }
            (_, CompoundMode::Compound) => {
                self.interest += (self.principal + self.interest) * self.monthly_rate;
            }
        }
    }

    /// Cash dividend the current balance pays this month
    pub fn monthly_dividend(&self) -> f64 {
        self.balance() * self.monthly_dividend_rate
    }

    /// Empty the ledger if its maturity date has been reached, returning the
    /// swept balance
    pub fn mature(&mut self, date: NaiveDate) -> Option<f64> {
        match self.maturity_date {
            Some(maturity) if date >= maturity => {
                let swept = self.balance();
                self.principal = 0.0;
                self.interest = 0.0;
                self.scheduled_deposit = 0.0;
                self.maturity_date = None;
                Some(swept)
            }
            _ => None,
        }
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            amount: round2(self.balance()),
            principal: round2(self.principal),
            interest: round2(self.interest),
        }
    }
}
