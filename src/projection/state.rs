//! Ledger state owned by a single simulation run

use chrono::NaiveDate;
use log::debug;

use super::engine::SimulationConfig;
use super::ledger::{InstrumentLedger, LedgerKind, LedgerSnapshot};
use crate::plan::SimulationRequest;
use crate::snapshot::{rate_or, value, Snapshot};

/// Every ledger a run mutates
///
/// Built fresh from the snapshot for each run and dropped when it ends.
#[derive(Debug, Clone)]
pub struct LedgerRegistry {
    pub savings: Vec<InstrumentLedger>,
    pub investments: Vec<InstrumentLedger>,
    /// Standalone debts, in snapshot order
    pub debts: Vec<InstrumentLedger>,
    /// Loans attached to fixed assets, in snapshot order
    pub asset_loans: Vec<InstrumentLedger>,
    pub assets: Vec<InstrumentLedger>,

    /// Receives matured balances and allocated surplus
    pub surplus_savings: InstrumentLedger,
    /// Receives surplus allocated to investment
    pub surplus_investment: InstrumentLedger,
    /// Revolving debt that absorbs monthly deficits
    pub emergency_debt: InstrumentLedger,
}

impl LedgerRegistry {
    /// Build ledgers from snapshot records, filling missing rates from the request
    pub fn from_snapshot(snapshot: &Snapshot, request: &SimulationRequest, config: &SimulationConfig) -> Self {
        let defaults = &request.default_value;
        let inflation = defaults.inflation();
        let real = |nominal: f64| config.inflation_adjustment.real_rate(nominal, inflation);

        let savings = snapshot
            .savings
            .iter()
            .map(|r| {
                InstrumentLedger::new(
                    r.category.clone(),
                    LedgerKind::Savings,
                    value(r.amount),
                    rate_or(r.interest_rate, defaults.interest()),
                )
                .with_compound(r.compound.unwrap_or_default())
                .with_deposit(r.monthly_deposit())
                .with_maturity(r.maturity_date)
            })
            .collect();

        let investments = snapshot
            .investments
            .iter()
            .map(|r| {
                InstrumentLedger::new(
                    r.category.clone(),
                    LedgerKind::Investment,
                    value(r.amount),
                    real(rate_or(r.roi, defaults.roi())),
                )
                .with_compound(r.compound.unwrap_or_default())
                .with_dividend_rate(rate_or(r.dividend, defaults.dividend()))
                .with_deposit(r.monthly_deposit())
                .with_maturity(r.maturity_date)
            })
            .collect();

        let debts = snapshot
            .debts
            .iter()
            .map(|r| {
                InstrumentLedger::new(r.category.clone(), LedgerKind::Debt, value(r.loan_amount), value(r.interest_rate))
                    .with_repayment(value(r.repay_amount))
            })
            .collect();

        let assets = snapshot
            .assets
            .iter()
            .map(|r| {
                InstrumentLedger::new(r.category.clone(), LedgerKind::FixedAsset, value(r.amount), real(value(r.roi)))
                    .with_dividend_rate(value(r.dividend))
            })
            .collect();

        let asset_loans = snapshot
            .assets
            .iter()
            .filter(|r| r.has_loan())
            .map(|r| {
                InstrumentLedger::new(
                    format!("{} loan", r.category),
                    LedgerKind::Debt,
                    value(r.loan_amount),
                    value(r.interest_rate),
                )
                .with_repayment(value(r.repay_amount))
            })
            .collect();

        Self {
            savings,
            investments,
            debts,
            asset_loans,
            assets,
            surplus_savings: InstrumentLedger::new("Surplus savings", LedgerKind::Savings, 0.0, defaults.interest()),
            surplus_investment: InstrumentLedger::new(
                "Surplus investment",
                LedgerKind::Investment,
                0.0,
                real(defaults.roi()),
            )
            .with_dividend_rate(defaults.dividend()),
            emergency_debt: InstrumentLedger::new(
                "Emergency debt",
                LedgerKind::Debt,
                0.0,
                config.emergency_debt_annual_rate,
            ),
        }
    }

    /// Savings and investment ledgers that take scheduled deposits and can mature
    fn depositing_mut(&mut self) -> impl Iterator<Item = &mut InstrumentLedger> {
        self.savings.iter_mut().chain(self.investments.iter_mut())
    }

    /// All debt ledgers in payoff tie-break order: standalone, asset loans, emergency
    pub fn debts_mut(&mut self) -> impl Iterator<Item = &mut InstrumentLedger> {
        self.debts
            .iter_mut()
            .chain(self.asset_loans.iter_mut())
            .chain(std::iter::once(&mut self.emergency_debt))
    }

    pub fn all_ledgers_mut(&mut self) -> impl Iterator<Item = &mut InstrumentLedger> {
        self.savings
            .iter_mut()
            .chain(self.investments.iter_mut())
            .chain(self.debts.iter_mut())
            .chain(self.asset_loans.iter_mut())
            .chain(std::iter::once(&mut self.emergency_debt))
            .chain(self.assets.iter_mut())
            .chain(std::iter::once(&mut self.surplus_savings))
            .chain(std::iter::once(&mut self.surplus_investment))
    }

    /// Move matured savings and investment balances into surplus savings
    pub fn sweep_matured(&mut self, date: NaiveDate) -> f64 {
        let mut swept = 0.0;
        for ledger in self.depositing_mut() {
            if let Some(amount) = ledger.mature(date) {
                debug!("{} matured on {}: {:.2} swept to surplus savings", ledger.category, date, amount);
                swept += amount;
            }
        }
        self.surplus_savings.add_principal(swept);
        swept
    }

    /// Dividend cash from investments, fixed assets and surplus investment
    pub fn monthly_dividend(&self) -> f64 {
        self.investments
            .iter()
            .chain(self.assets.iter())
            .chain(std::iter::once(&self.surplus_investment))
            .map(InstrumentLedger::monthly_dividend)
            .sum()
    }

    /// Add every positive scheduled deposit, returning the total deposited
    pub fn apply_scheduled_deposits(&mut self) -> f64 {
        let mut deposited = 0.0;
        for ledger in self.depositing_mut() {
            if ledger.scheduled_deposit > 0.0 {
                let deposit = ledger.scheduled_deposit;
                ledger.add_principal(deposit);
                deposited += deposit;
            }
        }
        deposited
    }

    /// Pay each outstanding debt's scheduled repayment, returning the total paid
    pub fn service_debts(&mut self) -> f64 {
        let mut paid = 0.0;
        for debt in self.debts_mut() {
            if debt.principal <= 0.0 {
                continue;
            }
            let repayment = debt.scheduled_repayment;
            paid += debt.pay_down(repayment);
        }
        paid
    }

    pub fn apply_growth(&mut self) {
        for ledger in self.all_ledgers_mut() {
            ledger.apply_growth();
        }
    }

    /// Savings snapshots, surplus savings last
    pub fn savings_snapshots(&self) -> Vec<LedgerSnapshot> {
        self.savings
            .iter()
            .chain(std::iter::once(&self.surplus_savings))
            .map(InstrumentLedger::snapshot)
            .collect()
    }

    /// Investment snapshots, surplus investment last
    pub fn investment_snapshots(&self) -> Vec<LedgerSnapshot> {
        self.investments
            .iter()
            .chain(std::iter::once(&self.surplus_investment))
            .map(InstrumentLedger::snapshot)
            .collect()
    }

    /// Debt snapshots: standalone, asset loans, emergency
    pub fn debt_snapshots(&self) -> Vec<LedgerSnapshot> {
        self.debts
            .iter()
            .chain(self.asset_loans.iter())
            .chain(std::iter::once(&self.emergency_debt))
            .map(InstrumentLedger::snapshot)
            .collect()
    }

    pub fn asset_snapshots(&self) -> Vec<LedgerSnapshot> {
        self.assets.iter().map(InstrumentLedger::snapshot).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::InflationAdjustment;
    use crate::rates::monthly_rate;
    use crate::snapshot::{AssetRecord, DebtRecord, InvestmentRecord, SavingsRecord};
    use approx::assert_relative_eq;

    fn request() -> SimulationRequest {
        let mut request = SimulationRequest::new(1, 2030);
        request.default_value.default_interest = Some(2.0);
        request.default_value.default_roi = Some(8.0);
        request.default_value.inflation = Some(3.0);
        request
    }

    #[test]
    fn test_rates_fall_back_to_defaults() {
        let mut snapshot = Snapshot::default();
        snapshot.savings.push(SavingsRecord::new("CASH", 500.0, 0.0));
        snapshot.investments.push(InvestmentRecord::new("ETF", 1000.0, 0.0));

        let registry = LedgerRegistry::from_snapshot(&snapshot, &request(), &SimulationConfig::default());

        assert_relative_eq!(registry.savings[0].monthly_rate, monthly_rate(2.0));
        // Investments grow at ROI less inflation
        assert_relative_eq!(registry.investments[0].monthly_rate, monthly_rate(5.0));
        assert_relative_eq!(registry.surplus_investment.monthly_rate, monthly_rate(5.0));
        assert_relative_eq!(registry.emergency_debt.monthly_rate, monthly_rate(5.0));
    }

    #[test]
    fn test_deflate_adjustment() {
        let mut snapshot = Snapshot::default();
        snapshot.investments.push(InvestmentRecord::new("ETF", 1000.0, 8.0));

        let config = SimulationConfig {
            inflation_adjustment: InflationAdjustment::Deflate,
            ..Default::default()
        };
        let registry = LedgerRegistry::from_snapshot(&snapshot, &request(), &config);

        let expected = monthly_rate((1.08 / 1.03 - 1.0) * 100.0);
        assert_relative_eq!(registry.investments[0].monthly_rate, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_asset_loans_become_debt_ledgers() {
        let mut snapshot = Snapshot::default();
        let mut house = AssetRecord::new("HOUSE", 400_000.0, 2.0);
        house.loan_amount = Some(250_000.0);
        house.repay_amount = Some(1_500.0);
        house.interest_rate = Some(4.0);
        snapshot.assets.push(house);
        snapshot.assets.push(AssetRecord::new("JEWELRY", 5_000.0, 0.0));
        snapshot.debts.push(DebtRecord::new("CREDIT_LOAN", 3_000.0, 9.0, 200.0));

        let mut registry = LedgerRegistry::from_snapshot(&snapshot, &request(), &SimulationConfig::default());

        assert_eq!(registry.assets.len(), 2);
        assert_eq!(registry.asset_loans.len(), 1);
        assert_eq!(registry.asset_loans[0].category, "HOUSE loan");
        assert_eq!(registry.asset_loans[0].scheduled_repayment, 1_500.0);

        let order: Vec<String> = registry.debts_mut().map(|d| d.category.clone()).collect();
        assert_eq!(order, vec!["CREDIT_LOAN", "HOUSE loan", "Emergency debt"]);
    }

    #[test]
    fn test_service_debts_caps_at_principal() {
        let mut snapshot = Snapshot::default();
        snapshot.debts.push(DebtRecord::new("CREDIT_LOAN", 150.0, 0.0, 200.0));
        snapshot.debts.push(DebtRecord::new("STUDENT_LOAN", 1000.0, 0.0, 100.0));

        let mut registry = LedgerRegistry::from_snapshot(&snapshot, &request(), &SimulationConfig::default());
        let paid = registry.service_debts();

        assert_relative_eq!(paid, 250.0);
        assert_eq!(registry.debts[0].principal, 0.0);
        assert_relative_eq!(registry.debts[1].principal, 900.0);
    }

    #[test]
    fn test_scheduled_deposits() {
        let mut snapshot = Snapshot::default();
        let mut installment = SavingsRecord::new("INSTALLMENT", 0.0, 3.0);
        installment.deposit = Some(250.0);
        snapshot.savings.push(installment);
        let mut fund = InvestmentRecord::new("FUND", 100.0, 6.0);
        fund.deposit = Some(50.0);
        snapshot.investments.push(fund);

        let mut registry = LedgerRegistry::from_snapshot(&snapshot, &request(), &SimulationConfig::default());
        assert_relative_eq!(registry.apply_scheduled_deposits(), 300.0);
        assert_relative_eq!(registry.savings[0].principal, 250.0);
        assert_relative_eq!(registry.investments[0].principal, 150.0);
    }
}
