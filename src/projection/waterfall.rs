//! Surplus and deficit allocation
//!
//! A positive month first clears emergency debt, then splits what is left
//! across the plan's weighted buckets. A negative (or zero) month draws the
//! shortfall from the emergency-debt ledger.

use std::cmp::Ordering;

use log::debug;

use super::ledger::InstrumentLedger;
use super::state::LedgerRegistry;
use crate::plan::{BucketType, PriorityAllocation};

/// What the waterfall did with a month's cash
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WaterfallOutcome {
    /// Debt principal retired (emergency debt and DEBT buckets)
    pub repayment: f64,
    /// Added to surplus savings (SAVINGS buckets and DEBT overflow)
    pub saved: f64,
    /// Added to surplus investment
    pub invested: f64,
    /// Surplus that left the ledgers through SPEND buckets
    pub residual: f64,
    /// New emergency debt drawn to cover a deficit
    pub emergency_draw: f64,
}

/// Allocate a month's running cash flow across the registry
pub fn allocate(
    cash_flow: f64,
    allocations: &[PriorityAllocation],
    registry: &mut LedgerRegistry,
) -> WaterfallOutcome {
    let mut outcome = WaterfallOutcome::default();

    if cash_flow <= 0.0 {
        let shortfall = -cash_flow;
        registry.emergency_debt.add_principal(shortfall);
        outcome.emergency_draw = shortfall;
        if shortfall > 0.0 {
            debug!("deficit of {:.2} drawn on emergency debt", shortfall);
        }
        return outcome;
    }

    let mut surplus = cash_flow;

    if registry.emergency_debt.principal > 0.0 {
        let payback = registry.emergency_debt.pay_down(surplus);
        surplus -= payback;
        outcome.repayment += payback;
    }

    if surplus <= 0.0 {
        return outcome;
    }

    for allocation in allocations {
        let share = surplus * allocation.weight;
        match allocation.bucket_type {
            BucketType::Savings => {
                registry.surplus_savings.add_principal(share);
                outcome.saved += share;
            }
            BucketType::Invest => {
                registry.surplus_investment.add_principal(share);
                outcome.invested += share;
            }
            BucketType::Spend => {
                outcome.residual += share;
            }
            BucketType::Debt => {
                let (paid, leftover) = pay_highest_rate_first(registry, share);
                outcome.repayment += paid;
                if leftover > 0.0 {
                    registry.surplus_savings.add_principal(leftover);
                    outcome.saved += leftover;
                }
            }
        }
    }

    outcome
}

/// Pay outstanding debts by descending monthly rate, ties in registry order
///
/// Returns (principal retired, budget left over).
fn pay_highest_rate_first(registry: &mut LedgerRegistry, budget: f64) -> (f64, f64) {
    let mut outstanding: Vec<&mut InstrumentLedger> = registry.debts_mut().filter(|d| d.principal > 0.0).collect();

    // Stable sort keeps registry order among equal rates
    outstanding.sort_by(|a, b| b.monthly_rate.partial_cmp(&a.monthly_rate).unwrap_or(Ordering::Equal));

    let mut remaining = budget;
    let mut paid = 0.0;
    for debt in outstanding {
        if remaining <= 0.0 {
            break;
        }
        let retired = debt.pay_down(remaining);
        remaining -= retired;
        paid += retired;
    }

    (paid, remaining)
}
