//! Month-by-month projection engine and its ledgers

mod ledger;
mod state;
mod recurring;
mod waterfall;
mod engine;
mod cashflows;

pub use ledger::{InstrumentLedger, LedgerKind, LedgerSnapshot};
pub use state::LedgerRegistry;
pub use recurring::{CashFlowSchedule, RecurringCashItem, TaxRule, EMPLOYMENT_INCOME};
pub use waterfall::{allocate, WaterfallOutcome};
pub use engine::{
    InflationAdjustment, ProjectionEngine, SimulationConfig, TaxTreatment, DEFAULT_EMERGENCY_DEBT_RATE,
};
pub use cashflows::{FlowBuckets, SimulationPoint, SimulationResult};
