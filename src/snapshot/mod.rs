//! Household snapshot data structures and loading

mod data;
pub mod loader;

pub use data::{
    AssetRecord, CompoundMode, DebtRecord, InvestmentRecord, RecurringRecord, SavingsRecord,
    Snapshot, TaxCategory, TaxRecord,
};
pub(crate) use data::{rate_or, value};
pub use loader::{load_snapshot, load_snapshot_from_reader};
