//! Net Worth Projection - deterministic month-by-month household simulation
//!
//! This library provides:
//! - Snapshot and plan models loaded from JSON documents
//! - Per-instrument ledgers for savings, investments, debts and fixed assets
//! - A monthly engine with maturity sweeps, debt service and a weighted
//!   surplus/deficit waterfall
//! - Calendar-year roll-ups and CSV reports
//! - Parallel batch runs over many plans

pub mod error;
pub mod plan;
pub mod projection;
pub mod rates;
pub mod report;
pub mod scenario;
pub mod snapshot;
pub mod summary;

// Re-export commonly used types
pub use error::{LoadError, PriorityError, SimulationError};
pub use plan::{Lifestyle, PlanPriority, SimulationRequest};
pub use projection::{ProjectionEngine, SimulationConfig, SimulationPoint, SimulationResult};
pub use scenario::ScenarioRunner;
pub use snapshot::Snapshot;
pub use summary::{summarize, YearlySummary};
