//! Plan-level inputs: the simulation request and its allocation priorities

mod priority;
mod request;
pub mod loader;

pub use loader::{load_request, load_request_from_reader};
pub use priority::{
    normalize_weights, BucketType, Lifestyle, PlanPriority, PriorityAllocation, WEIGHT_TOLERANCE,
};
pub use request::{DefaultRates, SimulationRequest};
