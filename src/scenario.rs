//! Scenario runner for batch projections
//!
//! Holds one household snapshot and runs any number of plans or engine
//! configurations against it. Each run builds its own ledgers, so plans can
//! be projected in parallel.

use chrono::NaiveDate;
use rayon::prelude::*;

use crate::error::SimulationError;
use crate::plan::SimulationRequest;
use crate::projection::{ProjectionEngine, SimulationConfig, SimulationResult};
use crate::snapshot::Snapshot;

/// Runs plans against a shared snapshot
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(snapshot, start_date);
/// let results = runner.run_batch(&requests);
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    snapshot: Snapshot,
    start_date: NaiveDate,
    config: SimulationConfig,
}

impl ScenarioRunner {
    /// Create a runner with the default engine configuration
    pub fn new(snapshot: Snapshot, start_date: NaiveDate) -> Self {
        Self::with_config(snapshot, start_date, SimulationConfig::default())
    }

    pub fn with_config(snapshot: Snapshot, start_date: NaiveDate, config: SimulationConfig) -> Self {
        Self {
            snapshot,
            start_date,
            config,
        }
    }

    /// Run a single plan
    pub fn run(&self, request: &SimulationRequest) -> Result<SimulationResult, SimulationError> {
        ProjectionEngine::new(self.config.clone()).simulate(&self.snapshot, request, self.start_date)
    }

    /// Run many plans in parallel; results keep the order of `requests`
    pub fn run_batch(&self, requests: &[SimulationRequest]) -> Vec<Result<SimulationResult, SimulationError>> {
        let engine = ProjectionEngine::new(self.config.clone());
        requests
            .par_iter()
            .map(|request| engine.simulate(&self.snapshot, request, self.start_date))
            .collect()
    }

    /// Run one plan under several engine configurations
    pub fn run_configs(
        &self,
        request: &SimulationRequest,
        configs: &[SimulationConfig],
    ) -> Vec<Result<SimulationResult, SimulationError>> {
        configs
            .iter()
            .map(|config| ProjectionEngine::new(config.clone()).simulate(&self.snapshot, request, self.start_date))
            .collect()
    }
}
