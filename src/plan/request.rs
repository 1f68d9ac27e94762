//! Simulation request for a single plan

use serde::{Deserialize, Serialize};

use super::priority::{PlanPriority, PriorityAllocation};

fn default_interest_rate() -> Option<f64> {
    Some(0.02)
}

/// Fallback annual rates (percent) for instruments that carry none
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultRates {
    #[serde(default = "default_interest_rate")]
    pub default_interest: Option<f64>,
    #[serde(default)]
    pub default_roi: Option<f64>,
    #[serde(default)]
    pub default_dividend: Option<f64>,
    #[serde(default)]
    pub inflation: Option<f64>,
}

impl Default for DefaultRates {
    fn default() -> Self {
        Self {
            default_interest: default_interest_rate(),
            default_roi: None,
            default_dividend: None,
            inflation: None,
        }
    }
}

impl DefaultRates {
    pub fn interest(&self) -> f64 {
        self.default_interest.unwrap_or(0.0)
    }

    pub fn roi(&self) -> f64 {
        self.default_roi.unwrap_or(0.0)
    }

    pub fn dividend(&self) -> f64 {
        self.default_dividend.unwrap_or(0.0)
    }

    pub fn inflation(&self) -> f64 {
        self.inflation.unwrap_or(0.0)
    }
}

/// Everything about a plan the engine needs besides the snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub plan_id: i64,

    #[serde(default)]
    pub default_value: DefaultRates,

    /// Spending on top of the snapshot's expense lines, every month
    #[serde(default)]
    pub extra_monthly_spend: Option<f64>,

    #[serde(default)]
    pub priority: Option<PlanPriority>,

    /// First calendar year without employment income (None = never retires)
    #[serde(default)]
    pub retirement_year: Option<i32>,

    /// Last calendar year simulated
    pub expected_death_year: i32,
}

impl SimulationRequest {
    pub fn new(plan_id: i64, expected_death_year: i32) -> Self {
        Self {
            plan_id,
            default_value: DefaultRates::default(),
            extra_monthly_spend: None,
            priority: None,
            retirement_year: None,
            expected_death_year,
        }
    }

    pub fn with_priority(mut self, priority: PlanPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn extra_monthly_spend(&self) -> f64 {
        self.extra_monthly_spend.unwrap_or(0.0)
    }

    /// Allocation list, or None when the plan has no usable priority
    pub fn allocations(&self) -> Option<&[PriorityAllocation]> {
        self.priority
            .as_ref()
            .map(|p| p.allocations.as_slice())
            .filter(|a| !a.is_empty())
    }

    /// Whether employment income has stopped by `year`
    pub fn is_retired_in(&self, year: i32) -> bool {
        self.retirement_year.map_or(false, |r| year >= r)
    }
}
