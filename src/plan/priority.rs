//! Surplus allocation priorities
//!
//! A plan's priority is a list of weighted buckets that split each month's
//! surplus. Weights are expected to sum to 1.0; `PlanPriority::validate` is the
//! check callers run before handing a plan to the engine.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PriorityError;

/// Tolerance used when checking that weights sum to one
pub const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Where an allocated share of surplus goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BucketType {
    /// Surplus savings ledger
    Savings,
    /// Surplus investment ledger
    Invest,
    /// Consumed; leaves the household
    Spend,
    /// Extra debt paydown, highest rate first
    Debt,
}

/// One weighted bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityAllocation {
    pub bucket: String,
    #[serde(rename = "type")]
    pub bucket_type: BucketType,
    pub weight: f64,
}

impl PriorityAllocation {
    pub fn new(bucket: &str, bucket_type: BucketType, weight: f64) -> Self {
        Self {
            bucket: bucket.to_string(),
            bucket_type,
            weight,
        }
    }
}

/// Ordered allocation set for a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanPriority {
    pub allocations: Vec<PriorityAllocation>,
}

impl Default for PlanPriority {
    /// Everything to savings
    fn default() -> Self {
        Self {
            allocations: vec![PriorityAllocation::new("SAVINGS", BucketType::Savings, 1.0)],
        }
    }
}

impl PlanPriority {
    pub fn new(allocations: Vec<PriorityAllocation>) -> Self {
        Self { allocations }
    }

    /// Check the allocation set is non-empty, non-negative, unique by bucket
    /// label and sums to 1.0
    pub fn validate(&self) -> Result<(), PriorityError> {
        if self.allocations.is_empty() {
            return Err(PriorityError::Empty);
        }

        if let Some(a) = self.allocations.iter().find(|a| a.weight < 0.0) {
            return Err(PriorityError::NegativeWeight(a.bucket.clone()));
        }

        let total: f64 = self.allocations.iter().map(|a| a.weight).sum();
        if total <= 0.0 {
            return Err(PriorityError::NonPositiveTotal);
        }
        if (total - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(PriorityError::NotNormalized(total));
        }

        let mut seen = HashSet::new();
        for a in &self.allocations {
            if !seen.insert(a.bucket.as_str()) {
                return Err(PriorityError::DuplicateBucket(a.bucket.clone()));
            }
        }

        Ok(())
    }

    /// Build a priority from lifestyle preferences
    ///
    /// Weights of matching presets are summed per bucket type and normalised.
    /// Each type is labelled by the first preset that contributed to it. An
    /// empty preference list gives the all-savings default.
    pub fn from_lifestyles(lifestyles: &[Lifestyle]) -> Self {
        let mut labels: Vec<(BucketType, &'static str)> = Vec::new();
        let mut weights: Vec<(BucketType, f64)> = Vec::new();

        for lifestyle in lifestyles {
            let (label, bucket_type, weight) = lifestyle.rule();
            match weights.iter_mut().find(|(t, _)| *t == bucket_type) {
                Some((_, w)) => *w += weight,
                None => {
                    weights.push((bucket_type, weight));
                    labels.push((bucket_type, label));
                }
            }
        }

        if weights.is_empty() {
            return Self::default();
        }

        let allocations = normalize_weights(&weights)
            .into_iter()
            .filter(|(_, w)| *w > 0.0)
            .map(|(bucket_type, weight)| {
                let label = labels
                    .iter()
                    .find(|(t, _)| *t == bucket_type)
                    .map(|(_, l)| *l)
                    .unwrap_or("SAVINGS");
                PriorityAllocation::new(label, bucket_type, weight)
            })
            .collect();

        Self { allocations }
    }
}

/// Scale weights so they sum to exactly 1.0
///
/// Floating point drift after scaling is folded into the largest weight. A
/// non-positive total collapses to all-savings.
pub fn normalize_weights(weights: &[(BucketType, f64)]) -> Vec<(BucketType, f64)> {
    let total: f64 = weights.iter().map(|(_, w)| w).sum();
    if total <= 0.0 {
        return vec![(BucketType::Savings, 1.0)];
    }

    let mut scaled: Vec<(BucketType, f64)> = weights.iter().map(|&(t, w)| (t, w / total)).collect();

    let diff = 1.0 - scaled.iter().map(|(_, w)| w).sum::<f64>();
    if diff.abs() > 1e-9 {
        if let Some(max) = scaled
            .iter_mut()
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        {
            max.1 += diff;
        }
    }

    scaled
}

/// Lifestyle presets offered when a plan is created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifestyle {
    EmergencyFund,
    CashReserve,
    SafeAssets,
    AggressiveInvesting,
    Yolo,
    Luxury,
    DebtFree,
    Retirement,
    HomeOwnership,
    Balanced,
    GoalOriented,
}

impl Lifestyle {
    /// Bucket label, bucket type and raw weight contributed by this preset
    pub fn rule(self) -> (&'static str, BucketType, f64) {
        match self {
            Lifestyle::EmergencyFund => ("EMERGENCY", BucketType::Savings, 40.0),
            Lifestyle::CashReserve => ("CASH", BucketType::Savings, 40.0),
            Lifestyle::SafeAssets => ("SAFETY", BucketType::Savings, 30.0),
            Lifestyle::AggressiveInvesting => ("INVEST", BucketType::Invest, 40.0),
            Lifestyle::Yolo => ("SPEND", BucketType::Spend, 30.0),
            Lifestyle::Luxury => ("INVEST", BucketType::Invest, 30.0),
            Lifestyle::DebtFree => ("DEBT_PAYDOWN", BucketType::Debt, 40.0),
            Lifestyle::Retirement
            | Lifestyle::HomeOwnership
            | Lifestyle::Balanced
            | Lifestyle::GoalOriented => ("SAVINGS", BucketType::Savings, 20.0),
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Lifestyle::EmergencyFund => "emergency-fund",
            Lifestyle::CashReserve => "cash-reserve",
            Lifestyle::SafeAssets => "safe-assets",
            Lifestyle::AggressiveInvesting => "aggressive-investing",
            Lifestyle::Yolo => "yolo",
            Lifestyle::Luxury => "luxury",
            Lifestyle::DebtFree => "debt-free",
            Lifestyle::Retirement => "retirement",
            Lifestyle::HomeOwnership => "home-ownership",
            Lifestyle::Balanced => "balanced",
            Lifestyle::GoalOriented => "goal-oriented",
        }
    }
}

impl fmt::Display for Lifestyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Lifestyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "emergency-fund" => Ok(Lifestyle::EmergencyFund),
            "cash-reserve" => Ok(Lifestyle::CashReserve),
            "safe-assets" => Ok(Lifestyle::SafeAssets),
            "aggressive-investing" => Ok(Lifestyle::AggressiveInvesting),
            "yolo" => Ok(Lifestyle::Yolo),
            "luxury" => Ok(Lifestyle::Luxury),
            "debt-free" => Ok(Lifestyle::DebtFree),
            "retirement" => Ok(Lifestyle::Retirement),
            "home-ownership" => Ok(Lifestyle::HomeOwnership),
            "balanced" => Ok(Lifestyle::Balanced),
            "goal-oriented" => Ok(Lifestyle::GoalOriented),
            other => Err(format!("Unknown lifestyle: {}", other)),
        }
    }
}
