//! Allocation output structures

use serde::{Deserialize, Serialize};

use crate::treaty::TreatyType;

/// One cession to one reinsurer under one treaty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationLine {
    pub reinsurer_id: String,
    pub treaty_id: String,
    pub treaty_type: TreatyType,

    /// Amount ceded under the treaty, never above its treaty limit
    pub allocated_amount: f64,

    /// Allocated amount as a percentage of total exposure
    pub allocated_percentage: f64,
}

/// Split of a policy's exposure between the insurer and its reinsurers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationResult {
    /// Total exposure (the policy's sum insured)
    pub exposure: f64,

    /// Amount kept on the insurer's own account
    pub retained_amount: f64,

    /// Cessions in treaty application order
    pub allocations: Vec<AllocationLine>,
}

impl AllocationResult {
    /// Result where the insurer keeps everything and cedes nothing
    pub fn full_retention(exposure: f64) -> Self {
        Self {
            exposure,
            retained_amount: exposure,
            allocations: Vec::new(),
        }
    }

    /// Whether any exposure sits above the retained amount
    pub fn reinsurance_required(&self) -> bool {
        self.exposure > self.retained_amount
    }

    /// Sum of all cessions
    pub fn ceded_total(&self) -> f64 {
        self.allocations.iter().map(|a| a.allocated_amount).sum()
    }

    /// Exposure left with neither the insurer nor a reinsurer
    pub fn unabsorbed(&self) -> f64 {
        (self.exposure - self.retained_amount - self.ceded_total()).max(0.0)
    }

    /// Whether retained plus ceded reaches the exposure within `tolerance`
    pub fn is_fully_covered(&self, tolerance: f64) -> bool {
        self.unabsorbed() < tolerance
    }
}
