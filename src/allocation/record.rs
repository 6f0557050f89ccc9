//! Persisted risk allocation record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

use super::result::{AllocationLine, AllocationResult};
use crate::policy::Policy;

static NEXT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// `RA-<policy>-<calculated_at, ms precision>-<sequence>`. The timestamp keeps
/// ids unique across runs; the sequence keeps them unique within one.
fn allocation_id(policy_number: &str, calculated_at: DateTime<Utc>, sequence: u64) -> String {
    format!(
        "RA-{}-{}-{:06}",
        policy_number,
        calculated_at.format("%Y%m%dT%H%M%S%3f"),
        sequence
    )
}

/// Immutable record of how one approval split a policy's exposure.
///
/// Fields are private; a re-approval produces a new record rather than
/// editing an existing one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAllocation {
    allocation_id: String,
    policy_id: String,
    policy_number: String,
    sum_insured: f64,
    retained_amount: f64,
    allocations: Vec<AllocationLine>,
    calculated_at: DateTime<Utc>,
    calculated_by: String,
}

impl RiskAllocation {
    /// Freeze a computed result into a record attributed to `calculated_by`
    pub fn from_result(
        policy: &Policy,
        result: AllocationResult,
        calculated_by: &str,
        calculated_at: DateTime<Utc>,
    ) -> Self {
        let sequence = NEXT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        Self {
            allocation_id: allocation_id(&policy.policy_number, calculated_at, sequence),
            policy_id: policy.policy_id.clone(),
            policy_number: policy.policy_number.clone(),
            sum_insured: result.exposure,
            retained_amount: result.retained_amount,
            allocations: result.allocations,
            calculated_at,
            calculated_by: calculated_by.to_string(),
        }
    }

    pub fn allocation_id(&self) -> &str {
        &self.allocation_id
    }

    pub fn policy_id(&self) -> &str {
        &self.policy_id
    }

    pub fn policy_number(&self) -> &str {
        &self.policy_number
    }

    pub fn sum_insured(&self) -> f64 {
        self.sum_insured
    }

    pub fn retained_amount(&self) -> f64 {
        self.retained_amount
    }

    pub fn allocations(&self) -> &[AllocationLine] {
        &self.allocations
    }

    pub fn calculated_at(&self) -> DateTime<Utc> {
        self.calculated_at
    }

    pub fn calculated_by(&self) -> &str {
        &self.calculated_by
    }

    pub fn ceded_total(&self) -> f64 {
        self.allocations.iter().map(|a| a.allocated_amount).sum()
    }

    /// Recover the numeric split this record was built from
    pub fn as_result(&self) -> AllocationResult {
        AllocationResult {
            exposure: self.sum_insured,
            retained_amount: self.retained_amount,
            allocations: self.allocations.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::LineOfBusiness;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_each_record_gets_its_own_id() {
        let policy = Policy::draft("POL-7", LineOfBusiness::Property, 100.0, 100.0);
        let now = Utc::now();
        let a = RiskAllocation::from_result(&policy, AllocationResult::full_retention(100.0), "u-1", now);
        let b = RiskAllocation::from_result(&policy, AllocationResult::full_retention(100.0), "u-1", now);

        assert_ne!(a.allocation_id(), b.allocation_id());
        assert!(a.allocation_id().starts_with("RA-POL-7-"));
        assert_eq!(a.as_result(), b.as_result());
        assert_eq!(a.calculated_by(), "u-1");
        assert_eq!(a.retained_amount(), 100.0);
    }

    #[test]
    fn test_id_carries_calculation_time() {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 15).unwrap();
        assert_eq!(allocation_id("POL-7", at, 1), "RA-POL-7-20260301T093015000-000001");

        // Same sequence number in a later run still yields a distinct id
        let later = at + Duration::milliseconds(1);
        assert_ne!(allocation_id("POL-7", at, 1), allocation_id("POL-7", later, 1));
    }
}
