//! Risk allocation calculation
//!
//! Splits a policy's exposure into the amount the insurer retains and the
//! amounts ceded to reinsurers under the eligible treaties:
//!
//! 1. exposure = sum insured
//! 2. retained = min(exposure, policy retention limit), ceded = exposure - retained
//! 3. treaties are walked in the order given, each taking its raw share
//!    (quota share: ceded x share %, surplus: the remaining balance),
//!    clamped to the treaty limit and to the remaining balance; every treaty
//!    walked gets a line, even when its amount is zero
//! 4. iteration stops once the balance is exhausted
//!
//! Any balance left after the last treaty stays unreported here; callers
//! detect it with [`AllocationResult::unabsorbed`].

use super::result::{AllocationLine, AllocationResult};
use crate::error::AllocationError;
use crate::policy::Policy;
use crate::treaty::{Treaty, TreatyType};

/// Compute the allocation for `policy` against `eligible_treaties`.
///
/// The treaty slice must already be filtered to active treaties covering the
/// policy's line of business and sorted into application order
/// (see [`crate::treaty::TreatyCatalog::eligible_for`]).
pub fn compute_allocation(
    policy: &Policy,
    eligible_treaties: &[Treaty],
) -> Result<AllocationResult, AllocationError> {
    let exposure = policy.sum_insured;
    let retained = exposure.min(policy.retention_limit).max(0.0);
    let ceded = exposure - retained;

    if ceded <= 0.0 {
        log::debug!(
            "policy {}: no reinsurance required, retaining {:.2}",
            policy.policy_number,
            retained
        );
        return Ok(AllocationResult::full_retention(exposure));
    }

    if eligible_treaties.is_empty() {
        return Err(AllocationError::NoEligibleTreaty {
            policy_number: policy.policy_number.clone(),
            ceded,
        });
    }

    let mut allocations = Vec::new();
    let mut balance = ceded;

    for treaty in eligible_treaties {
        if balance <= 0.0 {
            break;
        }

        let raw_share = match treaty.treaty_type {
            TreatyType::QuotaShare => ceded * (treaty.share_percentage / 100.0),
            TreatyType::Surplus => balance,
        };

        // A zero share or zero limit still records a line for the treaty
        let allocated = raw_share.min(treaty.treaty_limit).min(balance).max(0.0);

        log::debug!(
            "policy {}: treaty {} ({}) takes {:.2} of {:.2} remaining",
            policy.policy_number,
            treaty.treaty_id,
            treaty.treaty_type,
            allocated,
            balance
        );

        allocations.push(AllocationLine {
            reinsurer_id: treaty.reinsurer_id.clone(),
            treaty_id: treaty.treaty_id.clone(),
            treaty_type: treaty.treaty_type,
            allocated_amount: allocated,
            allocated_percentage: allocated / exposure * 100.0,
        });

        balance -= allocated;
    }

    if balance > 0.0 {
        log::warn!(
            "policy {}: treaty limits leave {:.2} of ceded exposure unabsorbed",
            policy.policy_number,
            balance
        );
    }

    Ok(AllocationResult {
        exposure,
        retained_amount: retained,
        allocations,
    })
}
