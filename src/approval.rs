//! Policy approval workflow
//!
//! Approving a DRAFT policy computes its risk allocation and commits the
//! status change, the allocation record and the audit entry in one atomic
//! store write. The policy status is only advanced by that write, so a
//! failed or lost commit leaves the policy DRAFT and safe to retry.

use chrono::Utc;
use serde::Serialize;
use std::thread;
use std::time::Duration;

use crate::access::{Actor, Permission};
use crate::allocation::{compute_allocation, AllocationResult, RiskAllocation};
use crate::audit::AuditEntry;
use crate::config::{NoTreatyAction, WorkflowConfig};
use crate::error::{ApprovalError, StoreError};
use crate::policy::{Policy, PolicyStatus};
use crate::store::{ApprovalCommit, ApprovalStore, PolicyStore, TreatyStore};
use crate::treaty::sort_for_allocation;

/// How the approved policy's exposure ended up covered
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Coverage {
    /// Sum insured within retention; nothing ceded
    NotRequired,
    /// Retained plus ceded equals the sum insured
    Ceded,
    /// Treaty limits left part of the ceded exposure unabsorbed
    Partial { unabsorbed: f64 },
    /// No treaty was eligible and the insurer kept the full exposure
    RetainedWithoutTreaty,
}

impl Coverage {
    fn of(result: &AllocationResult, tolerance: f64) -> Self {
        if !result.reinsurance_required() && result.is_fully_covered(tolerance) {
            Coverage::NotRequired
        } else if result.is_fully_covered(tolerance) {
            Coverage::Ceded
        } else {
            Coverage::Partial {
                unabsorbed: result.unabsorbed(),
            }
        }
    }
}

/// Synchronous response to an approval request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApprovalOutcome {
    pub policy_number: String,
    pub status: PolicyStatus,
    pub allocation: RiskAllocation,
    pub coverage: Coverage,
}

/// Approves policies against a store
#[derive(Debug)]
pub struct ApprovalWorkflow<S> {
    store: S,
    config: WorkflowConfig,
}

impl<S> ApprovalWorkflow<S>
where
    S: PolicyStore + TreatyStore + ApprovalStore,
{
    pub fn new(store: S, config: WorkflowConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Approve the DRAFT policy `policy_number` on behalf of `actor`
    pub fn approve(&self, policy_number: &str, actor: &Actor) -> Result<ApprovalOutcome, ApprovalError> {
        actor.require(Permission::ApprovePolicy)?;

        let policy = self.store.find_by_number(policy_number)?;
        policy.validate().map_err(|source| ApprovalError::InvalidPolicy {
            policy_number: policy_number.to_string(),
            source,
        })?;
        if !policy.is_draft() {
            return Err(ApprovalError::NotDraft {
                current: policy.status,
            });
        }

        let now = Utc::now();
        let as_of = self.config.respect_effective_dates.then(|| now.date_naive());
        let mut treaties = self.store.active_for_line(policy.line_of_business, as_of)?;
        sort_for_allocation(&mut treaties);

        let (result, coverage) = match compute_allocation(&policy, &treaties) {
            Ok(result) => {
                let coverage = Coverage::of(&result, self.config.coverage_tolerance);
                (result, coverage)
            }
            Err(err) => match self.config.no_treaty_action {
                NoTreatyAction::Reject => {
                    log::warn!("approval of {} rejected: {}", policy_number, err);
                    return Err(err.into());
                }
                NoTreatyAction::RetainFull => {
                    log::warn!("{}; approving with full retention", err);
                    (
                        AllocationResult::full_retention(policy.sum_insured),
                        Coverage::RetainedWithoutTreaty,
                    )
                }
            },
        };

        if let Coverage::Partial { unabsorbed } = coverage {
            log::warn!(
                "policy {} approved with {:.2} of exposure unabsorbed by treaties",
                policy_number,
                unabsorbed
            );
        }

        let approved = approved_copy(&policy, actor);
        let commit = ApprovalCommit {
            policy_number: policy.policy_number.clone(),
            approved_by: actor.user_id.clone(),
            allocation: RiskAllocation::from_result(&policy, result, &actor.user_id, now),
            audit: AuditEntry::policy_approval(&policy, &approved, actor, now),
        };

        let updated = self.commit_with_retry(&commit)?;

        log::info!(
            "policy {} approved by {}: allocation {} with {} cession line(s)",
            updated.policy_number,
            actor.user_id,
            commit.allocation.allocation_id(),
            commit.allocation.allocations().len()
        );

        Ok(ApprovalOutcome {
            policy_number: updated.policy_number,
            status: updated.status,
            allocation: commit.allocation,
            coverage,
        })
    }

    /// Commit, retrying transient storage failures with exponential backoff.
    ///
    /// A retry replays the same commit, so a write that landed before its
    /// error was reported comes back as success from the store.
    fn commit_with_retry(&self, commit: &ApprovalCommit) -> Result<Policy, StoreError> {
        let max_attempts = self.config.max_commit_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.store.commit_approval(commit) {
                Err(err) if err.is_transient() && attempt < max_attempts => {
                    let delay = self.config.retry_backoff_ms.saturating_mul(1 << (attempt - 1).min(16));
                    log::warn!(
                        "commit of {} failed (attempt {}/{}): {}; retrying in {}ms",
                        commit.policy_number,
                        attempt,
                        max_attempts,
                        err,
                        delay
                    );
                    thread::sleep(Duration::from_millis(delay));
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}

fn approved_copy(policy: &Policy, actor: &Actor) -> Policy {
    let mut approved = policy.clone();
    approved.status = PolicyStatus::Active;
    approved.approved_by = Some(actor.user_id.clone());
    approved
}
