//! Storage collaborators used by the approval workflow
//!
//! The workflow only talks to these traits. [`InMemoryStore`] implements
//! all of them behind a single lock and backs the CLI and tests.

mod memory;

pub use memory::InMemoryStore;

use chrono::NaiveDate;

use crate::allocation::RiskAllocation;
use crate::audit::AuditEntry;
use crate::error::StoreError;
use crate::policy::{LineOfBusiness, Policy};
use crate::treaty::Treaty;

/// Read access to the policy register
pub trait PolicyStore {
    /// Look a policy up by its business key
    fn find_by_number(&self, policy_number: &str) -> Result<Policy, StoreError>;
}

/// Read access to the treaty catalog
pub trait TreatyStore {
    /// Active treaties covering `line`, optionally in force on `as_of`
    fn active_for_line(
        &self,
        line: LineOfBusiness,
        as_of: Option<NaiveDate>,
    ) -> Result<Vec<Treaty>, StoreError>;
}

/// Everything one approval writes
#[derive(Debug, Clone)]
pub struct ApprovalCommit {
    pub policy_number: String,
    pub approved_by: String,
    pub allocation: RiskAllocation,
    pub audit: AuditEntry,
}

/// Write side of the approval workflow
pub trait ApprovalStore {
    /// Atomically move the policy from DRAFT to ACTIVE, insert the
    /// allocation and append the audit entry.
    ///
    /// Must fail with [`StoreError::Conflict`] and write nothing when the
    /// stored policy is no longer DRAFT. Returns the updated policy.
    ///
    /// Idempotent on the allocation id: replaying a commit whose allocation
    /// is already stored writes nothing and returns the stored policy. A
    /// retry after a transient error whose write did land therefore
    /// succeeds instead of reporting a conflict.
    fn commit_approval(&self, commit: &ApprovalCommit) -> Result<Policy, StoreError>;

    /// Allocation records for a policy, oldest first
    fn allocations_for_policy(&self, policy_id: &str) -> Result<Vec<RiskAllocation>, StoreError>;

    /// Every allocation record, oldest first
    fn all_allocations(&self) -> Result<Vec<RiskAllocation>, StoreError>;

    /// Audit entries for an entity, oldest first
    fn audit_entries(&self, entity_id: &str) -> Result<Vec<AuditEntry>, StoreError>;
}
