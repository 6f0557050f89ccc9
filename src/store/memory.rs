//! In-memory store

use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::{ApprovalCommit, ApprovalStore, PolicyStore, TreatyStore};
use crate::allocation::RiskAllocation;
use crate::audit::AuditEntry;
use crate::error::StoreError;
use crate::policy::{LineOfBusiness, Policy, PolicyStatus};
use crate::treaty::{Treaty, TreatyCatalog};

#[derive(Debug, Default)]
struct Inner {
    policies: HashMap<String, Policy>,
    treaties: TreatyCatalog,
    allocations: Vec<RiskAllocation>,
    audit_log: Vec<AuditEntry>,
}

/// Policies, treaties, allocations and audit log behind one mutex
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    pub fn new(policies: Vec<Policy>, treaties: Vec<Treaty>) -> Self {
        let policies = policies
            .into_iter()
            .map(|p| (p.policy_number.clone(), p))
            .collect();
        Self {
            inner: Mutex::new(Inner {
                policies,
                treaties: TreatyCatalog::new(treaties),
                ..Default::default()
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))
    }

    pub fn allocation_count(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.allocations.len())
    }
}

impl PolicyStore for InMemoryStore {
    fn find_by_number(&self, policy_number: &str) -> Result<Policy, StoreError> {
        self.lock()?
            .policies
            .get(policy_number)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(policy_number.to_string()))
    }
}

impl TreatyStore for InMemoryStore {
    fn active_for_line(
        &self,
        line: LineOfBusiness,
        as_of: Option<NaiveDate>,
    ) -> Result<Vec<Treaty>, StoreError> {
        Ok(self.lock()?.treaties.active_for_line(line, as_of))
    }
}

impl ApprovalStore for InMemoryStore {
    fn commit_approval(&self, commit: &ApprovalCommit) -> Result<Policy, StoreError> {
        let mut inner = self.lock()?;

        let allocation_id = commit.allocation.allocation_id();
        let replayed = inner.allocations.iter().any(|a| a.allocation_id() == allocation_id);

        let policy = inner
            .policies
            .get_mut(&commit.policy_number)
            .ok_or_else(|| StoreError::NotFound(commit.policy_number.clone()))?;

        if replayed {
            log::debug!("commit {} already stored, replay ignored", allocation_id);
            return Ok(policy.clone());
        }

        // Check-and-set: only a DRAFT policy may be approved
        if policy.status != PolicyStatus::Draft {
            return Err(StoreError::Conflict { current: policy.status });
        }

        policy.status = PolicyStatus::Active;
        policy.approved_by = Some(commit.approved_by.clone());
        let updated = policy.clone();

        inner.allocations.push(commit.allocation.clone());
        inner.audit_log.push(commit.audit.clone());

        Ok(updated)
    }

    fn allocations_for_policy(&self, policy_id: &str) -> Result<Vec<RiskAllocation>, StoreError> {
        Ok(self
            .lock()?
            .allocations
            .iter()
            .filter(|a| a.policy_id() == policy_id)
            .cloned()
            .collect())
    }

    fn all_allocations(&self) -> Result<Vec<RiskAllocation>, StoreError> {
        Ok(self.lock()?.allocations.clone())
    }

    fn audit_entries(&self, entity_id: &str) -> Result<Vec<AuditEntry>, StoreError> {
        Ok(self
            .lock()?
            .audit_log
            .iter()
            .filter(|e| e.entity_id == entity_id)
            .cloned()
            .collect())
    }
}
