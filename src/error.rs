//! Error types for loading, allocation, persistence and approval

use thiserror::Error;

use crate::policy::PolicyStatus;

/// Failure reading a policy or treaty file
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown {field} value: {value}")]
    UnknownValue { field: &'static str, value: String },

    #[error("invalid date in {field}: {value}")]
    InvalidDate { field: &'static str, value: String },

    #[error("record {id} rejected: {source}")]
    Invalid {
        id: String,
        #[source]
        source: ValidationError,
    },
}

/// A policy or treaty whose amounts cannot be allocated against
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("sum insured must be positive, got {0}")]
    NonPositiveSumInsured(f64),

    #[error("retention limit must be non-negative, got {0}")]
    NegativeRetentionLimit(f64),

    #[error("share percentage must be within [0, 100], got {0}")]
    SharePercentageOutOfRange(f64),

    #[error("treaty limit must be non-negative, got {0}")]
    NegativeTreatyLimit(f64),

    #[error("effective window ends before it starts")]
    InvertedEffectiveWindow,

    #[error("treaty applies to no line of business")]
    NoLinesOfBusiness,
}

/// Abnormal outcome of the allocation calculation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AllocationError {
    /// Exposure above retention exists but nothing can absorb it
    #[error("no eligible treaty for policy {policy_number}: {ceded:.2} ceded exposure uncovered")]
    NoEligibleTreaty { policy_number: String, ceded: f64 },
}

/// Failure reported by a storage collaborator
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("policy {0} not found")]
    NotFound(String),

    /// Conditional write lost to a concurrent status change
    #[error("policy is not in DRAFT state. Current state: {current}")]
    Conflict { current: PolicyStatus },

    /// Retryable storage failure
    #[error("transient storage failure: {0}")]
    Transient(String),

    #[error("storage failure: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Transient(_))
    }
}

/// Errors surfaced by the policy approval workflow
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApprovalError {
    #[error("user {user_id} ({role}) lacks permission {permission}")]
    Forbidden {
        user_id: String,
        role: crate::access::Role,
        permission: crate::access::Permission,
    },

    #[error("policy {0} not found")]
    PolicyNotFound(String),

    #[error("policy {policy_number} is invalid: {source}")]
    InvalidPolicy {
        policy_number: String,
        #[source]
        source: ValidationError,
    },

    #[error("policy is not in DRAFT state. Current state: {current}")]
    NotDraft { current: PolicyStatus },

    #[error(transparent)]
    NoEligibleTreaty(#[from] AllocationError),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ApprovalError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(number) => ApprovalError::PolicyNotFound(number),
            StoreError::Conflict { current } => ApprovalError::NotDraft { current },
            other => ApprovalError::Store(other),
        }
    }
}
