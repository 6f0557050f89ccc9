//! Reinsurance Allocation - risk allocation engine for policy approval
//!
//! This library provides:
//! - Policy and treaty data models with CSV loaders
//! - The retained/ceded risk allocation calculation
//! - Immutable allocation records and review checks
//! - A policy approval workflow with role gating, audit trail and
//!   atomic persistence through pluggable stores

pub mod access;
pub mod allocation;
pub mod approval;
pub mod audit;
pub mod config;
pub mod error;
pub mod policy;
pub mod store;
pub mod treaty;

// Re-export commonly used types
pub use access::{Actor, Permission, Role};
pub use allocation::{compute_allocation, AllocationLine, AllocationResult, RiskAllocation};
pub use approval::{ApprovalOutcome, ApprovalWorkflow, Coverage};
pub use config::{NoTreatyAction, WorkflowConfig};
pub use error::{AllocationError, ApprovalError, LoadError, StoreError};
pub use policy::{LineOfBusiness, Policy, PolicyStatus};
pub use treaty::{Treaty, TreatyCatalog, TreatyType};
