//! Reinsurance risk allocation
//!
//! - [`compute_allocation`]: the pure retained/ceded split for one policy
//! - [`RiskAllocation`]: the immutable record written at approval time
//! - [`validate_allocation`]: review checks used by reporting screens

mod engine;
mod record;
mod result;
mod validation;

pub use engine::compute_allocation;
pub use record::RiskAllocation;
pub use result::{AllocationLine, AllocationResult};
pub use validation::{
    validate_allocation, AllocationSummary, CheckKind, CheckResult, ValidationReport,
    DEFAULT_COVERAGE_TOLERANCE,
};
