//! Post-hoc review of an allocation against its policy and treaties

use serde::Serialize;

use super::result::AllocationResult;
use crate::policy::Policy;
use crate::treaty::Treaty;

/// Default tolerance, in currency units, for the total-match check
pub const DEFAULT_COVERAGE_TOLERANCE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    /// Sum insured is above the policy retention limit (informational)
    RetentionExceeded,
    /// Retained plus ceded matches the sum insured
    TotalMatch,
    /// No single line exceeds the sum insured
    NoOverflow,
    /// Retained amount lies within [0, sum insured]
    RetainedValid,
    /// Every line is within its treaty limit
    TreatyLimitsRespected,
}

impl CheckKind {
    pub fn label(&self) -> &'static str {
        match self {
            CheckKind::RetentionExceeded => "Retention Limit Check",
            CheckKind::TotalMatch => "Total Allocation Match",
            CheckKind::NoOverflow => "No Overflow",
            CheckKind::RetainedValid => "Retention Valid",
            CheckKind::TreatyLimitsRespected => "Treaty Limits Respected",
        }
    }

    /// Informational checks describe the policy, not a defect
    pub fn is_informational(&self) -> bool {
        matches!(self, CheckKind::RetentionExceeded)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    pub kind: CheckKind,
    pub passed: bool,
    pub detail: String,
}

/// Retained and ceded shares of the sum insured
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationSummary {
    pub sum_insured: f64,
    pub retained_amount: f64,
    pub retained_pct: f64,
    pub ceded_amount: f64,
    pub ceded_pct: f64,
    pub unabsorbed_amount: f64,
}

impl AllocationSummary {
    pub fn from_result(result: &AllocationResult) -> Self {
        let pct = |amount: f64| {
            if result.exposure > 0.0 {
                amount / result.exposure * 100.0
            } else {
                0.0
            }
        };
        let ceded = result.ceded_total();
        Self {
            sum_insured: result.exposure,
            retained_amount: result.retained_amount,
            retained_pct: pct(result.retained_amount),
            ceded_amount: ceded,
            ceded_pct: pct(ceded),
            unabsorbed_amount: result.unabsorbed(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub policy_number: String,
    pub checks: Vec<CheckResult>,
    pub summary: AllocationSummary,
}

impl ValidationReport {
    /// True when every non-informational check passed
    pub fn all_passed(&self) -> bool {
        self.checks
            .iter()
            .filter(|c| !c.kind.is_informational())
            .all(|c| c.passed)
    }

    pub fn check(&self, kind: CheckKind) -> Option<&CheckResult> {
        self.checks.iter().find(|c| c.kind == kind)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.checks
            .iter()
            .filter(|c| !c.kind.is_informational() && !c.passed)
    }
}

/// Review `result` for `policy`. Lines whose treaty is not in `treaties`
/// cannot be limit-checked and are treated as within limit.
pub fn validate_allocation(
    policy: &Policy,
    result: &AllocationResult,
    treaties: &[Treaty],
    tolerance: f64,
) -> ValidationReport {
    let sum_insured = policy.sum_insured;
    let ceded = result.ceded_total();
    let total = result.retained_amount + ceded;
    let mut checks = Vec::with_capacity(5);

    let exceeds = sum_insured > policy.retention_limit;
    checks.push(CheckResult {
        kind: CheckKind::RetentionExceeded,
        passed: exceeds,
        detail: format!(
            "sum insured {:.2} vs retention limit {:.2}",
            sum_insured, policy.retention_limit
        ),
    });

    checks.push(CheckResult {
        kind: CheckKind::TotalMatch,
        passed: (total - sum_insured).abs() < tolerance,
        detail: format!("allocated {:.2} of sum insured {:.2}", total, sum_insured),
    });

    checks.push(CheckResult {
        kind: CheckKind::NoOverflow,
        passed: result
            .allocations
            .iter()
            .all(|a| a.allocated_amount <= sum_insured),
        detail: "no single allocation exceeds the sum insured".to_string(),
    });

    let retained_valid = result.retained_amount >= 0.0 && result.retained_amount <= sum_insured;
    checks.push(CheckResult {
        kind: CheckKind::RetainedValid,
        passed: retained_valid,
        detail: format!("company retains {:.2}", result.retained_amount),
    });

    let over_limit: Vec<&str> = result
        .allocations
        .iter()
        .filter(|a| {
            treaties
                .iter()
                .find(|t| t.treaty_id == a.treaty_id)
                .map_or(false, |t| a.allocated_amount > t.treaty_limit)
        })
        .map(|a| a.treaty_id.as_str())
        .collect();
    checks.push(CheckResult {
        kind: CheckKind::TreatyLimitsRespected,
        passed: over_limit.is_empty(),
        detail: if over_limit.is_empty() {
            "all allocations are within their treaty limits".to_string()
        } else {
            format!("over limit: {}", over_limit.join(", "))
        },
    });

    ValidationReport {
        policy_number: policy.policy_number.clone(),
        checks,
        summary: AllocationSummary::from_result(result),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::compute_allocation;
    use crate::policy::LineOfBusiness;
    use crate::treaty::TreatyType;
    use approx::assert_relative_eq;

    fn motor_policy(sum_insured: f64, retention: f64) -> Policy {
        Policy::draft("POL-V", LineOfBusiness::Motor, sum_insured, retention)
    }

    #[test]
    fn test_fully_covered_allocation_passes() {
        let policy = motor_policy(10_000_000.0, 5_000_000.0);
        let treaties = vec![Treaty::new("SP", TreatyType::Surplus, "R1", 0.0, 8_000_000.0, &[LineOfBusiness::Motor])];
        let result = compute_allocation(&policy, &treaties).unwrap();

        let report = validate_allocation(&policy, &result, &treaties, DEFAULT_COVERAGE_TOLERANCE);
        assert!(report.all_passed());
        assert_eq!(report.failures().count(), 0);
        assert_relative_eq!(report.summary.retained_pct, 50.0);
        assert_relative_eq!(report.summary.ceded_pct, 50.0);
    }

    #[test]
    fn test_under_coverage_flagged() {
        let policy = motor_policy(10_000_000.0, 5_000_000.0);
        let treaties = vec![Treaty::new("QS", TreatyType::QuotaShare, "R1", 30.0, 1_000_000.0, &[LineOfBusiness::Motor])];
        let result = compute_allocation(&policy, &treaties).unwrap();

        let report = validate_allocation(&policy, &result, &treaties, DEFAULT_COVERAGE_TOLERANCE);
        assert!(!report.all_passed());
        assert!(!report.check(CheckKind::TotalMatch).unwrap().passed);
        assert!(report.check(CheckKind::TreatyLimitsRespected).unwrap().passed);
        assert_relative_eq!(report.summary.unabsorbed_amount, 4_000_000.0);
    }

    #[test]
    fn test_retention_check_is_informational() {
        let policy = motor_policy(3_000_000.0, 5_000_000.0);
        let result = compute_allocation(&policy, &[]).unwrap();

        let report = validate_allocation(&policy, &result, &[], DEFAULT_COVERAGE_TOLERANCE);
        assert!(!report.check(CheckKind::RetentionExceeded).unwrap().passed);
        assert!(report.all_passed());
    }

    #[test]
    fn test_treaty_limit_breach_detected() {
        let policy = motor_policy(1_000.0, 0.0);
        let mut treaty = Treaty::new("SP", TreatyType::Surplus, "R1", 0.0, 1_000.0, &[LineOfBusiness::Motor]);
        let result = compute_allocation(&policy, std::slice::from_ref(&treaty)).unwrap();

        // Limit renegotiated downwards after the record was written
        treaty.treaty_limit = 400.0;
        let report = validate_allocation(&policy, &result, &[treaty], DEFAULT_COVERAGE_TOLERANCE);
        let check = report.check(CheckKind::TreatyLimitsRespected).unwrap();
        assert!(!check.passed);
        assert_eq!(check.detail, "over limit: SP");
    }
}
