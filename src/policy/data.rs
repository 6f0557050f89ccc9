//! Policy data structures matching the back-office policy register

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// Line of business a policy is written under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LineOfBusiness {
    Health,
    Motor,
    Life,
    Property,
}

impl LineOfBusiness {
    pub const ALL: [LineOfBusiness; 4] = [
        LineOfBusiness::Health,
        LineOfBusiness::Motor,
        LineOfBusiness::Life,
        LineOfBusiness::Property,
    ];

    /// Parse the register code (e.g. "MOTOR")
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim() {
            "HEALTH" => Some(LineOfBusiness::Health),
            "MOTOR" => Some(LineOfBusiness::Motor),
            "LIFE" => Some(LineOfBusiness::Life),
            "PROPERTY" => Some(LineOfBusiness::Property),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LineOfBusiness::Health => "HEALTH",
            LineOfBusiness::Motor => "MOTOR",
            LineOfBusiness::Life => "LIFE",
            LineOfBusiness::Property => "PROPERTY",
        }
    }
}

impl fmt::Display for LineOfBusiness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Policy lifecycle status
///
/// DRAFT -> ACTIVE on approval; ACTIVE -> SUSPENDED or EXPIRED afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyStatus {
    #[default]
    Draft,
    Active,
    Suspended,
    Expired,
}

impl PolicyStatus {
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim() {
            "DRAFT" => Some(PolicyStatus::Draft),
            "ACTIVE" => Some(PolicyStatus::Active),
            "SUSPENDED" => Some(PolicyStatus::Suspended),
            "EXPIRED" => Some(PolicyStatus::Expired),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyStatus::Draft => "DRAFT",
            PolicyStatus::Active => "ACTIVE",
            PolicyStatus::Suspended => "SUSPENDED",
            PolicyStatus::Expired => "EXPIRED",
        }
    }
}

impl fmt::Display for PolicyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of party insured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InsuredType {
    #[default]
    Individual,
    Corporate,
}

impl InsuredType {
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim() {
            "INDIVIDUAL" => Some(InsuredType::Individual),
            "CORPORATE" => Some(InsuredType::Corporate),
            _ => None,
        }
    }
}

/// A single insurance policy from the register
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    /// Storage identifier
    pub policy_id: String,

    /// Business key, unique across the register
    pub policy_number: String,

    pub insured_name: String,

    #[serde(default)]
    pub insured_type: InsuredType,

    pub line_of_business: LineOfBusiness,

    /// Total exposure written on the policy
    pub sum_insured: f64,

    pub premium: f64,

    /// Ceiling the insurer is willing to keep on its own account
    pub retention_limit: f64,

    #[serde(default)]
    pub status: PolicyStatus,

    pub effective_from: NaiveDate,
    pub effective_to: NaiveDate,

    pub created_by: String,

    /// Set once, when the policy leaves DRAFT
    #[serde(default)]
    pub approved_by: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl Policy {
    /// Create a DRAFT policy with the amounts the allocation engine reads
    pub fn draft(
        policy_number: &str,
        line_of_business: LineOfBusiness,
        sum_insured: f64,
        retention_limit: f64,
    ) -> Self {
        let today = Utc::now();
        Self {
            policy_id: policy_number.to_string(),
            policy_number: policy_number.to_string(),
            insured_name: String::new(),
            insured_type: InsuredType::Individual,
            line_of_business,
            sum_insured,
            premium: 0.0,
            retention_limit,
            status: PolicyStatus::Draft,
            effective_from: today.date_naive(),
            effective_to: today.date_naive(),
            created_by: String::new(),
            approved_by: None,
            created_at: today,
        }
    }

    /// Check the amounts the allocation depends on
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.sum_insured.is_finite() || self.sum_insured <= 0.0 {
            return Err(ValidationError::NonPositiveSumInsured(self.sum_insured));
        }
        if !self.retention_limit.is_finite() || self.retention_limit < 0.0 {
            return Err(ValidationError::NegativeRetentionLimit(self.retention_limit));
        }
        if self.effective_to < self.effective_from {
            return Err(ValidationError::InvertedEffectiveWindow);
        }
        Ok(())
    }

    pub fn is_draft(&self) -> bool {
        matches!(self.status, PolicyStatus::Draft)
    }

    /// Exposure above the policy's own retention limit
    pub fn excess_over_retention(&self) -> f64 {
        (self.sum_insured - self.retention_limit).max(0.0)
    }

    /// Typed state capture for the audit trail
    pub fn snapshot(&self) -> PolicySnapshot {
        PolicySnapshot {
            policy_number: self.policy_number.clone(),
            status: self.status,
            approved_by: self.approved_by.clone(),
            line_of_business: self.line_of_business,
            sum_insured: self.sum_insured,
            premium: self.premium,
            retention_limit: self.retention_limit,
        }
    }
}

/// The audited subset of a policy's state at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicySnapshot {
    pub policy_number: String,
    pub status: PolicyStatus,
    pub approved_by: Option<String>,
    pub line_of_business: LineOfBusiness,
    pub sum_insured: f64,
    pub premium: f64,
    pub retention_limit: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_codes_round_trip() {
        for lob in LineOfBusiness::ALL {
            assert_eq!(LineOfBusiness::parse(lob.as_str()), Some(lob));
        }
        assert_eq!(LineOfBusiness::parse("MARINE"), None);
        assert_eq!(PolicyStatus::parse(" SUSPENDED "), Some(PolicyStatus::Suspended));
        assert_eq!(
            serde_json::to_string(&LineOfBusiness::Property).unwrap(),
            "\"PROPERTY\""
        );
    }

    #[test]
    fn test_validate_amounts() {
        let mut policy = Policy::draft("P-1", LineOfBusiness::Motor, 1_000.0, 0.0);
        assert!(policy.validate().is_ok());

        policy.sum_insured = 0.0;
        assert_eq!(
            policy.validate(),
            Err(ValidationError::NonPositiveSumInsured(0.0))
        );

        policy.sum_insured = 1_000.0;
        policy.retention_limit = -5.0;
        assert_eq!(
            policy.validate(),
            Err(ValidationError::NegativeRetentionLimit(-5.0))
        );
    }

    #[test]
    fn test_excess_over_retention() {
        let policy = Policy::draft("P-2", LineOfBusiness::Health, 3_000_000.0, 5_000_000.0);
        assert_eq!(policy.excess_over_retention(), 0.0);

        let policy = Policy::draft("P-3", LineOfBusiness::Health, 10_000_000.0, 5_000_000.0);
        assert_eq!(policy.excess_over_retention(), 5_000_000.0);
    }

    #[test]
    fn test_snapshot_tracks_status() {
        let mut policy = Policy::draft("P-4", LineOfBusiness::Life, 100.0, 50.0);
        let before = policy.snapshot();
        policy.status = PolicyStatus::Active;
        policy.approved_by = Some("u-1".into());
        let after = policy.snapshot();

        assert_eq!(before.status, PolicyStatus::Draft);
        assert_eq!(after.status, PolicyStatus::Active);
        assert_eq!(after.approved_by.as_deref(), Some("u-1"));
    }
}
