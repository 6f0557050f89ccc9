//! Reinsurance treaty definitions

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;
use crate::policy::LineOfBusiness;

/// Allocation strategy a treaty follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TreatyType {
    /// Cedes a fixed share of the ceded exposure
    QuotaShare,
    /// Takes whatever ceded exposure remains, up to its limit
    Surplus,
}

impl TreatyType {
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim() {
            "QUOTA_SHARE" => Some(TreatyType::QuotaShare),
            "SURPLUS" => Some(TreatyType::Surplus),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TreatyType::QuotaShare => "QUOTA_SHARE",
            TreatyType::Surplus => "SURPLUS",
        }
    }
}

impl fmt::Display for TreatyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TreatyStatus {
    #[default]
    Active,
    Expired,
}

impl TreatyStatus {
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim() {
            "ACTIVE" => Some(TreatyStatus::Active),
            "EXPIRED" => Some(TreatyStatus::Expired),
            _ => None,
        }
    }
}

/// A standing reinsurance contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Treaty {
    pub treaty_id: String,

    pub treaty_name: String,

    pub treaty_type: TreatyType,

    pub reinsurer_id: String,

    /// Percentage (0-100) of ceded exposure taken by a quota share
    pub share_percentage: f64,

    /// Reinsurer's attachment point for surplus treaties.
    /// Carried for display; the allocation uses the policy's own retention.
    pub retention_limit: f64,

    /// Hard cap on any single cession under this treaty
    pub treaty_limit: f64,

    pub applicable_lobs: Vec<LineOfBusiness>,

    pub effective_from: NaiveDate,
    pub effective_to: NaiveDate,

    #[serde(default)]
    pub status: TreatyStatus,

    pub created_at: DateTime<Utc>,
}

impl Treaty {
    /// Create an active treaty covering the given lines, effective from today
    pub fn new(
        treaty_id: &str,
        treaty_type: TreatyType,
        reinsurer_id: &str,
        share_percentage: f64,
        treaty_limit: f64,
        applicable_lobs: &[LineOfBusiness],
    ) -> Self {
        let now = Utc::now();
        Self {
            treaty_id: treaty_id.to_string(),
            treaty_name: treaty_id.to_string(),
            treaty_type,
            reinsurer_id: reinsurer_id.to_string(),
            share_percentage,
            retention_limit: 0.0,
            treaty_limit,
            applicable_lobs: applicable_lobs.to_vec(),
            effective_from: now.date_naive(),
            effective_to: now.date_naive(),
            status: TreatyStatus::Active,
            created_at: now,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.share_percentage.is_finite() || !(0.0..=100.0).contains(&self.share_percentage) {
            return Err(ValidationError::SharePercentageOutOfRange(self.share_percentage));
        }
        if !self.treaty_limit.is_finite() || self.treaty_limit < 0.0 {
            return Err(ValidationError::NegativeTreatyLimit(self.treaty_limit));
        }
        if !self.retention_limit.is_finite() || self.retention_limit < 0.0 {
            return Err(ValidationError::NegativeRetentionLimit(self.retention_limit));
        }
        if self.effective_to < self.effective_from {
            return Err(ValidationError::InvertedEffectiveWindow);
        }
        if self.applicable_lobs.is_empty() {
            return Err(ValidationError::NoLinesOfBusiness);
        }
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        matches!(self.status, TreatyStatus::Active)
    }

    pub fn covers(&self, line: LineOfBusiness) -> bool {
        self.applicable_lobs.contains(&line)
    }

    /// Whether the effective window (inclusive) contains `date`
    pub fn in_force_on(&self, date: NaiveDate) -> bool {
        self.effective_from <= date && date <= self.effective_to
    }
}
