//! Load policies from a register export (policies.csv)

use super::{InsuredType, LineOfBusiness, Policy, PolicyStatus};
use crate::error::LoadError;
use chrono::{DateTime, NaiveDate, Utc};
use csv::Reader;
use std::path::Path;

/// Default location of the policy register export
pub const DEFAULT_POLICIES_PATH: &str = "data/policies.csv";

/// Raw CSV row matching policies.csv columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "PolicyID")]
    policy_id: String,
    #[serde(rename = "PolicyNumber")]
    policy_number: String,
    #[serde(rename = "InsuredName")]
    insured_name: String,
    #[serde(rename = "InsuredType")]
    insured_type: String,
    #[serde(rename = "LineOfBusiness")]
    line_of_business: String,
    #[serde(rename = "SumInsured")]
    sum_insured: f64,
    #[serde(rename = "Premium")]
    premium: f64,
    #[serde(rename = "RetentionLimit")]
    retention_limit: f64,
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "EffectiveFrom")]
    effective_from: String,
    #[serde(rename = "EffectiveTo")]
    effective_to: String,
    #[serde(rename = "CreatedBy")]
    created_by: String,
    #[serde(rename = "ApprovedBy")]
    approved_by: Option<String>,
    #[serde(rename = "CreatedAt")]
    created_at: String,
}

impl CsvRow {
    fn into_policy(self) -> Result<Policy, LoadError> {
        let line_of_business = LineOfBusiness::parse(&self.line_of_business).ok_or_else(|| {
            LoadError::UnknownValue {
                field: "LineOfBusiness",
                value: self.line_of_business.clone(),
            }
        })?;

        let status = PolicyStatus::parse(&self.status).ok_or_else(|| LoadError::UnknownValue {
            field: "Status",
            value: self.status.clone(),
        })?;

        // Blank insured type falls back to the register default
        let insured_type = if self.insured_type.trim().is_empty() {
            InsuredType::default()
        } else {
            InsuredType::parse(&self.insured_type).ok_or_else(|| LoadError::UnknownValue {
                field: "InsuredType",
                value: self.insured_type.clone(),
            })?
        };

        let policy = Policy {
            policy_id: self.policy_id,
            policy_number: self.policy_number,
            insured_name: self.insured_name,
            insured_type,
            line_of_business,
            sum_insured: self.sum_insured,
            premium: self.premium,
            retention_limit: self.retention_limit,
            status,
            effective_from: parse_date("EffectiveFrom", &self.effective_from)?,
            effective_to: parse_date("EffectiveTo", &self.effective_to)?,
            created_by: self.created_by,
            approved_by: self.approved_by.filter(|s| !s.trim().is_empty()),
            created_at: parse_timestamp("CreatedAt", &self.created_at)?,
        };

        policy.validate().map_err(|source| LoadError::Invalid {
            id: policy.policy_number.clone(),
            source,
        })?;

        Ok(policy)
    }
}

/// Parse an ISO calendar date (YYYY-MM-DD)
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, LoadError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| LoadError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

/// Parse an RFC 3339 timestamp; a bare date is read as midnight UTC
pub fn parse_timestamp(field: &'static str, value: &str) -> Result<DateTime<Utc>, LoadError> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    parse_date(field, value)?
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
        .ok_or_else(|| LoadError::InvalidDate {
            field,
            value: value.to_string(),
        })
}

/// Load all policies from a CSV file
pub fn load_policies<P: AsRef<Path>>(path: P) -> Result<Vec<Policy>, LoadError> {
    let reader = Reader::from_path(path)?;
    collect_policies(reader)
}

/// Load policies from any reader (e.g., string buffer, network stream)
pub fn load_policies_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<Policy>, LoadError> {
    collect_policies(Reader::from_reader(reader))
}

fn collect_policies<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<Policy>, LoadError> {
    let mut policies = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        policies.push(row.into_policy()?);
    }

    log::debug!("loaded {} policies", policies.len());
    Ok(policies)
}
