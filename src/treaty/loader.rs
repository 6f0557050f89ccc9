//! Load treaties from treaties.csv
//!
//! Applicable lines of business are a `|`-separated list in one column,
//! e.g. `HEALTH|MOTOR`.

use super::{Treaty, TreatyStatus, TreatyType};
use crate::error::LoadError;
use crate::policy::{parse_date, parse_timestamp, LineOfBusiness};
use csv::Reader;
use std::path::Path;

/// Default location of the treaty catalog export
pub const DEFAULT_TREATIES_PATH: &str = "data/treaties.csv";

#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "TreatyID")]
    treaty_id: String,
    #[serde(rename = "TreatyName")]
    treaty_name: String,
    #[serde(rename = "TreatyType")]
    treaty_type: String,
    #[serde(rename = "ReinsurerID")]
    reinsurer_id: String,
    #[serde(rename = "SharePercentage")]
    share_percentage: f64,
    #[serde(rename = "RetentionLimit")]
    retention_limit: f64,
    #[serde(rename = "TreatyLimit")]
    treaty_limit: f64,
    #[serde(rename = "ApplicableLOBs")]
    applicable_lobs: String,
    #[serde(rename = "EffectiveFrom")]
    effective_from: String,
    #[serde(rename = "EffectiveTo")]
    effective_to: String,
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "CreatedAt")]
    created_at: String,
}

impl CsvRow {
    fn into_treaty(self) -> Result<Treaty, LoadError> {
        let treaty_type = TreatyType::parse(&self.treaty_type).ok_or_else(|| LoadError::UnknownValue {
            field: "TreatyType",
            value: self.treaty_type.clone(),
        })?;

        let status = TreatyStatus::parse(&self.status).ok_or_else(|| LoadError::UnknownValue {
            field: "Status",
            value: self.status.clone(),
        })?;

        let applicable_lobs = parse_lines(&self.applicable_lobs)?;

        let treaty = Treaty {
            treaty_id: self.treaty_id,
            treaty_name: self.treaty_name,
            treaty_type,
            reinsurer_id: self.reinsurer_id,
            share_percentage: self.share_percentage,
            retention_limit: self.retention_limit,
            treaty_limit: self.treaty_limit,
            applicable_lobs,
            effective_from: parse_date("EffectiveFrom", &self.effective_from)?,
            effective_to: parse_date("EffectiveTo", &self.effective_to)?,
            status,
            created_at: parse_timestamp("CreatedAt", &self.created_at)?,
        };

        treaty.validate().map_err(|source| LoadError::Invalid {
            id: treaty.treaty_id.clone(),
            source,
        })?;

        Ok(treaty)
    }
}

fn parse_lines(column: &str) -> Result<Vec<LineOfBusiness>, LoadError> {
    let mut lines = Vec::new();
    for code in column.split('|').map(str::trim).filter(|c| !c.is_empty()) {
        let line = LineOfBusiness::parse(code).ok_or_else(|| LoadError::UnknownValue {
            field: "ApplicableLOBs",
            value: code.to_string(),
        })?;
        if !lines.contains(&line) {
            lines.push(line);
        }
    }
    Ok(lines)
}

/// Load all treaties from a CSV file
pub fn load_treaties<P: AsRef<Path>>(path: P) -> Result<Vec<Treaty>, LoadError> {
    collect_treaties(Reader::from_path(path)?)
}

/// Load treaties from any reader
pub fn load_treaties_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<Treaty>, LoadError> {
    collect_treaties(Reader::from_reader(reader))
}

fn collect_treaties<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<Treaty>, LoadError> {
    let mut treaties = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        treaties.push(row.into_treaty()?);
    }

    log::debug!("loaded {} treaties", treaties.len());
    Ok(treaties)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "TreatyID,TreatyName,TreatyType,ReinsurerID,SharePercentage,RetentionLimit,TreatyLimit,ApplicableLOBs,EffectiveFrom,EffectiveTo,Status,CreatedAt\n";

    #[test]
    fn test_load_treaties_from_reader() {
        let csv = format!(
            "{HEADER}\
             t1,Motor QS 2026,QUOTA_SHARE,r-swiss,30,0,5000000,MOTOR|HEALTH,2026-01-01,2026-12-31,ACTIVE,2025-12-01T00:00:00Z\n\
             t2,Property Surplus,SURPLUS,r-munich,0,2000000,20000000,PROPERTY,2026-01-01,2026-12-31,EXPIRED,2025-11-01\n"
        );

        let treaties = load_treaties_from_reader(csv.as_bytes()).expect("Failed to load treaties");
        assert_eq!(treaties.len(), 2);

        let t1 = &treaties[0];
        assert_eq!(t1.treaty_type, TreatyType::QuotaShare);
        assert_eq!(t1.applicable_lobs, vec![LineOfBusiness::Motor, LineOfBusiness::Health]);
        assert!(t1.is_active());

        let t2 = &treaties[1];
        assert_eq!(t2.treaty_type, TreatyType::Surplus);
        assert_eq!(t2.status, TreatyStatus::Expired);
        assert_eq!(t2.retention_limit, 2_000_000.0);
    }

    #[test]
    fn test_load_default_catalog() {
        let treaties = load_treaties(DEFAULT_TREATIES_PATH).expect("Failed to load treaties");
        assert_eq!(treaties.len(), 5);
        assert_eq!(treaties.iter().filter(|t| t.is_active()).count(), 4);
    }

    #[test]
    fn test_duplicate_lines_collapse() {
        assert_eq!(
            parse_lines("LIFE| LIFE |HEALTH").unwrap(),
            vec![LineOfBusiness::Life, LineOfBusiness::Health]
        );
    }

    #[test]
    fn test_empty_lines_rejected() {
        let csv = format!(
            "{HEADER}t1,Empty,SURPLUS,r1,0,0,100,,2026-01-01,2026-12-31,ACTIVE,2026-01-01\n"
        );
        let err = load_treaties_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Invalid { ref id, .. } if id == "t1"));
    }

    #[test]
    fn test_unknown_treaty_type_rejected() {
        let csv = format!(
            "{HEADER}t1,XoL,EXCESS_OF_LOSS,r1,0,0,100,LIFE,2026-01-01,2026-12-31,ACTIVE,2026-01-01\n"
        );
        assert!(matches!(
            load_treaties_from_reader(csv.as_bytes()),
            Err(LoadError::UnknownValue { field: "TreatyType", .. })
        ));
    }
}
