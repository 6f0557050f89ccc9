//! Approval workflow configuration
//!
//! Loaded from a JSON file; every field has a default so an empty object
//! (`{}`) is a valid configuration.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::allocation::DEFAULT_COVERAGE_TOLERANCE;

/// What to do when exposure must be ceded but no treaty is eligible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoTreatyAction {
    /// Refuse the approval; the policy stays DRAFT
    #[default]
    Reject,
    /// Approve and record the whole sum insured as retained
    RetainFull,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowConfig {
    #[serde(default)]
    pub no_treaty_action: NoTreatyAction,

    /// Attempts at the atomic commit when storage reports transient errors
    #[serde(default = "default_max_commit_attempts")]
    pub max_commit_attempts: u32,

    /// Delay before the first retry, doubled on each further attempt
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Currency units retained + ceded may fall short of the sum insured
    /// before the approval is reported as partially covered
    #[serde(default = "default_coverage_tolerance")]
    pub coverage_tolerance: f64,

    /// Drop treaties whose effective window excludes the approval date
    #[serde(default)]
    pub respect_effective_dates: bool,
}

fn default_max_commit_attempts() -> u32 { 3 }
fn default_retry_backoff_ms() -> u64 { 50 }
fn default_coverage_tolerance() -> f64 { DEFAULT_COVERAGE_TOLERANCE }

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            no_treaty_action: NoTreatyAction::default(),
            max_commit_attempts: default_max_commit_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
            coverage_tolerance: default_coverage_tolerance(),
            respect_effective_dates: false,
        }
    }
}

impl WorkflowConfig {
    /// Load configuration from a JSON file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, serde_json::Error> {
        let file = File::open(path).map_err(serde_json::Error::io)?;
        serde_json::from_reader(BufReader::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config: WorkflowConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, WorkflowConfig::default());
        assert_eq!(config.max_commit_attempts, 3);
        assert_eq!(config.no_treaty_action, NoTreatyAction::Reject);
    }

    #[test]
    fn test_partial_override() {
        let config: WorkflowConfig =
            serde_json::from_str(r#"{"no_treaty_action": "retain_full", "max_commit_attempts": 5}"#).unwrap();
        assert_eq!(config.no_treaty_action, NoTreatyAction::RetainFull);
        assert_eq!(config.max_commit_attempts, 5);
        assert_eq!(config.retry_backoff_ms, 50);
    }

    #[test]
    fn test_sample_config_file() {
        let config = WorkflowConfig::from_path("data/workflow.json").unwrap();
        assert_eq!(config, WorkflowConfig::default());
    }

    #[test]
    fn test_missing_file() {
        assert!(WorkflowConfig::from_path("does/not/exist.json").is_err());
    }
}
