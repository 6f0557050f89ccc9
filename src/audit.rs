//! Audit trail entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::access::Actor;
use crate::policy::{Policy, PolicySnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Policy,
    Claim,
    Treaty,
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Approve,
}

/// One append-only audit log entry with explicit before/after state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub entity_type: EntityType,
    pub entity_id: String,
    pub action: AuditAction,
    pub before: Option<PolicySnapshot>,
    pub after: Option<PolicySnapshot>,
    pub performed_by: String,
    pub performed_at: DateTime<Utc>,
    pub ip_address: Option<String>,
}

impl AuditEntry {
    /// Entry for a DRAFT -> ACTIVE approval of `before`, yielding `after`
    pub fn policy_approval(
        before: &Policy,
        after: &Policy,
        actor: &Actor,
        performed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            entity_type: EntityType::Policy,
            entity_id: before.policy_id.clone(),
            action: AuditAction::Approve,
            before: Some(before.snapshot()),
            after: Some(after.snapshot()),
            performed_by: actor.user_id.clone(),
            performed_at,
            ip_address: actor.ip_address.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Role;
    use crate::policy::{LineOfBusiness, PolicyStatus};

    #[test]
    fn test_policy_approval_entry() {
        let before = Policy::draft("POL-A", LineOfBusiness::Health, 500.0, 1_000.0);
        let mut after = before.clone();
        after.status = PolicyStatus::Active;
        after.approved_by = Some("u-1".into());

        let actor = Actor::new("u-1", Role::Underwriter).with_ip("10.0.0.8");
        let entry = AuditEntry::policy_approval(&before, &after, &actor, Utc::now());

        assert_eq!(entry.action, AuditAction::Approve);
        assert_eq!(entry.before.as_ref().unwrap().status, PolicyStatus::Draft);
        assert_eq!(entry.after.as_ref().unwrap().status, PolicyStatus::Active);
        assert_eq!(entry.ip_address.as_deref(), Some("10.0.0.8"));

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["action"], "APPROVE");
        assert_eq!(json["entity_type"], "POLICY");
    }
}
