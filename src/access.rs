//! Roles, permissions and the acting user

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ApprovalError;

/// Back-office user role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Underwriter,
    ClaimsAdjuster,
    ReinsuranceAnalyst,
    Admin,
}

impl Role {
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim() {
            "UNDERWRITER" => Some(Role::Underwriter),
            "CLAIMS_ADJUSTER" => Some(Role::ClaimsAdjuster),
            "REINSURANCE_ANALYST" => Some(Role::ReinsuranceAnalyst),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Underwriter => "UNDERWRITER",
            Role::ClaimsAdjuster => "CLAIMS_ADJUSTER",
            Role::ReinsuranceAnalyst => "REINSURANCE_ANALYST",
            Role::Admin => "ADMIN",
        }
    }

    /// Permissions granted to this role
    pub fn permissions(&self) -> &'static [Permission] {
        use Permission::*;
        match self {
            Role::Underwriter => &[
                CreatePolicy,
                ViewPolicy,
                UpdatePolicy,
                DeletePolicy,
                ApprovePolicy,
                ViewTreaty,
                ViewAllocation,
            ],
            Role::ClaimsAdjuster => &[ViewPolicy, ViewTreaty, ViewAllocation],
            Role::ReinsuranceAnalyst => &[ManageTreaty, ViewTreaty, ViewAllocation],
            Role::Admin => &[ManageTreaty, ViewTreaty, ViewAllocation, ViewAuditLog],
        }
    }

    pub fn allows(&self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    CreatePolicy,
    ViewPolicy,
    UpdatePolicy,
    DeletePolicy,
    ApprovePolicy,
    ManageTreaty,
    ViewTreaty,
    ViewAllocation,
    ViewAuditLog,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Permission::CreatePolicy => "create_policy",
            Permission::ViewPolicy => "view_policy",
            Permission::UpdatePolicy => "update_policy",
            Permission::DeletePolicy => "delete_policy",
            Permission::ApprovePolicy => "approve_policy",
            Permission::ManageTreaty => "manage_treaty",
            Permission::ViewTreaty => "view_treaty",
            Permission::ViewAllocation => "view_allocation",
            Permission::ViewAuditLog => "view_audit_log",
        };
        f.write_str(name)
    }
}

/// Authenticated user performing an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: String,
    pub role: Role,
    #[serde(default)]
    pub ip_address: Option<String>,
}

impl Actor {
    pub fn new(user_id: &str, role: Role) -> Self {
        Self {
            user_id: user_id.to_string(),
            role,
            ip_address: None,
        }
    }

    pub fn with_ip(mut self, ip_address: &str) -> Self {
        self.ip_address = Some(ip_address.to_string());
        self
    }

    pub fn require(&self, permission: Permission) -> Result<(), ApprovalError> {
        if self.role.allows(permission) {
            Ok(())
        } else {
            Err(ApprovalError::Forbidden {
                user_id: self.user_id.clone(),
                role: self.role,
                permission,
            })
        }
    }
}
