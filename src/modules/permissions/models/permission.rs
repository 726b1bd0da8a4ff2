use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};

/// Resource type marking system-level permissions; everything else is a module permission
pub const SYSTEM_RESOURCE_TYPE: &str = "SYSTEM";

/// Enabled/disabled flag stored as TINYINT (1/0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(try_from = "i8", into = "i8")]
#[repr(i8)]
pub enum PermissionStatus {
    Disabled = 0,
    Enabled = 1,
}

impl Default for PermissionStatus {
    fn default() -> Self {
        PermissionStatus::Enabled
    }
}

impl From<PermissionStatus> for i8 {
    fn from(status: PermissionStatus) -> Self {
        status as i8
    }
}

impl TryFrom<i8> for PermissionStatus {
    type Error = String;

    fn try_from(value: i8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(PermissionStatus::Disabled),
            1 => Ok(PermissionStatus::Enabled),
            other => Err(format!("Invalid permission status: {}", other)),
        }
    }
}

/// RBAC entry identifying a protected resource or action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Permission {
    /// Database ID; `None` until first saved
    pub id: Option<i64>,
    /// Unique business key, e.g. "user:view"
    pub permission_code: String,
    pub permission_name: String,
    /// Category label ("SYSTEM" or a module name)
    pub resource_type: Option<String>,
    pub resource_url: Option<String>,
    pub permission_desc: Option<String>,
    pub status: PermissionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Permission {
    /// Build an unsaved permission from a draft, stamping both timestamps with `now`
    pub fn from_draft(draft: PermissionDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: None,
            permission_code: draft.permission_code,
            permission_name: draft.permission_name,
            resource_type: draft.resource_type,
            resource_url: draft.resource_url,
            permission_desc: draft.permission_desc,
            status: draft.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite every mutable field from the draft and refresh `updated_at`.
    /// A draft without status keeps the stored one.
    pub fn apply(&mut self, draft: PermissionDraft, now: DateTime<Utc>) {
        self.permission_code = draft.permission_code;
        self.permission_name = draft.permission_name;
        self.resource_type = draft.resource_type;
        self.resource_url = draft.resource_url;
        self.permission_desc = draft.permission_desc;
        if let Some(status) = draft.status {
            self.status = status;
        }
        self.updated_at = now;
    }

    pub fn is_enabled(&self) -> bool {
        self.status == PermissionStatus::Enabled
    }

    pub fn is_system(&self) -> bool {
        self.resource_type.as_deref() == Some(SYSTEM_RESOURCE_TYPE)
    }
}

/// Caller-supplied fields for create and update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PermissionDraft {
    pub permission_code: String,
    pub permission_name: String,
    #[serde(default)]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub resource_url: Option<String>,
    #[serde(default)]
    pub permission_desc: Option<String>,
    #[serde(default)]
    pub status: Option<PermissionStatus>,
}

impl PermissionDraft {
    pub fn new(permission_code: impl Into<String>, permission_name: impl Into<String>) -> Self {
        Self {
            permission_code: permission_code.into(),
            permission_name: permission_name.into(),
            ..Default::default()
        }
    }

    pub fn with_resource_type(mut self, resource_type: impl Into<String>) -> Self {
        self.resource_type = Some(resource_type.into());
        self
    }

    pub fn with_status(mut self, status: PermissionStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Code and name must be non-blank; the code is trimmed
    pub fn validate(mut self) -> Result<Self> {
        self.permission_code = self.permission_code.trim().to_string();
        if self.permission_code.is_empty() {
            return Err(AppError::validation("permission_code must not be empty"));
        }
        if self.permission_name.trim().is_empty() {
            return Err(AppError::validation("permission_name must not be empty"));
        }
        Ok(self)
    }
}

/// Aggregate counters over the permission table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionStats {
    /// All rows regardless of status
    pub total_permissions: i64,
    /// Enabled rows with resource type "SYSTEM"
    pub system_permissions: i64,
    /// Enabled rows with any other resource type
    pub module_permissions: i64,
    /// All enabled rows
    pub active_permissions: i64,
}

impl PermissionStats {
    /// Disabled rows in `rows` are ignored; only `total_permissions` counts them
    pub fn tally(total_permissions: i64, rows: &[Permission]) -> Self {
        let enabled: Vec<&Permission> = rows.iter().filter(|p| p.is_enabled()).collect();
        let system_permissions = enabled.iter().filter(|p| p.is_system()).count() as i64;
        let active_permissions = enabled.len() as i64;
        Self {
            total_permissions,
            system_permissions,
            module_permissions: active_permissions - system_permissions,
            active_permissions,
        }
    }
}

/// One node of the permission tree: a resource type and its permissions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermissionModule {
    pub name: String,
    pub permissions: Vec<Permission>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ResourceTypeCount {
    pub resource_type: Option<String>,
    pub count: i64,
}

/// A 1-based page of results plus the total number of matches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub size: u32,
}
