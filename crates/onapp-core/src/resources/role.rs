//! Roles and the permissions they grant
//!
//! Role deletion is immediate on the server, so it only returns transport
//! metadata.

use serde::{Deserialize, Serialize};

use super::common::null_as_default;
use crate::resource::{CrudKind, DeleteOptions, ResourceKind, Untracked};

/// A single permission descriptor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Permission {
    pub id: i64,
    pub identifier: Option<String>,
    pub label: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// `{"permission": {...}}` wrapper used inside a role
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PermissionEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub permission: Permission,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Role {
    pub id: i64,
    pub label: Option<String>,
    pub identifier: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub users_count: Option<i64>,
    pub system: Option<bool>,
    #[serde(deserialize_with = "null_as_default")]
    pub permissions: Vec<PermissionEntry>,
}

impl Role {
    /// Permissions in server order
    pub fn permissions(&self) -> impl Iterator<Item = &Permission> {
        self.permissions.iter().map(|entry| &entry.permission)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleCreateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub permission_ids: Vec<i64>,
}

impl RoleCreateRequest {
    #[must_use]
    pub fn new(label: impl Into<String>, permission_ids: Vec<i64>) -> Self {
        Self {
            label: Some(label.into()),
            permission_ids,
        }
    }
}

impl ResourceKind for Role {
    const ENVELOPE: &'static str = "role";
    const BASE_PATH: &'static str = "roles";
}

impl CrudKind for Role {
    type CreateRequest = RoleCreateRequest;
    type DeleteFilter = DeleteOptions;
    type Deletion = Untracked;

    const PARENT_TYPE: &'static str = "Role";
}
