use serde::{Deserialize, Serialize};

/// Grantable role on a shared collection. The owner is never stored in the
/// permission table; ownership is derived from `Collection.owner_id`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PermissionRole {
    Viewer,
    Editor,
}

impl PermissionRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionRole::Viewer => "viewer",
            PermissionRole::Editor => "editor",
        }
    }

    pub fn from_str(s: &str) -> PermissionRole {
        match s {
            "editor" => PermissionRole::Editor,
            _ => PermissionRole::Viewer,
        }
    }
}

/// Effective role derived for a principal during an access check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AccessRole {
    Owner,
    Editor,
    Viewer,
}

/// A stored permission grant for a specific collection and user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionPermission {
    pub collection_id: String,
    pub user_id: String,
    pub role: PermissionRole,
    pub created_at: i64,
}

/// Result of a single access check. Never cached; revocation is visible on
/// the next check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessDecision {
    pub has_access: bool,
    pub role: Option<AccessRole>,
    pub can_view: bool,
    pub can_edit: bool,
}

impl AccessDecision {
    /// The decision for a principal with no rights on the collection.
    pub fn denied() -> Self {
        Self {
            has_access: false,
            role: None,
            can_view: false,
            can_edit: false,
        }
    }
}
