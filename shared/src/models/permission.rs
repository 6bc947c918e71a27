//! Permission Model

use serde::{Deserialize, Serialize};

/// Permission entity
///
/// `key` is the canonical upper-case string carried in token claims
/// (e.g. `MANAGE_EVENTS`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Permission {
    pub id: i64,
    pub key: String,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
}

/// Create permission payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionCreate {
    pub key: String,
    pub name: String,
    pub description: Option<String>,
}

/// Update permission payload (the key is immutable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionUpdate {
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
}

/// Normalize a permission key to its canonical form
pub fn normalize_permission_key(key: &str) -> String {
    key.trim().to_uppercase()
}
