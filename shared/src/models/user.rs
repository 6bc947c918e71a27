//! User Model

use serde::{Deserialize, Serialize};

/// User row. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub is_active: bool,
    /// A user holds at most one role
    pub role_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// User joined with its role name
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct UserView {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub is_active: bool,
    pub role_id: Option<i64>,
    pub role_name: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create user payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Update user payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    pub name: Option<String>,
}
