//! Event Model

use serde::{Deserialize, Serialize};

/// Event entity. Dates are Unix millis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub start_date: i64,
    pub end_date: i64,
    pub location: String,
    pub max_attendees: i64,
    pub current_attendees: i64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventCreate {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_date: i64,
    pub end_date: i64,
    #[serde(default)]
    pub location: String,
    pub max_attendees: i64,
}

/// Update event payload (full replacement of the editable fields)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventUpdate {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_date: i64,
    pub end_date: i64,
    #[serde(default)]
    pub location: String,
    pub max_attendees: i64,
    pub is_active: Option<bool>,
}
