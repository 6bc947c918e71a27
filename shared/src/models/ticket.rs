//! Ticket Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ticket workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    #[default]
    Open,
    InProgress,
    Closed,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ticket entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Ticket {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    pub event_id: i64,
    pub assigned_user_id: Option<i64>,
    pub created_by_user_id: i64,
    pub ticket_type_id: i64,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

/// Create ticket payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketCreate {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub event_id: i64,
    pub assigned_user_id: Option<i64>,
    pub ticket_type_id: i64,
}

/// Partial ticket update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TicketUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub assigned_user_id: Option<i64>,
}

/// Status change payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketStatusChange {
    pub status: TicketStatus,
}
