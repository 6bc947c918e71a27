//! Ticket Type Model

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TicketType {
    pub id: i64,
    pub name: String,
}

/// Create ticket type payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketTypeCreate {
    pub name: String,
}
