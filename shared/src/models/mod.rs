//! Data models
//!
//! Shared between the server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), timestamps are Unix millis.

pub mod event;
pub mod permission;
pub mod role;
pub mod role_permission;
pub mod ticket;
pub mod ticket_type;
pub mod user;

// Re-exports
pub use event::*;
pub use permission::*;
pub use role::*;
pub use role_permission::*;
pub use ticket::*;
pub use ticket_type::*;
pub use user::*;
