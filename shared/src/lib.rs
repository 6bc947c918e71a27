//! Shared types for the Eventia admin server
//!
//! Error codes, the unified error/response envelope and the domain models
//! exchanged over the HTTP API.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use serde::{Deserialize, Serialize};
