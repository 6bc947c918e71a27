//! Utilities
//!
//! - [`logger`]: tracing subscriber setup
//! - [`validation`]: request field checks shared by the handlers

pub mod logger;
pub mod validation;

pub use shared::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
