//! Unified error system
//!
//! - [`ErrorCode`]: standardized numeric codes
//! - [`ErrorCategory`]: classification by code range
//! - [`AppError`]: error with code, message and optional details
//! - [`ApiResponse`]: JSON envelope returned to clients
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission and role errors
//! - 3xxx: Event errors
//! - 4xxx: Ticket errors
//! - 5xxx: User errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::validation("end_date must be after start_date")
//!     .with_detail("field", "end_date");
//! assert_eq!(err.code, ErrorCode::ValidationFailed);
//!
//! let response = ApiResponse::<()>::error(&err);
//! assert_eq!(response.code, Some(2));
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
