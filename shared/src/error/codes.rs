//! Error codes for the Eventia admin API
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission and role errors
//! - 3xxx: Event errors
//! - 4xxx: Ticket errors
//! - 5xxx: User errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Serialized as a plain `u16` so the admin frontend can switch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Auth ====================
    /// No bearer token on a protected request
    NotAuthenticated = 1001,
    /// Unknown email or wrong password
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is malformed or its signature does not verify
    TokenInvalid = 1004,
    /// Account is disabled
    AccountDisabled = 1007,
    /// Account has no active role
    NoRoleAssigned = 1008,

    // ==================== 2xxx: Permission / Role ====================
    /// Caller lacks the permission required by the endpoint
    PermissionDenied = 2001,
    /// Permission not found
    PermissionNotFound = 2101,
    /// Permission key already exists
    PermissionKeyExists = 2102,
    /// Role not found
    RoleNotFound = 2201,
    /// Role name already exists
    RoleNameExists = 2202,

    // ==================== 3xxx: Event ====================
    /// Event not found
    EventNotFound = 3001,
    /// Start date is not before end date
    EventInvalidDateRange = 3002,
    /// Capacity lower than current attendance
    EventCapacityBelowAttendance = 3003,
    /// Event still has attendees
    EventHasAttendees = 3004,

    // ==================== 4xxx: Ticket ====================
    /// Ticket not found
    TicketNotFound = 4001,
    /// Ticket type not found
    TicketTypeNotFound = 4002,
    /// Ticket type name already exists
    TicketTypeNameExists = 4003,

    // ==================== 5xxx: User ====================
    /// User not found
    UserNotFound = 5001,
    /// Email already registered
    UserEmailExists = 5002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Default English message for this code
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::Success => "Success",
            ErrorCode::Unknown => "Unknown error",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field missing",

            ErrorCode::NotAuthenticated => "Authentication required",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Token has expired",
            ErrorCode::TokenInvalid => "Invalid token",
            ErrorCode::AccountDisabled => "Account is disabled",
            ErrorCode::NoRoleAssigned => "User has no role assigned",

            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::PermissionNotFound => "Permission not found",
            ErrorCode::PermissionKeyExists => "Permission key already exists",
            ErrorCode::RoleNotFound => "Role not found",
            ErrorCode::RoleNameExists => "Role name already exists",

            ErrorCode::EventNotFound => "Event not found",
            ErrorCode::EventInvalidDateRange => "Start date must be before end date",
            ErrorCode::EventCapacityBelowAttendance => {
                "Max attendees cannot be lower than current attendees"
            }
            ErrorCode::EventHasAttendees => "Event has registered attendees",

            ErrorCode::TicketNotFound => "Ticket not found",
            ErrorCode::TicketTypeNotFound => "Ticket type not found",
            ErrorCode::TicketTypeNameExists => "Ticket type name already exists",

            ErrorCode::UserNotFound => "User not found",
            ErrorCode::UserEmailExists => "Email already registered",

            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code as u16
    }
}

/// Returned when a `u16` does not name any [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            7 => Ok(ErrorCode::RequiredField),

            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1007 => Ok(ErrorCode::AccountDisabled),
            1008 => Ok(ErrorCode::NoRoleAssigned),

            2001 => Ok(ErrorCode::PermissionDenied),
            2101 => Ok(ErrorCode::PermissionNotFound),
            2102 => Ok(ErrorCode::PermissionKeyExists),
            2201 => Ok(ErrorCode::RoleNotFound),
            2202 => Ok(ErrorCode::RoleNameExists),

            3001 => Ok(ErrorCode::EventNotFound),
            3002 => Ok(ErrorCode::EventInvalidDateRange),
            3003 => Ok(ErrorCode::EventCapacityBelowAttendance),
            3004 => Ok(ErrorCode::EventHasAttendees),

            4001 => Ok(ErrorCode::TicketNotFound),
            4002 => Ok(ErrorCode::TicketTypeNotFound),
            4003 => Ok(ErrorCode::TicketTypeNameExists),

            5001 => Ok(ErrorCode::UserNotFound),
            5002 => Ok(ErrorCode::UserEmailExists),

            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
