//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::PermissionNotFound
            | Self::RoleNotFound
            | Self::EventNotFound
            | Self::TicketNotFound
            | Self::TicketTypeNotFound
            | Self::UserNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::PermissionKeyExists
            | Self::RoleNameExists
            | Self::TicketTypeNameExists
            | Self::UserEmailExists => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::AccountDisabled
            | Self::NoRoleAssigned => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied => StatusCode::FORBIDDEN,

            // 500 Internal Server Error
            Self::Unknown
            | Self::InternalError
            | Self::DatabaseError
            | Self::ConfigError => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (validation and business rules)
            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::RequiredField
            | Self::EventInvalidDateRange
            | Self::EventCapacityBelowAttendance
            | Self::EventHasAttendees => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_status() {
        assert_eq!(ErrorCode::Success.http_status(), StatusCode::OK);
    }

    #[test]
    fn test_not_found_status() {
        for code in [
            ErrorCode::NotFound,
            ErrorCode::RoleNotFound,
            ErrorCode::PermissionNotFound,
            ErrorCode::EventNotFound,
            ErrorCode::UserNotFound,
        ] {
            assert_eq!(code.http_status(), StatusCode::NOT_FOUND);
        }
    }

    #[test]
    fn test_conflict_status() {
        assert_eq!(ErrorCode::RoleNameExists.http_status(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCode::PermissionKeyExists.http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ErrorCode::UserEmailExists.http_status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_unauthenticated_and_forbidden_are_distinct() {
        assert_eq!(
            ErrorCode::NotAuthenticated.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::TokenExpired.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::TokenInvalid.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::PermissionDenied.http_status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_business_rule_status() {
        assert_eq!(
            ErrorCode::EventHasAttendees.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::ValidationFailed.http_status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_internal_error_status() {
        assert_eq!(
            ErrorCode::DatabaseError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
