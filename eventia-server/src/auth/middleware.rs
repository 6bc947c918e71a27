//! Authentication and authorization middleware

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;
use shared::AppError;

/// Paths under `/api/` reachable without a token
const PUBLIC_API_ROUTES: &[&str] = &["/api/auth/login"];

/// Authentication middleware
///
/// Validates `Authorization: Bearer <token>` and inserts [`CurrentUser`]
/// into the request extensions.
///
/// Skipped for `OPTIONS` (CORS preflight), non-`/api/` paths and the
/// login route.
///
/// | failure | response |
/// |---------|----------|
/// | no header | 401 `NotAuthenticated` |
/// | expired | 401 `TokenExpired` |
/// | anything else | 401 `TokenInvalid` |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    if req.method() == http::Method::OPTIONS
        || !path.starts_with("/api/")
        || PUBLIC_API_ROUTES.contains(&path)
    {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header).ok_or_else(|| {
            security_log!("WARN", "auth_malformed_header", uri = req.uri().to_string());
            AppError::invalid_token("Invalid authorization header")
        })?,
        None => {
            security_log!("WARN", "auth_missing", uri = req.uri().to_string());
            return Err(AppError::unauthorized());
        }
    };

    let user = state
        .jwt_service
        .validate_token(token)
        .and_then(CurrentUser::try_from)
        .map_err(|e| {
            security_log!(
                "WARN",
                "auth_failed",
                error = e.to_string(),
                uri = req.uri().to_string()
            );
            match e {
                JwtError::ExpiredToken => AppError::token_expired(),
                _ => AppError::invalid_token("Invalid token"),
            }
        })?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Permission gate: the route requires exactly one permission key
///
/// Membership is checked against the token's `permissions` claim only.
/// Missing key → 403 `PermissionDenied`; no authenticated user → 401.
///
/// ```ignore
/// Router::new()
///     .route("/api/events", get(handler::list))
///     .route_layer(middleware::from_fn(require_permission("MANAGE_EVENTS")));
/// ```
pub fn require_permission(
    permission: &'static str,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let user = req
                .extensions()
                .get::<CurrentUser>()
                .ok_or_else(AppError::unauthorized)?;

            if !user.has_permission(permission) {
                security_log!(
                    "WARN",
                    "permission_denied",
                    user_id = user.id,
                    required_permission = permission
                );
                return Err(AppError::forbidden(format!(
                    "Permission denied: {permission} required"
                ))
                .with_detail("required_permission", permission));
            }

            Ok(next.run(req).await)
        })
    }
}
