//! Authentication Handlers

use std::time::Duration;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::audit::{AuditAction, AuditContext, AuditRecorder, NewAuditEntry, RequestContext, entity};
use crate::auth::password::verify_password;
use crate::auth::{CurrentUser, resolve};
use crate::core::ServerState;
use crate::db::begin_write;
use crate::db::repository::user;
use crate::security_log;
use crate::utils::validation::normalize_email;
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub is_active: bool,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: LoginUser,
}

/// POST /api/auth/login
///
/// | outcome | error |
/// |---------|-------|
/// | unknown email or wrong password | 401 `InvalidCredentials` |
/// | user disabled | 401 `AccountDisabled` |
/// | no active role | 401 `NoRoleAssigned` |
///
/// The configured delay runs before the account is looked up.
pub async fn login(
    State(state): State<ServerState>,
    request: RequestContext,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    tokio::time::sleep(Duration::from_millis(state.config.login_delay_ms)).await;

    let email = normalize_email(&req.email);
    let mut tx = begin_write(&state.pool).await?;
    let found = user::find_by_email(&mut tx, &email).await?;

    let Some(found) = found else {
        security_log!("WARN", "login_failed", email = email.as_str(), reason = "unknown_email");
        return Err(AppError::invalid_credentials());
    };

    if !verify_password(&req.password, &found.password_hash)? {
        security_log!("WARN", "login_failed", user_id = found.id, reason = "bad_password");
        return Err(AppError::invalid_credentials());
    }

    if !found.is_active {
        security_log!("WARN", "login_failed", user_id = found.id, reason = "account_disabled");
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }

    let access = resolve(&mut tx, found.id).await?;
    if !access.has_role() {
        security_log!("WARN", "login_failed", user_id = found.id, reason = "no_role");
        return Err(AppError::new(ErrorCode::NoRoleAssigned));
    }

    let roles = access.role_list();
    let permissions = access.permission_list();
    let token = state
        .jwt_service
        .generate_token(found.id, &found.name, &roles, &permissions)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    let ctx = AuditContext::new(Some(found.id), request);
    let entry = NewAuditEntry::new(
        AuditAction::LoginSucceeded,
        entity::USER,
        found.id,
        format!("User {} logged in", found.email),
    )
    .new_values(json!({ "roles": roles, "permission_count": permissions.len() }));
    AuditRecorder::record(&mut tx, &ctx, entry).await?;
    tx.commit().await?;

    tracing::info!(user_id = found.id, roles = ?roles, "User logged in");

    Ok(Json(LoginResponse {
        token,
        user: LoginUser {
            id: found.id,
            name: found.name,
            email: found.email,
            is_active: found.is_active,
            roles,
            permissions,
        },
    }))
}

/// GET /api/auth/me
///
/// Answered from the token claims alone.
pub async fn me(user: CurrentUser) -> Json<CurrentUser> {
    Json(user)
}
