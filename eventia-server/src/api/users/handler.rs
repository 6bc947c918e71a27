//! User API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::json;

use crate::api::conflict_as;
use crate::audit::diff::{changed_fields, snapshot};
use crate::audit::{AuditAction, AuditContext, AuditRecorder, NewAuditEntry, RequestContext, entity};
use crate::auth::CurrentUser;
use crate::auth::password::hash_password;
use crate::core::ServerState;
use crate::db::begin_write;
use crate::db::repository::{role, user};
use crate::utils::validation::{
    MAX_NAME_LEN, normalize_email, validate_email, validate_password, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{User, UserCreate, UserUpdate, UserView};
use sqlx::SqliteConnection;

async fn load(conn: &mut SqliteConnection, id: i64) -> AppResult<User> {
    user::find_by_id(conn, id)
        .await?
        .ok_or_else(|| AppError::missing(ErrorCode::UserNotFound, id))
}

async fn load_by_email(conn: &mut SqliteConnection, email: &str) -> AppResult<User> {
    let email = normalize_email(email);
    user::find_by_email(conn, &email)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound).with_detail("email", email))
}

async fn view(conn: &mut SqliteConnection, id: i64) -> AppResult<UserView> {
    user::find_view_by_id(conn, id)
        .await?
        .ok_or_else(|| AppError::missing(ErrorCode::UserNotFound, id))
}

/// GET /api/users
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<UserView>>> {
    let mut conn = state.pool.acquire().await?;
    let users = user::list_views(&mut conn).await?;
    Ok(Json(users))
}

/// GET /api/users/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<UserView>> {
    let mut conn = state.pool.acquire().await?;
    Ok(Json(view(&mut conn, id).await?))
}

/// GET /api/users/email/{email}
pub async fn get_by_email(
    State(state): State<ServerState>,
    Path(email): Path<String>,
) -> AppResult<Json<UserView>> {
    let email = normalize_email(&email);
    let mut conn = state.pool.acquire().await?;
    let found = user::find_view_by_email(&mut conn, &email)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound).with_detail("email", email))?;
    Ok(Json(found))
}

/// POST /api/users
pub async fn create(
    State(state): State<ServerState>,
    caller: CurrentUser,
    request: RequestContext,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<UserView>> {
    let name = payload.name.trim();
    let email = normalize_email(&payload.email);
    validate_required_text(name, "name", MAX_NAME_LEN)?;
    validate_email(&email)?;
    validate_password(&payload.password)?;

    let mut tx = begin_write(&state.pool).await?;
    if user::find_by_email(&mut tx, &email).await?.is_some() {
        return Err(AppError::new(ErrorCode::UserEmailExists).with_detail("email", email));
    }

    let hash = hash_password(&payload.password)?;
    let created = user::create(&mut tx, name, &email, &hash)
        .await
        .map_err(conflict_as(ErrorCode::UserEmailExists))?;

    let ctx = AuditContext::for_user(&caller, request);
    AuditRecorder::user_created(&mut tx, &ctx, &created).await?;
    let result = view(&mut tx, created.id).await?;
    tx.commit().await?;

    tracing::info!(user_id = created.id, by = caller.id, "User created");
    Ok(Json(result))
}

/// PUT /api/users/{id}
pub async fn update(
    State(state): State<ServerState>,
    caller: CurrentUser,
    request: RequestContext,
    Path(id): Path<i64>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<UserView>> {
    let mut tx = begin_write(&state.pool).await?;
    let before = load(&mut tx, id).await?;

    if let Some(name) = payload.name.as_deref().map(str::trim) {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
        user::update_name(&mut tx, id, name).await?;
    }

    let after = load(&mut tx, id).await?;
    if let Some((old, new)) = changed_fields(&before, &after, entity::USER) {
        let entry = NewAuditEntry::new(
            AuditAction::UserUpdated,
            entity::USER,
            id,
            format!("User {} updated", after.email),
        )
        .old(old)
        .new_values(new);
        AuditRecorder::record(&mut tx, &AuditContext::for_user(&caller, request), entry).await?;
    }

    let result = view(&mut tx, id).await?;
    tx.commit().await?;
    Ok(Json(result))
}

/// DELETE /api/users/{id}
pub async fn delete(
    State(state): State<ServerState>,
    caller: CurrentUser,
    request: RequestContext,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let mut tx = begin_write(&state.pool).await?;
    let existing = load(&mut tx, id).await?;
    user::delete(&mut tx, id).await?;

    let entry = NewAuditEntry::new(
        AuditAction::UserDeleted,
        entity::USER,
        id,
        format!("User {} deleted", existing.email),
    )
    .old(snapshot(&existing, entity::USER))
    .new_values(json!({ "deleted": true }));
    AuditRecorder::record(&mut tx, &AuditContext::for_user(&caller, request), entry).await?;
    tx.commit().await?;

    tracing::info!(user_id = id, by = caller.id, "User deleted");
    Ok(Json(true))
}

async fn set_active(
    state: ServerState,
    caller: CurrentUser,
    request: RequestContext,
    email: String,
    active: bool,
) -> AppResult<Json<UserView>> {
    let mut tx = begin_write(&state.pool).await?;
    let existing = load_by_email(&mut tx, &email).await?;
    user::set_active(&mut tx, existing.id, active).await?;

    let (action, verb) = if active {
        (AuditAction::UserEnabled, "enabled")
    } else {
        (AuditAction::UserDisabled, "disabled")
    };
    let entry = NewAuditEntry::new(
        action,
        entity::USER,
        existing.id,
        format!("User {} {verb}", existing.email),
    )
    .old(json!({ "is_active": existing.is_active }))
    .new_values(json!({ "is_active": active }));
    AuditRecorder::record(&mut tx, &AuditContext::for_user(&caller, request), entry).await?;

    let result = view(&mut tx, existing.id).await?;
    tx.commit().await?;
    Ok(Json(result))
}

/// POST /api/users/{email}/disable
pub async fn disable(
    State(state): State<ServerState>,
    caller: CurrentUser,
    request: RequestContext,
    Path(email): Path<String>,
) -> AppResult<Json<UserView>> {
    set_active(state, caller, request, email, false).await
}

/// POST /api/users/{email}/enable
pub async fn enable(
    State(state): State<ServerState>,
    caller: CurrentUser,
    request: RequestContext,
    Path(email): Path<String>,
) -> AppResult<Json<UserView>> {
    set_active(state, caller, request, email, true).await
}

/// POST /api/users/{email}/assign-role/{role_id}
///
/// Replaces the user's single role.
pub async fn assign_role(
    State(state): State<ServerState>,
    caller: CurrentUser,
    request: RequestContext,
    Path((email, role_id)): Path<(String, i64)>,
) -> AppResult<Json<UserView>> {
    let mut tx = begin_write(&state.pool).await?;
    let existing = load_by_email(&mut tx, &email).await?;
    let new_role = role::find_by_id(&mut tx, role_id)
        .await?
        .ok_or_else(|| AppError::missing(ErrorCode::RoleNotFound, role_id))?;

    user::set_role(&mut tx, existing.id, Some(new_role.id)).await?;

    let entry = NewAuditEntry::new(
        AuditAction::UserRoleAssigned,
        entity::USER,
        existing.id,
        format!("Role {} assigned to user {}", new_role.name, existing.email),
    )
    .old(json!({ "role_id": existing.role_id }))
    .new_values(json!({ "role_id": new_role.id, "role_name": new_role.name }));
    AuditRecorder::record(&mut tx, &AuditContext::for_user(&caller, request), entry).await?;

    let result = view(&mut tx, existing.id).await?;
    tx.commit().await?;
    Ok(Json(result))
}

/// DELETE /api/users/{email}/role
pub async fn remove_role(
    State(state): State<ServerState>,
    caller: CurrentUser,
    request: RequestContext,
    Path(email): Path<String>,
) -> AppResult<Json<UserView>> {
    let mut tx = begin_write(&state.pool).await?;
    let existing = load_by_email(&mut tx, &email).await?;
    let Some(old_role_id) = existing.role_id else {
        return Err(AppError::validation(format!(
            "User {} has no role assigned",
            existing.email
        )));
    };

    user::set_role(&mut tx, existing.id, None).await?;

    let entry = NewAuditEntry::new(
        AuditAction::UserRoleRemoved,
        entity::USER,
        existing.id,
        format!("Role removed from user {}", existing.email),
    )
    .old(json!({ "role_id": old_role_id }))
    .new_values(json!({ "role_id": null }));
    AuditRecorder::record(&mut tx, &AuditContext::for_user(&caller, request), entry).await?;

    let result = view(&mut tx, existing.id).await?;
    tx.commit().await?;
    Ok(Json(result))
}
