//! Role API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::json;

use crate::api::conflict_as;
use crate::audit::diff::changed_fields;
use crate::audit::{AuditAction, AuditContext, AuditRecorder, NewAuditEntry, RequestContext, entity};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::begin_write;
use crate::db::repository::{role, role_permission, user};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{Role, RoleCreate, RoleUpdate, UserView};

/// GET /api/security/roles
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Role>>> {
    let mut conn = state.pool.acquire().await?;
    Ok(Json(role::find_all(&mut conn).await?))
}

/// GET /api/security/roles/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Role>> {
    let mut conn = state.pool.acquire().await?;
    let found = role::find_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| AppError::missing(ErrorCode::RoleNotFound, id))?;
    Ok(Json(found))
}

/// POST /api/security/roles
pub async fn create(
    State(state): State<ServerState>,
    caller: CurrentUser,
    request: RequestContext,
    Json(payload): Json<RoleCreate>,
) -> AppResult<Json<Role>> {
    let name = payload.name.trim();
    validate_required_text(name, "name", MAX_NAME_LEN)?;

    let mut tx = begin_write(&state.pool).await?;
    if role::find_by_name(&mut tx, name).await?.is_some() {
        return Err(AppError::new(ErrorCode::RoleNameExists).with_detail("name", name));
    }
    let created = role::create(&mut tx, name)
        .await
        .map_err(conflict_as(ErrorCode::RoleNameExists))?;

    let entry = NewAuditEntry::new(
        AuditAction::RoleCreated,
        entity::ROLE,
        created.id,
        format!("Role {} created", created.name),
    )
    .new_values(json!(created));
    AuditRecorder::record(&mut tx, &AuditContext::for_user(&caller, request), entry).await?;
    tx.commit().await?;

    tracing::info!(role_id = created.id, by = caller.id, "Role created");
    Ok(Json(created))
}

/// PUT /api/security/roles/{id}
pub async fn update(
    State(state): State<ServerState>,
    caller: CurrentUser,
    request: RequestContext,
    Path(id): Path<i64>,
    Json(payload): Json<RoleUpdate>,
) -> AppResult<Json<Role>> {
    let name = payload.name.as_deref().map(str::trim);
    if let Some(name) = name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }

    let mut tx = begin_write(&state.pool).await?;
    let before = role::find_by_id(&mut tx, id)
        .await?
        .ok_or_else(|| AppError::missing(ErrorCode::RoleNotFound, id))?;

    if let Some(name) = name
        && let Some(other) = role::find_by_name(&mut tx, name).await?
        && other.id != id
    {
        return Err(AppError::new(ErrorCode::RoleNameExists).with_detail("name", name));
    }

    let after = role::update(&mut tx, id, name, payload.is_active)
        .await
        .map_err(conflict_as(ErrorCode::RoleNameExists))?
        .ok_or_else(|| AppError::missing(ErrorCode::RoleNotFound, id))?;

    if let Some((old, new)) = changed_fields(&before, &after, entity::ROLE) {
        let entry = NewAuditEntry::new(
            AuditAction::RoleUpdated,
            entity::ROLE,
            id,
            format!("Role {} updated", after.name),
        )
        .old(old)
        .new_values(new);
        AuditRecorder::record(&mut tx, &AuditContext::for_user(&caller, request), entry).await?;
    }
    tx.commit().await?;
    Ok(Json(after))
}

/// DELETE /api/security/roles/{id}
///
/// Storage cascades the permission links and detaches users; the audit
/// snapshot records what was detached.
pub async fn delete(
    State(state): State<ServerState>,
    caller: CurrentUser,
    request: RequestContext,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let mut tx = begin_write(&state.pool).await?;
    let existing = role::find_by_id(&mut tx, id)
        .await?
        .ok_or_else(|| AppError::missing(ErrorCode::RoleNotFound, id))?;

    let permission_keys: Vec<String> = role_permission::permissions_for_role(&mut tx, id)
        .await?
        .into_iter()
        .map(|p| p.key)
        .collect();
    let user_count = user::count_by_role(&mut tx, id).await?;

    role::delete(&mut tx, id).await?;

    let entry = NewAuditEntry::new(
        AuditAction::RoleDeleted,
        entity::ROLE,
        id,
        format!("Role {} deleted", existing.name),
    )
    .old(json!({
        "name": existing.name,
        "is_active": existing.is_active,
        "permissions": permission_keys,
        "user_count": user_count,
    }))
    .new_values(json!({ "deleted": true }));
    AuditRecorder::record(&mut tx, &AuditContext::for_user(&caller, request), entry).await?;
    tx.commit().await?;

    tracing::info!(role_id = id, by = caller.id, detached_users = user_count, "Role deleted");
    Ok(Json(true))
}

/// GET /api/security/roles/by-name/{name}/users
///
/// Recorded as `ROLE_USERS_QUERIED`.
pub async fn users_by_role_name(
    State(state): State<ServerState>,
    caller: CurrentUser,
    request: RequestContext,
    Path(name): Path<String>,
) -> AppResult<Json<Vec<UserView>>> {
    let mut tx = begin_write(&state.pool).await?;
    let found = role::find_by_name(&mut tx, name.trim())
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::RoleNotFound).with_detail("name", name.clone()))?;
    let users = user::list_views_by_role(&mut tx, found.id).await?;

    let entry = NewAuditEntry::new(
        AuditAction::RoleUsersQueried,
        entity::ROLE,
        found.id,
        format!("Users of role {} listed", found.name),
    )
    .new_values(json!({ "role_name": found.name, "user_count": users.len() }));
    AuditRecorder::record(&mut tx, &AuditContext::for_user(&caller, request), entry).await?;
    tx.commit().await?;

    Ok(Json(users))
}
