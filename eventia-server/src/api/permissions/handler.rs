//! Permission API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use serde_json::json;

use crate::api::conflict_as;
use crate::audit::diff::{changed_fields, snapshot};
use crate::audit::{AuditAction, AuditContext, AuditRecorder, NewAuditEntry, RequestContext, entity};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::begin_write;
use crate::db::repository::{permission, role_permission};
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_KEY_LEN, MAX_NAME_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{Permission, PermissionCreate, PermissionUpdate, normalize_permission_key};

/// A role that held a permission at the time it was deleted
#[derive(Debug, Clone, Serialize)]
pub struct AffectedRole {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct PermissionDeleteResponse {
    pub message: String,
    pub relationships_deleted: u64,
    pub affected_roles: Vec<AffectedRole>,
}

fn trimmed(description: &Option<String>) -> Option<&str> {
    description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
}

/// GET /api/security/permissions
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Permission>>> {
    let mut conn = state.pool.acquire().await?;
    Ok(Json(permission::find_all(&mut conn).await?))
}

/// GET /api/security/permissions/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Permission>> {
    let mut conn = state.pool.acquire().await?;
    let found = permission::find_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| AppError::missing(ErrorCode::PermissionNotFound, id))?;
    Ok(Json(found))
}

/// POST /api/security/permissions
///
/// The key is stored trimmed and upper-cased.
pub async fn create(
    State(state): State<ServerState>,
    caller: CurrentUser,
    request: RequestContext,
    Json(payload): Json<PermissionCreate>,
) -> AppResult<Json<Permission>> {
    let key = normalize_permission_key(&payload.key);
    let name = payload.name.trim();
    validate_required_text(&key, "key", MAX_KEY_LEN)?;
    validate_required_text(name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_DESCRIPTION_LEN)?;

    let mut tx = begin_write(&state.pool).await?;
    if permission::find_by_key(&mut tx, &key).await?.is_some() {
        return Err(AppError::new(ErrorCode::PermissionKeyExists).with_detail("key", key));
    }
    let created = permission::create(&mut tx, &key, name, trimmed(&payload.description))
        .await
        .map_err(conflict_as(ErrorCode::PermissionKeyExists))?;

    let entry = NewAuditEntry::new(
        AuditAction::PermissionCreated,
        entity::PERMISSION,
        created.id,
        format!("Permission {} created", created.key),
    )
    .new_values(snapshot(&created, entity::PERMISSION));
    AuditRecorder::record(&mut tx, &AuditContext::for_user(&caller, request), entry).await?;
    tx.commit().await?;

    tracing::info!(permission_id = created.id, key = %created.key, by = caller.id, "Permission created");
    Ok(Json(created))
}

/// PUT /api/security/permissions/{id}
pub async fn update(
    State(state): State<ServerState>,
    caller: CurrentUser,
    request: RequestContext,
    Path(id): Path<i64>,
    Json(payload): Json<PermissionUpdate>,
) -> AppResult<Json<Permission>> {
    let name = payload.name.trim();
    validate_required_text(name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_DESCRIPTION_LEN)?;

    let mut tx = begin_write(&state.pool).await?;
    let before = permission::find_by_id(&mut tx, id)
        .await?
        .ok_or_else(|| AppError::missing(ErrorCode::PermissionNotFound, id))?;
    let after = permission::update(
        &mut tx,
        id,
        name,
        trimmed(&payload.description),
        payload.is_active,
    )
    .await?
    .ok_or_else(|| AppError::missing(ErrorCode::PermissionNotFound, id))?;

    if let Some((old, new)) = changed_fields(&before, &after, entity::PERMISSION) {
        let entry = NewAuditEntry::new(
            AuditAction::PermissionUpdated,
            entity::PERMISSION,
            id,
            format!("Permission {} updated", after.key),
        )
        .old(old)
        .new_values(new);
        AuditRecorder::record(&mut tx, &AuditContext::for_user(&caller, request), entry).await?;
    }
    tx.commit().await?;
    Ok(Json(after))
}

/// DELETE /api/security/permissions/{id}
///
/// Role links are captured before the delete so the response and the audit
/// snapshot can name the roles that lost the permission.
pub async fn delete(
    State(state): State<ServerState>,
    caller: CurrentUser,
    request: RequestContext,
    Path(id): Path<i64>,
) -> AppResult<Json<PermissionDeleteResponse>> {
    let mut tx = begin_write(&state.pool).await?;
    let existing = permission::find_by_id(&mut tx, id)
        .await?
        .ok_or_else(|| AppError::missing(ErrorCode::PermissionNotFound, id))?;

    let affected_roles: Vec<AffectedRole> = role_permission::roles_using_permission(&mut tx, id)
        .await?
        .into_iter()
        .map(|r| AffectedRole {
            id: r.id,
            name: r.name,
        })
        .collect();
    let relationships_deleted = role_permission::delete_all_for_permission(&mut tx, id).await?;
    permission::delete(&mut tx, id).await?;

    let mut old = snapshot(&existing, entity::PERMISSION);
    old["assigned_to_roles"] = json!(affected_roles);
    let entry = NewAuditEntry::new(
        AuditAction::PermissionDeleted,
        entity::PERMISSION,
        id,
        format!(
            "Permission {} deleted ({} role link(s) removed)",
            existing.key, relationships_deleted
        ),
    )
    .old(old)
    .new_values(json!({ "deleted": true }));
    AuditRecorder::record(&mut tx, &AuditContext::for_user(&caller, request), entry).await?;
    tx.commit().await?;

    tracing::info!(
        permission_id = id,
        key = %existing.key,
        relationships_deleted,
        by = caller.id,
        "Permission deleted"
    );
    Ok(Json(PermissionDeleteResponse {
        message: format!("Permission {} deleted", existing.key),
        relationships_deleted,
        affected_roles,
    }))
}
