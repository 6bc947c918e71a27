//! Role ↔ Permission API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::audit::{AuditContext, RequestContext};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::begin_write;
use crate::db::repository::{role, role_permission};
use crate::services::role_permission::{bulk_assign, bulk_remove};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{BulkAssignmentReport, RolePermissions};

/// GET /api/security/roles/{id}/permissions
pub async fn list(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<RolePermissions>> {
    let mut conn = state.pool.acquire().await?;
    let found = role::find_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| AppError::missing(ErrorCode::RoleNotFound, id))?;
    let permissions = role_permission::permissions_for_role(&mut conn, id).await?;

    Ok(Json(RolePermissions {
        role: found,
        total: permissions.len(),
        permissions,
    }))
}

/// POST /api/security/roles/{id}/permissions
pub async fn assign(
    State(state): State<ServerState>,
    caller: CurrentUser,
    request: RequestContext,
    Path(id): Path<i64>,
    Json(permission_ids): Json<Vec<i64>>,
) -> AppResult<Json<BulkAssignmentReport>> {
    let ctx = AuditContext::for_user(&caller, request);
    let mut tx = begin_write(&state.pool).await?;
    let report = bulk_assign(&mut tx, &ctx, id, &permission_ids).await?;
    tx.commit().await?;
    Ok(Json(report))
}

/// DELETE /api/security/roles/{id}/permissions
pub async fn remove(
    State(state): State<ServerState>,
    caller: CurrentUser,
    request: RequestContext,
    Path(id): Path<i64>,
    Json(permission_ids): Json<Vec<i64>>,
) -> AppResult<Json<BulkAssignmentReport>> {
    let ctx = AuditContext::for_user(&caller, request);
    let mut tx = begin_write(&state.pool).await?;
    let report = bulk_remove(&mut tx, &ctx, id, &permission_ids).await?;
    tx.commit().await?;
    Ok(Json(report))
}
