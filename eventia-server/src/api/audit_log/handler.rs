//! Audit Log API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::audit::{AuditEntry, AuditListResponse, AuditQuery, storage};
use crate::core::ServerState;
use crate::utils::AppResult;

const DEFAULT_RECENT: i64 = 50;

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub count: Option<i64>,
}

/// GET /api/audit - filtered, paginated listing
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<AuditQuery>,
) -> AppResult<Json<AuditListResponse>> {
    let mut conn = state.pool.acquire().await?;
    let (items, total) = storage::query(&mut conn, &query).await?;
    Ok(Json(AuditListResponse { items, total }))
}

/// GET /api/audit/recent?count=N
pub async fn recent(
    State(state): State<ServerState>,
    Query(query): Query<RecentQuery>,
) -> AppResult<Json<Vec<AuditEntry>>> {
    let mut conn = state.pool.acquire().await?;
    let count = query.count.unwrap_or(DEFAULT_RECENT);
    Ok(Json(storage::recent(&mut conn, count).await?))
}

/// GET /api/audit/entity/{entity_type}/{entity_id}
pub async fn by_entity(
    State(state): State<ServerState>,
    Path((entity_type, entity_id)): Path<(String, String)>,
) -> AppResult<Json<Vec<AuditEntry>>> {
    let mut conn = state.pool.acquire().await?;
    Ok(Json(
        storage::by_entity(&mut conn, &entity_type, &entity_id).await?,
    ))
}

/// GET /api/audit/user/{id}
pub async fn by_user(
    State(state): State<ServerState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<AuditEntry>>> {
    let mut conn = state.pool.acquire().await?;
    Ok(Json(storage::by_user(&mut conn, user_id).await?))
}
