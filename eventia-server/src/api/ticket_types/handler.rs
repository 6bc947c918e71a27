//! Ticket Type API Handlers

use axum::{Json, extract::State};

use crate::api::conflict_as;
use crate::audit::diff::snapshot;
use crate::audit::{AuditAction, AuditContext, AuditRecorder, NewAuditEntry, RequestContext, entity};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::begin_write;
use crate::db::repository::ticket_type;
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{TicketType, TicketTypeCreate};

/// GET /api/ticket-types
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<TicketType>>> {
    let mut conn = state.pool.acquire().await?;
    Ok(Json(ticket_type::find_all(&mut conn).await?))
}

/// POST /api/ticket-types
pub async fn create(
    State(state): State<ServerState>,
    caller: CurrentUser,
    request: RequestContext,
    Json(payload): Json<TicketTypeCreate>,
) -> AppResult<Json<TicketType>> {
    let name = payload.name.trim();
    validate_required_text(name, "name", MAX_NAME_LEN)?;

    let mut tx = begin_write(&state.pool).await?;
    if ticket_type::find_by_name(&mut tx, name).await?.is_some() {
        return Err(AppError::new(ErrorCode::TicketTypeNameExists).with_detail("name", name));
    }
    let created = ticket_type::create(&mut tx, name)
        .await
        .map_err(conflict_as(ErrorCode::TicketTypeNameExists))?;

    let entry = NewAuditEntry::new(
        AuditAction::TicketTypeCreated,
        entity::TICKET_TYPE,
        created.id,
        format!("Ticket type {} created", created.name),
    )
    .new_values(snapshot(&created, entity::TICKET_TYPE));
    AuditRecorder::record(&mut tx, &AuditContext::for_user(&caller, request), entry).await?;
    tx.commit().await?;

    Ok(Json(created))
}
