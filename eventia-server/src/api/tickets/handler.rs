//! Ticket API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Map, Value, json};
use sqlx::SqliteConnection;

use crate::audit::diff::snapshot;
use crate::audit::{AuditAction, AuditContext, AuditRecorder, NewAuditEntry, RequestContext, entity};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::begin_write;
use crate::db::repository::{event, ticket, ticket_type, user};
use crate::utils::validation::{MAX_DESCRIPTION_LEN, MAX_TITLE_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{Ticket, TicketCreate, TicketStatusChange, TicketUpdate};

async fn load(conn: &mut SqliteConnection, id: i64) -> AppResult<Ticket> {
    ticket::find_by_id(conn, id)
        .await?
        .ok_or_else(|| AppError::missing(ErrorCode::TicketNotFound, id))
}

async fn require_user(conn: &mut SqliteConnection, user_id: i64) -> AppResult<()> {
    user::find_by_id(conn, user_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::missing(ErrorCode::UserNotFound, user_id))
}

fn validate_description(description: &str) -> AppResult<()> {
    if description.len() > MAX_DESCRIPTION_LEN {
        return Err(AppError::validation(format!(
            "description is too long ({} chars, max {MAX_DESCRIPTION_LEN})",
            description.len()
        )));
    }
    Ok(())
}

/// GET /api/tickets
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Ticket>>> {
    let mut conn = state.pool.acquire().await?;
    Ok(Json(ticket::find_all(&mut conn).await?))
}

/// GET /api/tickets/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Ticket>> {
    let mut conn = state.pool.acquire().await?;
    Ok(Json(load(&mut conn, id).await?))
}

/// POST /api/tickets
///
/// New tickets start `open`, created by the caller. The event, ticket type
/// and assignee must exist.
pub async fn create(
    State(state): State<ServerState>,
    caller: CurrentUser,
    request: RequestContext,
    Json(mut payload): Json<TicketCreate>,
) -> AppResult<Json<Ticket>> {
    payload.title = payload.title.trim().to_string();
    validate_required_text(&payload.title, "title", MAX_TITLE_LEN)?;
    validate_description(&payload.description)?;

    let mut tx = begin_write(&state.pool).await?;
    if event::find_by_id(&mut tx, payload.event_id).await?.is_none() {
        return Err(AppError::missing(ErrorCode::EventNotFound, payload.event_id));
    }
    if ticket_type::find_by_id(&mut tx, payload.ticket_type_id)
        .await?
        .is_none()
    {
        return Err(AppError::missing(
            ErrorCode::TicketTypeNotFound,
            payload.ticket_type_id,
        ));
    }
    if let Some(assignee) = payload.assigned_user_id {
        require_user(&mut tx, assignee).await?;
    }

    let created = ticket::create(&mut tx, &payload, caller.id).await?;

    let entry = NewAuditEntry::new(
        AuditAction::TicketCreated,
        entity::TICKET,
        created.id,
        format!("Ticket {} created", created.title),
    )
    .new_values(snapshot(&created, entity::TICKET));
    AuditRecorder::record(&mut tx, &AuditContext::for_user(&caller, request), entry).await?;
    tx.commit().await?;

    tracing::info!(ticket_id = created.id, by = caller.id, "Ticket created");
    Ok(Json(created))
}

/// PATCH /api/tickets/{id}
///
/// - assignee changed → `TICKET_ASSIGNED`
/// - title or description supplied → `TICKET_UPDATED`
/// - neither → the ticket is returned untouched
pub async fn update(
    State(state): State<ServerState>,
    caller: CurrentUser,
    request: RequestContext,
    Path(id): Path<i64>,
    Json(payload): Json<TicketUpdate>,
) -> AppResult<Json<Ticket>> {
    let mut tx = begin_write(&state.pool).await?;
    let before = load(&mut tx, id).await?;
    let mut next = before.clone();

    let mut old_fields = Map::new();
    let mut new_fields = Map::new();
    if let Some(title) = payload.title.as_deref().map(str::trim) {
        validate_required_text(title, "title", MAX_TITLE_LEN)?;
        old_fields.insert("title".into(), Value::from(before.title.as_str()));
        new_fields.insert("title".into(), Value::from(title));
        next.title = title.to_string();
    }
    if let Some(description) = &payload.description {
        validate_description(description)?;
        old_fields.insert(
            "description".into(),
            Value::from(before.description.as_str()),
        );
        new_fields.insert("description".into(), Value::from(description.as_str()));
        next.description = description.clone();
    }

    let reassigned = match payload.assigned_user_id {
        Some(assignee) if before.assigned_user_id != Some(assignee) => {
            require_user(&mut tx, assignee).await?;
            next.assigned_user_id = Some(assignee);
            true
        }
        _ => false,
    };

    if !reassigned && new_fields.is_empty() {
        return Ok(Json(before));
    }

    let saved = ticket::save(&mut tx, &next)
        .await?
        .ok_or_else(|| AppError::missing(ErrorCode::TicketNotFound, id))?;

    let ctx = AuditContext::for_user(&caller, request);
    if reassigned {
        AuditRecorder::ticket_assigned(
            &mut tx,
            &ctx,
            id,
            before.assigned_user_id,
            saved.assigned_user_id,
        )
        .await?;
    }
    if !new_fields.is_empty() {
        let entry = NewAuditEntry::new(
            AuditAction::TicketUpdated,
            entity::TICKET,
            id,
            format!("Ticket {id} updated"),
        )
        .old(Value::Object(old_fields))
        .new_values(Value::Object(new_fields));
        AuditRecorder::record(&mut tx, &ctx, entry).await?;
    }
    tx.commit().await?;
    Ok(Json(saved))
}

/// PATCH /api/tickets/{id}/status
pub async fn change_status(
    State(state): State<ServerState>,
    caller: CurrentUser,
    request: RequestContext,
    Path(id): Path<i64>,
    Json(payload): Json<TicketStatusChange>,
) -> AppResult<Json<Ticket>> {
    let mut tx = begin_write(&state.pool).await?;
    let before = load(&mut tx, id).await?;

    let mut next = before.clone();
    next.status = payload.status;
    let saved = ticket::save(&mut tx, &next)
        .await?
        .ok_or_else(|| AppError::missing(ErrorCode::TicketNotFound, id))?;

    AuditRecorder::ticket_status_changed(
        &mut tx,
        &AuditContext::for_user(&caller, request),
        id,
        before.status,
        saved.status,
    )
    .await?;
    tx.commit().await?;
    Ok(Json(saved))
}

/// DELETE /api/tickets/{id}
pub async fn delete(
    State(state): State<ServerState>,
    caller: CurrentUser,
    request: RequestContext,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let mut tx = begin_write(&state.pool).await?;
    let existing = load(&mut tx, id).await?;
    ticket::delete(&mut tx, id).await?;

    let entry = NewAuditEntry::new(
        AuditAction::TicketDeleted,
        entity::TICKET,
        id,
        format!("Ticket {} deleted", existing.title),
    )
    .old(snapshot(&existing, entity::TICKET))
    .new_values(json!({ "deleted": true }));
    AuditRecorder::record(&mut tx, &AuditContext::for_user(&caller, request), entry).await?;
    tx.commit().await?;
    Ok(Json(true))
}
