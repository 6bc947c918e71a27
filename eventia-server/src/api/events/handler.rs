//! Event API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::json;

use crate::audit::diff::{changed_fields, snapshot};
use crate::audit::{AuditAction, AuditContext, AuditRecorder, NewAuditEntry, RequestContext, entity};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::begin_write;
use crate::db::repository::event;
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_LOCATION_LEN, MAX_TITLE_LEN, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{Event, EventCreate, EventUpdate};

fn validate_fields(
    title: &str,
    description: &str,
    location: &str,
    start_date: i64,
    end_date: i64,
    max_attendees: i64,
) -> AppResult<()> {
    validate_required_text(title, "title", MAX_TITLE_LEN)?;
    if description.len() > MAX_DESCRIPTION_LEN {
        return Err(AppError::validation("description is too long"));
    }
    if location.len() > MAX_LOCATION_LEN {
        return Err(AppError::validation("location is too long"));
    }
    if start_date >= end_date {
        return Err(AppError::new(ErrorCode::EventInvalidDateRange)
            .with_detail("start_date", start_date)
            .with_detail("end_date", end_date));
    }
    if max_attendees < 0 {
        return Err(AppError::validation("max_attendees must not be negative"));
    }
    Ok(())
}

/// GET /api/events
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Event>>> {
    let mut conn = state.pool.acquire().await?;
    Ok(Json(event::find_all(&mut conn).await?))
}

/// GET /api/events/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Event>> {
    let mut conn = state.pool.acquire().await?;
    let found = event::find_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| AppError::missing(ErrorCode::EventNotFound, id))?;
    Ok(Json(found))
}

/// POST /api/events
pub async fn create(
    State(state): State<ServerState>,
    caller: CurrentUser,
    request: RequestContext,
    Json(mut payload): Json<EventCreate>,
) -> AppResult<Json<Event>> {
    payload.title = payload.title.trim().to_string();
    validate_fields(
        &payload.title,
        &payload.description,
        &payload.location,
        payload.start_date,
        payload.end_date,
        payload.max_attendees,
    )?;

    let mut tx = begin_write(&state.pool).await?;
    let created = event::create(&mut tx, &payload).await?;

    let entry = NewAuditEntry::new(
        AuditAction::EventCreated,
        entity::EVENT,
        created.id,
        format!("Event {} created", created.title),
    )
    .new_values(snapshot(&created, entity::EVENT));
    AuditRecorder::record(&mut tx, &AuditContext::for_user(&caller, request), entry).await?;
    tx.commit().await?;

    tracing::info!(event_id = created.id, by = caller.id, "Event created");
    Ok(Json(created))
}

/// PUT /api/events/{id}
///
/// Capacity may not drop below the current attendance.
pub async fn update(
    State(state): State<ServerState>,
    caller: CurrentUser,
    request: RequestContext,
    Path(id): Path<i64>,
    Json(mut payload): Json<EventUpdate>,
) -> AppResult<Json<Event>> {
    payload.title = payload.title.trim().to_string();
    validate_fields(
        &payload.title,
        &payload.description,
        &payload.location,
        payload.start_date,
        payload.end_date,
        payload.max_attendees,
    )?;

    let mut tx = begin_write(&state.pool).await?;
    let before = event::find_by_id(&mut tx, id)
        .await?
        .ok_or_else(|| AppError::missing(ErrorCode::EventNotFound, id))?;
    if payload.max_attendees < before.current_attendees {
        return Err(AppError::new(ErrorCode::EventCapacityBelowAttendance)
            .with_detail("max_attendees", payload.max_attendees)
            .with_detail("current_attendees", before.current_attendees));
    }

    let after = event::update(&mut tx, id, &payload)
        .await?
        .ok_or_else(|| AppError::missing(ErrorCode::EventNotFound, id))?;

    if let Some((old, new)) = changed_fields(&before, &after, entity::EVENT) {
        let entry = NewAuditEntry::new(
            AuditAction::EventUpdated,
            entity::EVENT,
            id,
            format!("Event {} updated", after.title),
        )
        .old(old)
        .new_values(new);
        AuditRecorder::record(&mut tx, &AuditContext::for_user(&caller, request), entry).await?;
    }
    tx.commit().await?;
    Ok(Json(after))
}

/// DELETE /api/events/{id}
///
/// Refused while the event has attendees. Tickets still referencing the
/// event make the delete fail with a validation error.
pub async fn delete(
    State(state): State<ServerState>,
    caller: CurrentUser,
    request: RequestContext,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let mut tx = begin_write(&state.pool).await?;
    let existing = event::find_by_id(&mut tx, id)
        .await?
        .ok_or_else(|| AppError::missing(ErrorCode::EventNotFound, id))?;
    if existing.current_attendees > 0 {
        return Err(AppError::new(ErrorCode::EventHasAttendees)
            .with_detail("current_attendees", existing.current_attendees));
    }

    event::delete(&mut tx, id).await?;

    let entry = NewAuditEntry::new(
        AuditAction::EventDeleted,
        entity::EVENT,
        id,
        format!("Event {} deleted", existing.title),
    )
    .old(snapshot(&existing, entity::EVENT))
    .new_values(json!({ "deleted": true }));
    AuditRecorder::record(&mut tx, &AuditContext::for_user(&caller, request), entry).await?;
    tx.commit().await?;

    tracing::info!(event_id = id, by = caller.id, "Event deleted");
    Ok(Json(true))
}
