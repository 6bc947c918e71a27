//! Event API Module

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::permissions::MANAGE_EVENTS;
use crate::auth::require_permission;
use crate::core::ServerState;

/// Event router, `MANAGE_EVENTS`
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/events", get(handler::list).post(handler::create))
        .route(
            "/api/events/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route_layer(middleware::from_fn(require_permission(MANAGE_EVENTS)))
}
