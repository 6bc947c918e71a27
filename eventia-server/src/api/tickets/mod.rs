//! Ticket API Module

mod handler;

use axum::{
    Router, middleware,
    routing::{get, patch},
};

use crate::auth::permissions::MANAGE_TICKETS;
use crate::auth::require_permission;
use crate::core::ServerState;

/// Ticket router, `MANAGE_TICKETS`
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/tickets", get(handler::list).post(handler::create))
        .route(
            "/api/tickets/{id}",
            get(handler::get_by_id)
                .patch(handler::update)
                .delete(handler::delete),
        )
        .route("/api/tickets/{id}/status", patch(handler::change_status))
        .route_layer(middleware::from_fn(require_permission(MANAGE_TICKETS)))
}
