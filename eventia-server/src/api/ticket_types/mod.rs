//! Ticket Type API Module

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::permissions::MANAGE_TICKETS;
use crate::auth::require_permission;
use crate::core::ServerState;

/// Ticket type router, `MANAGE_TICKETS`
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/ticket-types", get(handler::list).post(handler::create))
        .route_layer(middleware::from_fn(require_permission(MANAGE_TICKETS)))
}
