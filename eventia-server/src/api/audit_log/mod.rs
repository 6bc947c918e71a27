//! Audit Log API (read-only)

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::permissions::MANAGE_AUDIT;
use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/audit", get(handler::list))
        .route("/api/audit/recent", get(handler::recent))
        .route(
            "/api/audit/entity/{entity_type}/{entity_id}",
            get(handler::by_entity),
        )
        .route("/api/audit/user/{id}", get(handler::by_user))
        .route_layer(middleware::from_fn(require_permission(MANAGE_AUDIT)))
}
