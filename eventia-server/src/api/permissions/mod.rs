//! Permission API Module

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::permissions::MANAGE_PERMISSIONS;
use crate::auth::require_permission;
use crate::core::ServerState;

/// Permission router, `MANAGE_PERMISSIONS`
pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/security/permissions",
            get(handler::list).post(handler::create),
        )
        .route(
            "/api/security/permissions/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route_layer(middleware::from_fn(require_permission(MANAGE_PERMISSIONS)))
}
