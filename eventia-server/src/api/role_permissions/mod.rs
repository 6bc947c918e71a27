//! Role ↔ Permission API Module

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::permissions::MANAGE_ROLES;
use crate::auth::require_permission;
use crate::core::ServerState;

/// Role permission router, `MANAGE_ROLES`
///
/// `POST` and `DELETE` take a JSON array of permission ids.
pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/security/roles/{id}/permissions",
            get(handler::list)
                .post(handler::assign)
                .delete(handler::remove),
        )
        .route_layer(middleware::from_fn(require_permission(MANAGE_ROLES)))
}
