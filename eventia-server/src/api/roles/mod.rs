//! Role API Module

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::permissions::MANAGE_ROLES;
use crate::auth::require_permission;
use crate::core::ServerState;

/// Role router, `MANAGE_ROLES`
pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/security/roles",
            get(handler::list).post(handler::create),
        )
        .route(
            "/api/security/roles/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route(
            "/api/security/roles/by-name/{name}/users",
            get(handler::users_by_role_name),
        )
        .route_layer(middleware::from_fn(require_permission(MANAGE_ROLES)))
}
