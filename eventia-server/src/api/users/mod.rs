//! User API Module

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use crate::auth::permissions::MANAGE_USERS;
use crate::auth::require_permission;
use crate::core::ServerState;

/// User router, `MANAGE_USERS`
///
/// `{user}` is the numeric id on the plain resource routes and the email on
/// the account-state routes.
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/users", get(handler::list).post(handler::create))
        .route(
            "/api/users/{user}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/api/users/email/{email}", get(handler::get_by_email))
        .route("/api/users/{user}/disable", post(handler::disable))
        .route("/api/users/{user}/enable", post(handler::enable))
        .route(
            "/api/users/{user}/assign-role/{role_id}",
            post(handler::assign_role),
        )
        .route("/api/users/{user}/role", delete(handler::remove_role))
        .route_layer(middleware::from_fn(require_permission(MANAGE_USERS)))
}
