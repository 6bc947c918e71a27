//! Authentication Routes

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// - `/api/auth/login`: public (skipped by `require_auth`)
/// - `/api/auth/me`: any authenticated caller, no permission key
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/auth/login", post(handler::login))
        .route("/api/auth/me", get(handler::me))
}
