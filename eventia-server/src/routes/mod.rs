//! Router assembly
//!
//! [`build_router`] merges every API module; [`build_app`] wraps it with
//! the HTTP middleware stack. Both the listener and in-process tests go
//! through [`build_app`].

use axum::Router;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue, Method, header};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::api;
use crate::auth::require_auth;
use crate::core::ServerState;

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// All routes, no middleware, no state
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(api::health::router())
        .merge(api::auth::router())
        .merge(api::users::router())
        .merge(api::roles::router())
        .merge(api::role_permissions::router())
        .merge(api::permissions::router())
        .merge(api::events::router())
        .merge(api::tickets::router())
        .merge(api::ticket_types::router())
        .merge(api::audit_log::router())
}

fn cors_layer(origin: &str) -> Option<CorsLayer> {
    let origin = match HeaderValue::from_str(origin) {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(origin, "Invalid CORS_ALLOWED_ORIGIN, CORS disabled");
            return None;
        }
    };
    Some(
        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
    )
}

/// Fully configured application, state still to be applied
pub fn build_app(state: &ServerState) -> Router<ServerState> {
    let router = build_router()
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        // outside propagation so the generated id reaches the response
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
        // authentication runs before every route and injects CurrentUser
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    match cors_layer(&state.config.cors_allowed_origin) {
        // outermost so preflight never reaches authentication
        Some(cors) => router.layer(cors),
        None => router,
    }
}
