//! Per-request audit context
//!
//! Handlers receive the client address and user agent explicitly and pass
//! them down to [`AuditRecorder`](super::AuditRecorder); nothing is kept in
//! globals or task locals.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::{HeaderMap, request::Parts};

use crate::auth::CurrentUser;

/// Client metadata captured from the HTTP request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl RequestContext {
    /// Extract from headers, falling back to the socket address.
    ///
    /// Order: first hop of `X-Forwarded-For`, then `X-Real-IP`, then the
    /// peer address (only present when served with connect info).
    pub fn from_parts(headers: &HeaderMap, remote: Option<SocketAddr>) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        let ip_address = header("x-forwarded-for")
            .and_then(|v| v.split(',').next())
            .map(|ip| ip.trim().to_string())
            .or_else(|| header("x-real-ip").map(str::to_string))
            .or_else(|| remote.map(|addr| addr.ip().to_string()));

        let user_agent = header(http::header::USER_AGENT.as_str()).map(str::to_string);

        Self {
            ip_address,
            user_agent,
        }
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let remote = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        Ok(Self::from_parts(&parts.headers, remote))
    }
}

/// Who performed an audited action, and from where
#[derive(Debug, Clone, Default)]
pub struct AuditContext {
    pub user_id: Option<i64>,
    pub request: RequestContext,
}

impl AuditContext {
    pub fn new(user_id: Option<i64>, request: RequestContext) -> Self {
        Self { user_id, request }
    }

    /// Context for an authenticated caller
    pub fn for_user(user: &CurrentUser, request: RequestContext) -> Self {
        Self::new(Some(user.id), request)
    }

    /// Context for work not triggered by a request (startup bootstrap)
    pub fn system() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn remote() -> Option<SocketAddr> {
        Some("10.0.0.9:51234".parse().unwrap())
    }

    #[test]
    fn forwarded_for_takes_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7, 10.0.0.1"));
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.2"));
        headers.insert("user-agent", HeaderValue::from_static("curl/8.5"));

        let ctx = RequestContext::from_parts(&headers, remote());
        assert_eq!(ctx.ip_address.as_deref(), Some("203.0.113.7"));
        assert_eq!(ctx.user_agent.as_deref(), Some("curl/8.5"));
    }

    #[test]
    fn real_ip_then_socket_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.2"));
        let ctx = RequestContext::from_parts(&headers, remote());
        assert_eq!(ctx.ip_address.as_deref(), Some("198.51.100.2"));

        let ctx = RequestContext::from_parts(&HeaderMap::new(), remote());
        assert_eq!(ctx.ip_address.as_deref(), Some("10.0.0.9"));
        assert_eq!(ctx.user_agent, None);
    }

    #[test]
    fn nothing_known() {
        let ctx = RequestContext::from_parts(&HeaderMap::new(), None);
        assert_eq!(ctx, RequestContext::default());
    }
}
