//! CurrentUser extractor
//!
//! Reads the user the auth middleware already validated; handlers never
//! re-check the token.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::CurrentUser;
use crate::security_log;
use shared::AppError;

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<CurrentUser>() {
            Some(user) => Ok(user.clone()),
            None => {
                security_log!("WARN", "auth_missing", uri = parts.uri.to_string());
                Err(AppError::unauthorized())
            }
        }
    }
}
