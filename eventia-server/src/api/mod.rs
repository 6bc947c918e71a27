//! HTTP API
//!
//! One module per resource, each exposing `router()`. Every protected
//! group carries exactly one permission key as a route layer.
//!
//! - [`health`]: liveness (public)
//! - [`auth`]: login (public), current user
//! - [`users`]: `MANAGE_USERS`
//! - [`roles`], [`role_permissions`]: `MANAGE_ROLES`
//! - [`permissions`]: `MANAGE_PERMISSIONS`
//! - [`events`]: `MANAGE_EVENTS`
//! - [`tickets`], [`ticket_types`]: `MANAGE_TICKETS`
//! - [`audit_log`]: `MANAGE_AUDIT`

pub mod audit_log;
pub mod auth;
pub mod events;
pub mod health;
pub mod permissions;
pub mod role_permissions;
pub mod roles;
pub mod ticket_types;
pub mod tickets;
pub mod users;

use crate::db::repository::RepoError;
use crate::utils::{AppError, ErrorCode};

/// Map a storage uniqueness violation to a domain conflict code
pub(crate) fn conflict_as(code: ErrorCode) -> impl Fn(RepoError) -> AppError {
    move |err| match err {
        RepoError::Duplicate(_) => AppError::new(code),
        other => other.into(),
    }
}
