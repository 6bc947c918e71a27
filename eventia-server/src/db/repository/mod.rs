//! Repository Module
//!
//! Free functions over a `&mut SqliteConnection`, so one handler can run
//! several of them (and the audit insert) inside a single transaction.

pub mod event;
pub mod permission;
pub mod role;
pub mod role_permission;
pub mod ticket;
pub mod ticket_type;
pub mod user;

use shared::{AppError, ErrorCode};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound("row not found".into()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepoError::Duplicate(db.message().to_string())
            }
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => RepoError::Validation(
                "record is referenced by or references a missing record".into(),
            ),
            _ => RepoError::Database(err.to_string()),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::conflict(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => {
                tracing::error!(error = %msg, "Repository database error");
                AppError::database("Database operation failed")
            }
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::db::DbService;
    use sqlx::SqlitePool;

    /// Fresh migrated in-memory pool
    pub async fn pool() -> SqlitePool {
        DbService::in_memory()
            .await
            .expect("in-memory database")
            .pool
    }

    /// Migrated WAL database file with a multi-connection pool
    ///
    /// The directory guard must outlive the pool.
    pub async fn file_pool() -> (tempfile::TempDir, SqlitePool) {
        let dir = tempfile::tempdir().expect("temp dir");
        let url = format!("sqlite://{}", dir.path().join("eventia.db").display());
        let db = DbService::new(&url).await.expect("file database");
        (dir, db.pool)
    }
}
