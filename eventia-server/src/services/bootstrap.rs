//! First-run admin account
//!
//! The initial migration seeds the built-in permissions and the `Admin`
//! role. When `ADMIN_EMAIL` / `ADMIN_PASSWORD` are configured and no user
//! with that email exists yet, startup creates it and gives it that role.

use sqlx::SqlitePool;

use crate::audit::{AuditContext, AuditRecorder};
use crate::auth::password::hash_password;
use crate::db::begin_write;
use crate::db::repository::{role, user};
use crate::utils::validation::{MIN_PASSWORD_LEN, validate_email};
use shared::AppError;

pub const ADMIN_ROLE: &str = "Admin";

/// Create the configured admin user if missing. Returns `true` when created.
pub async fn ensure_admin(pool: &SqlitePool, email: &str, password: &str) -> Result<bool, AppError> {
    let email = email.trim().to_lowercase();
    validate_email(&email)?;
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "ADMIN_PASSWORD must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let mut tx = begin_write(pool).await?;
    if user::find_by_email(&mut tx, &email).await?.is_some() {
        tracing::debug!(email = %email, "Admin user already present");
        return Ok(false);
    }

    let admin_role = role::find_by_name(&mut tx, ADMIN_ROLE)
        .await?
        .ok_or_else(|| AppError::internal("Seeded Admin role is missing"))?;

    let hash = hash_password(password)?;
    let created = user::create(&mut tx, "Administrator", &email, &hash).await?;
    user::set_role(&mut tx, created.id, Some(admin_role.id)).await?;
    AuditRecorder::user_created(&mut tx, &AuditContext::system(), &created).await?;
    tx.commit().await?;

    tracing::info!(user_id = created.id, email = %email, "Admin user created");
    Ok(true)
}
