//! User Repository

use super::RepoResult;
use shared::models::{User, UserView};
use shared::util::now_millis;
use sqlx::SqliteConnection;

const USER_COLUMNS: &str =
    "id, name, email, password_hash, is_active, role_id, created_at, updated_at";

const VIEW_SELECT: &str = "SELECT u.id, u.name, u.email, u.is_active, u.role_id, \
     r.name AS role_name, u.created_at, u.updated_at \
     FROM user u LEFT JOIN role r ON r.id = u.role_id";

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM user WHERE id = ?");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(user)
}

pub async fn find_by_email(conn: &mut SqliteConnection, email: &str) -> RepoResult<Option<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM user WHERE email = ?");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(email)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(user)
}

pub async fn list_views(conn: &mut SqliteConnection) -> RepoResult<Vec<UserView>> {
    let sql = format!("{VIEW_SELECT} ORDER BY u.id");
    let users = sqlx::query_as::<_, UserView>(&sql)
        .fetch_all(&mut *conn)
        .await?;
    Ok(users)
}

pub async fn find_view_by_id(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<UserView>> {
    let sql = format!("{VIEW_SELECT} WHERE u.id = ?");
    let user = sqlx::query_as::<_, UserView>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(user)
}

pub async fn find_view_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> RepoResult<Option<UserView>> {
    let sql = format!("{VIEW_SELECT} WHERE u.email = ?");
    let user = sqlx::query_as::<_, UserView>(&sql)
        .bind(email)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(user)
}

pub async fn list_views_by_role(
    conn: &mut SqliteConnection,
    role_id: i64,
) -> RepoResult<Vec<UserView>> {
    let sql = format!("{VIEW_SELECT} WHERE u.role_id = ? ORDER BY u.id");
    let users = sqlx::query_as::<_, UserView>(&sql)
        .bind(role_id)
        .fetch_all(&mut *conn)
        .await?;
    Ok(users)
}

pub async fn count_by_role(conn: &mut SqliteConnection, role_id: i64) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user WHERE role_id = ?")
        .bind(role_id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(count)
}

/// Insert an active user without a role
pub async fn create(
    conn: &mut SqliteConnection,
    name: &str,
    email: &str,
    password_hash: &str,
) -> RepoResult<User> {
    let now = now_millis();
    let sql = format!(
        "INSERT INTO user (name, email, password_hash, is_active, role_id, created_at, updated_at) \
         VALUES (?, ?, ?, 1, NULL, ?, ?) RETURNING {USER_COLUMNS}"
    );
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *conn)
        .await?;
    Ok(user)
}

pub async fn update_name(conn: &mut SqliteConnection, id: i64, name: &str) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE user SET name = ?, updated_at = ? WHERE id = ?")
        .bind(name)
        .bind(now_millis())
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn set_active(conn: &mut SqliteConnection, id: i64, active: bool) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE user SET is_active = ?, updated_at = ? WHERE id = ?")
        .bind(active)
        .bind(now_millis())
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Replace the user's single role (`None` detaches it)
pub async fn set_role(
    conn: &mut SqliteConnection,
    id: i64,
    role_id: Option<i64>,
) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE user SET role_id = ?, updated_at = ? WHERE id = ?")
        .bind(role_id)
        .bind(now_millis())
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn delete(conn: &mut SqliteConnection, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM user WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(rows.rows_affected() > 0)
}
