//! Role Repository

use super::RepoResult;
use shared::models::Role;
use sqlx::SqliteConnection;

pub async fn find_all(conn: &mut SqliteConnection) -> RepoResult<Vec<Role>> {
    let roles = sqlx::query_as::<_, Role>("SELECT id, name, is_active FROM role ORDER BY name")
        .fetch_all(&mut *conn)
        .await?;
    Ok(roles)
}

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<Role>> {
    let role = sqlx::query_as::<_, Role>("SELECT id, name, is_active FROM role WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(role)
}

pub async fn find_by_name(conn: &mut SqliteConnection, name: &str) -> RepoResult<Option<Role>> {
    let role =
        sqlx::query_as::<_, Role>("SELECT id, name, is_active FROM role WHERE name = ? LIMIT 1")
            .bind(name)
            .fetch_optional(&mut *conn)
            .await?;
    Ok(role)
}

pub async fn create(conn: &mut SqliteConnection, name: &str) -> RepoResult<Role> {
    let role = sqlx::query_as::<_, Role>(
        "INSERT INTO role (name, is_active) VALUES (?, 1) RETURNING id, name, is_active",
    )
    .bind(name)
    .fetch_one(&mut *conn)
    .await?;
    Ok(role)
}

/// Partial update; `None` keeps the stored value
pub async fn update(
    conn: &mut SqliteConnection,
    id: i64,
    name: Option<&str>,
    is_active: Option<bool>,
) -> RepoResult<Option<Role>> {
    let role = sqlx::query_as::<_, Role>(
        "UPDATE role SET name = COALESCE(?1, name), is_active = COALESCE(?2, is_active) \
         WHERE id = ?3 RETURNING id, name, is_active",
    )
    .bind(name)
    .bind(is_active)
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(role)
}

/// Delete a role. Storage cascades its permission links and detaches its users.
pub async fn delete(conn: &mut SqliteConnection, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM role WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{RepoError, test_support};

    #[tokio::test]
    async fn seeded_admin_role_exists() {
        let pool = test_support::pool().await;
        let mut conn = pool.acquire().await.unwrap();

        let admin = find_by_name(&mut conn, "Admin").await.unwrap().unwrap();
        assert!(admin.is_active);
    }

    #[tokio::test]
    async fn update_keeps_unspecified_fields() {
        let pool = test_support::pool().await;
        let mut conn = pool.acquire().await.unwrap();

        let role = create(&mut conn, "Editor").await.unwrap();
        let updated = update(&mut conn, role.id, None, Some(false))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Editor");
        assert!(!updated.is_active);

        assert!(update(&mut conn, 9999, Some("x"), None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_name_is_rejected_by_storage() {
        let pool = test_support::pool().await;
        let mut conn = pool.acquire().await.unwrap();

        create(&mut conn, "Editor").await.unwrap();
        let err = create(&mut conn, "Editor").await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }
}
