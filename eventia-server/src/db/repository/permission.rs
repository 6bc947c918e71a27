//! Permission Repository

use super::RepoResult;
use shared::models::Permission;
use sqlx::SqliteConnection;

const COLUMNS: &str = r#"id, "key", name, description, is_active"#;

pub async fn find_all(conn: &mut SqliteConnection) -> RepoResult<Vec<Permission>> {
    let sql = format!("SELECT {COLUMNS} FROM permission ORDER BY \"key\"");
    let permissions = sqlx::query_as::<_, Permission>(&sql)
        .fetch_all(&mut *conn)
        .await?;
    Ok(permissions)
}

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<Permission>> {
    let sql = format!("SELECT {COLUMNS} FROM permission WHERE id = ?");
    let permission = sqlx::query_as::<_, Permission>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(permission)
}

/// Lookup by canonical (upper-case) key
pub async fn find_by_key(
    conn: &mut SqliteConnection,
    key: &str,
) -> RepoResult<Option<Permission>> {
    let sql = format!("SELECT {COLUMNS} FROM permission WHERE \"key\" = ?");
    let permission = sqlx::query_as::<_, Permission>(&sql)
        .bind(key)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(permission)
}

pub async fn create(
    conn: &mut SqliteConnection,
    key: &str,
    name: &str,
    description: Option<&str>,
) -> RepoResult<Permission> {
    let sql = format!(
        "INSERT INTO permission (\"key\", name, description, is_active) VALUES (?, ?, ?, 1) \
         RETURNING {COLUMNS}"
    );
    let permission = sqlx::query_as::<_, Permission>(&sql)
        .bind(key)
        .bind(name)
        .bind(description)
        .fetch_one(&mut *conn)
        .await?;
    Ok(permission)
}

pub async fn update(
    conn: &mut SqliteConnection,
    id: i64,
    name: &str,
    description: Option<&str>,
    is_active: bool,
) -> RepoResult<Option<Permission>> {
    let sql = format!(
        "UPDATE permission SET name = ?, description = ?, is_active = ? WHERE id = ? \
         RETURNING {COLUMNS}"
    );
    let permission = sqlx::query_as::<_, Permission>(&sql)
        .bind(name)
        .bind(description)
        .bind(is_active)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(permission)
}

/// Delete a permission. Storage cascades its role links.
pub async fn delete(conn: &mut SqliteConnection, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM permission WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support;

    #[tokio::test]
    async fn seeded_keys_are_present() {
        let pool = test_support::pool().await;
        let mut conn = pool.acquire().await.unwrap();

        let keys: Vec<String> = find_all(&mut conn)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.key)
            .collect();
        for key in [
            "MANAGE_AUDIT",
            "MANAGE_EVENTS",
            "MANAGE_PERMISSIONS",
            "MANAGE_ROLES",
            "MANAGE_TICKETS",
            "MANAGE_USERS",
        ] {
            assert!(keys.iter().any(|k| k == key), "missing {key}");
        }
    }

    #[tokio::test]
    async fn update_and_delete() {
        let pool = test_support::pool().await;
        let mut conn = pool.acquire().await.unwrap();

        let p = create(&mut conn, "EXPORT_REPORTS", "Export", None).await.unwrap();
        let updated = update(&mut conn, p.id, "Export reports", Some("CSV"), false)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.key, "EXPORT_REPORTS");
        assert!(!updated.is_active);

        assert!(delete(&mut conn, p.id).await.unwrap());
        assert!(!delete(&mut conn, p.id).await.unwrap());
        assert!(find_by_key(&mut conn, "EXPORT_REPORTS").await.unwrap().is_none());
    }
}
