//! Role ↔ Permission links
//!
//! Both single-pair operations are idempotent and report whether the
//! stored state actually changed.

use super::RepoResult;
use shared::models::{Permission, Role};
use sqlx::SqliteConnection;

/// Link a permission to a role. `false` when the pair already existed.
///
/// `INSERT OR IGNORE` keeps concurrent assignments of the same pair down to
/// a single row, and only the writer that inserted it sees `true`.
pub async fn assign(
    conn: &mut SqliteConnection,
    role_id: i64,
    permission_id: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "INSERT OR IGNORE INTO role_permission (role_id, permission_id) VALUES (?, ?)",
    )
    .bind(role_id)
    .bind(permission_id)
    .execute(&mut *conn)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Unlink a permission from a role. `false` when the pair was not linked.
pub async fn remove(
    conn: &mut SqliteConnection,
    role_id: i64,
    permission_id: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM role_permission WHERE role_id = ? AND permission_id = ?")
        .bind(role_id)
        .bind(permission_id)
        .execute(&mut *conn)
        .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn permissions_for_role(
    conn: &mut SqliteConnection,
    role_id: i64,
) -> RepoResult<Vec<Permission>> {
    let permissions = sqlx::query_as::<_, Permission>(
        r#"SELECT p.id, p."key", p.name, p.description, p.is_active
           FROM permission p
           JOIN role_permission rp ON rp.permission_id = p.id
           WHERE rp.role_id = ?
           ORDER BY p."key""#,
    )
    .bind(role_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(permissions)
}

/// Distinct keys of the active permissions linked to a role
pub async fn active_keys_for_role(
    conn: &mut SqliteConnection,
    role_id: i64,
) -> RepoResult<Vec<String>> {
    let keys = sqlx::query_scalar::<_, String>(
        r#"SELECT DISTINCT p."key"
           FROM permission p
           JOIN role_permission rp ON rp.permission_id = p.id
           WHERE rp.role_id = ? AND p.is_active = 1
           ORDER BY p."key""#,
    )
    .bind(role_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(keys)
}

pub async fn roles_using_permission(
    conn: &mut SqliteConnection,
    permission_id: i64,
) -> RepoResult<Vec<Role>> {
    let roles = sqlx::query_as::<_, Role>(
        "SELECT r.id, r.name, r.is_active
         FROM role r
         JOIN role_permission rp ON rp.role_id = r.id
         WHERE rp.permission_id = ?
         ORDER BY r.name",
    )
    .bind(permission_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(roles)
}

pub async fn is_assigned(
    conn: &mut SqliteConnection,
    role_id: i64,
    permission_id: i64,
) -> RepoResult<bool> {
    let found: Option<i64> = sqlx::query_scalar(
        "SELECT 1 FROM role_permission WHERE role_id = ? AND permission_id = ?",
    )
    .bind(role_id)
    .bind(permission_id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(found.is_some())
}

/// Remove every link of a permission, returning how many were removed
pub async fn delete_all_for_permission(
    conn: &mut SqliteConnection,
    permission_id: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM role_permission WHERE permission_id = ?")
        .bind(permission_id)
        .execute(&mut *conn)
        .await?;
    Ok(rows.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{permission, role, test_support};

    #[tokio::test]
    async fn assign_is_idempotent() {
        let pool = test_support::pool().await;
        let mut conn = pool.acquire().await.unwrap();

        let editor = role::create(&mut conn, "Editor").await.unwrap();
        let p = permission::find_by_key(&mut conn, "MANAGE_EVENTS")
            .await
            .unwrap()
            .unwrap();

        assert!(assign(&mut conn, editor.id, p.id).await.unwrap());
        assert!(!assign(&mut conn, editor.id, p.id).await.unwrap());
        assert_eq!(permissions_for_role(&mut conn, editor.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let pool = test_support::pool().await;
        let mut conn = pool.acquire().await.unwrap();

        let editor = role::create(&mut conn, "Editor").await.unwrap();
        let p = permission::find_by_key(&mut conn, "MANAGE_EVENTS")
            .await
            .unwrap()
            .unwrap();

        assert!(!remove(&mut conn, editor.id, p.id).await.unwrap());
        assign(&mut conn, editor.id, p.id).await.unwrap();
        assert!(remove(&mut conn, editor.id, p.id).await.unwrap());
        assert!(!is_assigned(&mut conn, editor.id, p.id).await.unwrap());
    }

    #[tokio::test]
    async fn inactive_permissions_are_not_resolved() {
        let pool = test_support::pool().await;
        let mut conn = pool.acquire().await.unwrap();

        let editor = role::create(&mut conn, "Editor").await.unwrap();
        let events = permission::find_by_key(&mut conn, "MANAGE_EVENTS")
            .await
            .unwrap()
            .unwrap();
        let tickets = permission::find_by_key(&mut conn, "MANAGE_TICKETS")
            .await
            .unwrap()
            .unwrap();
        assign(&mut conn, editor.id, events.id).await.unwrap();
        assign(&mut conn, editor.id, tickets.id).await.unwrap();
        permission::update(&mut conn, tickets.id, &tickets.name, None, false)
            .await
            .unwrap();

        let keys = active_keys_for_role(&mut conn, editor.id).await.unwrap();
        assert_eq!(keys, vec!["MANAGE_EVENTS".to_string()]);
    }

    #[tokio::test]
    async fn deleting_permission_cascades_links() {
        let pool = test_support::pool().await;
        let mut conn = pool.acquire().await.unwrap();

        let editor = role::create(&mut conn, "Editor").await.unwrap();
        let p = permission::create(&mut conn, "EXPORT_REPORTS", "Export", None)
            .await
            .unwrap();
        assign(&mut conn, editor.id, p.id).await.unwrap();

        let holders = roles_using_permission(&mut conn, p.id).await.unwrap();
        assert_eq!(holders.len(), 1);

        permission::delete(&mut conn, p.id).await.unwrap();
        assert!(permissions_for_role(&mut conn, editor.id).await.unwrap().is_empty());
    }
}
