//! Audit log storage
//!
//! Append-only: this module only inserts and reads. The schema also refuses
//! `UPDATE` and `DELETE` on `audit_log` through triggers.

use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use super::context::AuditContext;
use super::types::{AuditEntry, AuditQuery, NewAuditEntry};
use crate::db::repository::RepoResult;

/// Upper bound for any single listing
pub const MAX_PAGE_SIZE: i64 = 500;

const COLUMNS: &str = "id, action, entity_type, entity_id, description, old_values, new_values, \
                       user_id, created_at, ip_address, user_agent";

pub async fn insert(
    conn: &mut SqliteConnection,
    ctx: &AuditContext,
    entry: &NewAuditEntry,
) -> RepoResult<i64> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO audit_log (action, entity_type, entity_id, description, old_values, \
         new_values, user_id, created_at, ip_address, user_agent) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(&entry.action)
    .bind(&entry.entity_type)
    .bind(&entry.entity_id)
    .bind(&entry.description)
    .bind(entry.old_values.as_ref().map(|v| v.to_string()))
    .bind(entry.new_values.as_ref().map(|v| v.to_string()))
    .bind(ctx.user_id)
    .bind(shared::util::now_millis())
    .bind(ctx.request.ip_address.as_deref())
    .bind(ctx.request.user_agent.as_deref())
    .fetch_one(&mut *conn)
    .await?;
    Ok(id)
}

/// Newest `count` records (clamped to `1..=MAX_PAGE_SIZE`)
pub async fn recent(conn: &mut SqliteConnection, count: i64) -> RepoResult<Vec<AuditEntry>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM audit_log ORDER BY created_at DESC, id DESC LIMIT ?"
    );
    let rows = sqlx::query_as::<_, AuditEntry>(&sql)
        .bind(count.clamp(1, MAX_PAGE_SIZE))
        .fetch_all(&mut *conn)
        .await?;
    Ok(rows)
}

pub async fn by_entity(
    conn: &mut SqliteConnection,
    entity_type: &str,
    entity_id: &str,
) -> RepoResult<Vec<AuditEntry>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM audit_log WHERE entity_type = ? AND entity_id = ? \
         ORDER BY created_at DESC, id DESC"
    );
    let rows = sqlx::query_as::<_, AuditEntry>(&sql)
        .bind(entity_type)
        .bind(entity_id)
        .fetch_all(&mut *conn)
        .await?;
    Ok(rows)
}

pub async fn by_user(conn: &mut SqliteConnection, user_id: i64) -> RepoResult<Vec<AuditEntry>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM audit_log WHERE user_id = ? ORDER BY created_at DESC, id DESC"
    );
    let rows = sqlx::query_as::<_, AuditEntry>(&sql)
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await?;
    Ok(rows)
}

fn push_filters<'a>(builder: &mut QueryBuilder<'a, Sqlite>, q: &'a AuditQuery) {
    builder.push(" WHERE 1 = 1");
    if let Some(action) = &q.action {
        builder.push(" AND action = ").push_bind(action.as_str());
    }
    if let Some(entity_type) = &q.entity_type {
        builder.push(" AND entity_type = ").push_bind(entity_type.as_str());
    }
    if let Some(user_id) = q.user_id {
        builder.push(" AND user_id = ").push_bind(user_id);
    }
    if let Some(from) = q.from {
        builder.push(" AND created_at >= ").push_bind(from);
    }
    if let Some(to) = q.to {
        builder.push(" AND created_at <= ").push_bind(to);
    }
}

/// Filtered page plus the total matching count
pub async fn query(
    conn: &mut SqliteConnection,
    q: &AuditQuery,
) -> RepoResult<(Vec<AuditEntry>, i64)> {
    let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM audit_log");
    push_filters(&mut count, q);
    let total: i64 = count.build_query_scalar().fetch_one(&mut *conn).await?;

    let mut select = QueryBuilder::<Sqlite>::new(format!("SELECT {COLUMNS} FROM audit_log"));
    push_filters(&mut select, q);
    select
        .push(" ORDER BY created_at DESC, id DESC LIMIT ")
        .push_bind(q.limit.clamp(1, MAX_PAGE_SIZE))
        .push(" OFFSET ")
        .push_bind(q.offset.max(0));
    let items = select
        .build_query_as::<AuditEntry>()
        .fetch_all(&mut *conn)
        .await?;

    Ok((items, total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::context::RequestContext;
    use crate::audit::types::{AuditAction, entity};
    use crate::db::repository::test_support;
    use serde_json::json;

    fn ctx(user_id: i64) -> AuditContext {
        AuditContext::new(
            Some(user_id),
            RequestContext {
                ip_address: Some("127.0.0.1".into()),
                user_agent: Some("test".into()),
            },
        )
    }

    #[tokio::test]
    async fn insert_and_read_back_snapshots() {
        let pool = test_support::pool().await;
        let mut conn = pool.acquire().await.unwrap();

        let entry = NewAuditEntry::new(AuditAction::RoleUpdated, entity::ROLE, 1, "Role updated")
            .old(json!({ "name": "A" }))
            .new_values(json!({ "name": "B" }));
        insert(&mut conn, &ctx(7), &entry).await.unwrap();

        let rows = by_entity(&mut conn, entity::ROLE, "1").await.unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.action, "ROLE_UPDATED");
        assert_eq!(row.user_id, Some(7));
        assert_eq!(row.ip_address.as_deref(), Some("127.0.0.1"));
        assert_eq!(row.old_values.as_ref().unwrap()["name"], "A");
        assert_eq!(row.new_values.as_ref().unwrap()["name"], "B");
    }

    #[tokio::test]
    async fn listings_are_newest_first() {
        let pool = test_support::pool().await;
        let mut conn = pool.acquire().await.unwrap();

        for i in 0..3 {
            let entry = NewAuditEntry::new(AuditAction::EventCreated, entity::EVENT, i, "created");
            insert(&mut conn, &ctx(1), &entry).await.unwrap();
        }
        let other = NewAuditEntry::new(AuditAction::EventDeleted, entity::EVENT, 0, "deleted");
        insert(&mut conn, &ctx(2), &other).await.unwrap();

        let latest = recent(&mut conn, 2).await.unwrap();
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].action, "EVENT_DELETED");
        assert!(latest[0].id > latest[1].id);

        assert_eq!(by_user(&mut conn, 1).await.unwrap().len(), 3);
        assert_eq!(by_user(&mut conn, 2).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn filtered_query_reports_total() {
        let pool = test_support::pool().await;
        let mut conn = pool.acquire().await.unwrap();

        for i in 0..5 {
            let entry = NewAuditEntry::new(AuditAction::TicketCreated, entity::TICKET, i, "t");
            insert(&mut conn, &ctx(3), &entry).await.unwrap();
        }
        let entry = NewAuditEntry::new(AuditAction::EventCreated, entity::EVENT, 1, "e");
        insert(&mut conn, &ctx(3), &entry).await.unwrap();

        let q = AuditQuery {
            entity_type: Some(entity::TICKET.into()),
            limit: 2,
            ..Default::default()
        };
        let (items, total) = query(&mut conn, &q).await.unwrap();
        assert_eq!(total, 5);
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|e| e.entity_type == entity::TICKET));
    }

    #[tokio::test]
    async fn rows_cannot_be_modified() {
        let pool = test_support::pool().await;
        let mut conn = pool.acquire().await.unwrap();

        let entry = NewAuditEntry::new(AuditAction::UserCreated, entity::USER, 1, "u");
        let id = insert(&mut conn, &ctx(1), &entry).await.unwrap();

        let update = sqlx::query("UPDATE audit_log SET description = 'x' WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await;
        assert!(update.is_err());
        let delete = sqlx::query("DELETE FROM audit_log WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await;
        assert!(delete.is_err());
    }
}
