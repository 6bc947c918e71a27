//! Audit recorder
//!
//! Writes audit rows on the caller's connection. Handlers pass the open
//! transaction, so the mutation and its audit row commit or roll back
//! together; an audit insert failure is returned to the caller.

use serde_json::{Value, json};
use sqlx::SqliteConnection;

use super::context::AuditContext;
use super::storage;
use super::types::{AuditAction, NewAuditEntry, entity};
use crate::db::repository::RepoResult;
use shared::models::{TicketStatus, User};

/// Stateless entry point for audit writes
#[derive(Debug, Clone, Copy, Default)]
pub struct AuditRecorder;

impl AuditRecorder {
    /// Append one record
    pub async fn record(
        conn: &mut SqliteConnection,
        ctx: &AuditContext,
        entry: NewAuditEntry,
    ) -> RepoResult<i64> {
        let id = storage::insert(conn, ctx, &entry).await?;
        tracing::debug!(
            audit_id = id,
            action = %entry.action,
            entity_type = %entry.entity_type,
            entity_id = %entry.entity_id,
            user_id = ?ctx.user_id,
            "Audit record written"
        );
        Ok(id)
    }

    pub async fn ticket_assigned(
        conn: &mut SqliteConnection,
        ctx: &AuditContext,
        ticket_id: i64,
        old_assignee: Option<i64>,
        new_assignee: Option<i64>,
    ) -> RepoResult<i64> {
        let entry = NewAuditEntry::new(
            AuditAction::TicketAssigned,
            entity::TICKET,
            ticket_id,
            format!("Ticket {ticket_id} assigned"),
        )
        .old(json!({ "assigned_user_id": old_assignee }))
        .new_values(json!({ "assigned_user_id": new_assignee }));
        Self::record(conn, ctx, entry).await
    }

    pub async fn ticket_status_changed(
        conn: &mut SqliteConnection,
        ctx: &AuditContext,
        ticket_id: i64,
        old_status: TicketStatus,
        new_status: TicketStatus,
    ) -> RepoResult<i64> {
        let entry = NewAuditEntry::new(
            AuditAction::TicketStatusChanged,
            entity::TICKET,
            ticket_id,
            format!("Ticket {ticket_id} status changed from {old_status} to {new_status}"),
        )
        .old(json!({ "status": old_status }))
        .new_values(json!({ "status": new_status }));
        Self::record(conn, ctx, entry).await
    }

    pub async fn user_created(
        conn: &mut SqliteConnection,
        ctx: &AuditContext,
        user: &User,
    ) -> RepoResult<i64> {
        let entry = NewAuditEntry::new(
            AuditAction::UserCreated,
            entity::USER,
            user.id,
            format!("User {} created", user.email),
        )
        .new_values(super::diff::snapshot(user, entity::USER));
        Self::record(conn, ctx, entry).await
    }

    pub async fn permission_assigned(
        conn: &mut SqliteConnection,
        ctx: &AuditContext,
        role_id: i64,
        permission_id: i64,
        permission_key: &str,
    ) -> RepoResult<i64> {
        let entry = NewAuditEntry::new(
            AuditAction::PermissionAssignedToRole,
            entity::ROLE,
            role_id,
            format!("Permission {permission_key} assigned to role {role_id}"),
        )
        .new_values(link_values(role_id, permission_id, permission_key));
        Self::record(conn, ctx, entry).await
    }

    /// Counterpart of [`Self::permission_assigned`]
    pub async fn permission_removed(
        conn: &mut SqliteConnection,
        ctx: &AuditContext,
        role_id: i64,
        permission_id: i64,
        permission_key: &str,
    ) -> RepoResult<i64> {
        let entry = NewAuditEntry::new(
            AuditAction::PermissionRemovedFromRole,
            entity::ROLE,
            role_id,
            format!("Permission {permission_key} removed from role {role_id}"),
        )
        .old(link_values(role_id, permission_id, permission_key));
        Self::record(conn, ctx, entry).await
    }
}

fn link_values(role_id: i64, permission_id: i64, permission_key: &str) -> Value {
    json!({
        "role_id": role_id,
        "permission_id": permission_id,
        "permission_key": permission_key,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::context::RequestContext;
    use crate::db::repository::{test_support, user};

    #[tokio::test]
    async fn failed_transaction_discards_audit_row() {
        let pool = test_support::pool().await;
        let ctx = AuditContext::new(Some(1), RequestContext::default());

        {
            let mut tx = pool.begin().await.unwrap();
            AuditRecorder::ticket_assigned(&mut tx, &ctx, 5, None, Some(2))
                .await
                .unwrap();
            // dropped without commit
        }

        let mut conn = pool.acquire().await.unwrap();
        assert!(storage::recent(&mut conn, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn helpers_use_fixed_action_codes() {
        let pool = test_support::pool().await;
        let mut tx = pool.begin().await.unwrap();
        let ctx = AuditContext::new(Some(1), RequestContext::default());

        let created = user::create(&mut tx, "Ana", "ana@example.com", "hash")
            .await
            .unwrap();
        AuditRecorder::user_created(&mut tx, &ctx, &created).await.unwrap();
        AuditRecorder::ticket_status_changed(
            &mut tx,
            &ctx,
            3,
            TicketStatus::Open,
            TicketStatus::Closed,
        )
        .await
        .unwrap();
        AuditRecorder::permission_assigned(&mut tx, &ctx, 1, 2, "MANAGE_EVENTS")
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let mut conn = pool.acquire().await.unwrap();
        let rows = storage::recent(&mut conn, 10).await.unwrap();
        let actions: Vec<_> = rows.iter().map(|r| r.action.as_str()).collect();
        assert_eq!(
            actions,
            [
                "PERMISSION_ASSIGNED_TO_ROLE",
                "TICKET_STATUS_CHANGED",
                "USER_CREATED"
            ]
        );

        let status = &rows[1];
        assert_eq!(status.old_values.as_ref().unwrap()["status"], "open");
        assert_eq!(status.new_values.as_ref().unwrap()["status"], "closed");

        let user_row = &rows[2];
        let snapshot = user_row.new_values.as_ref().unwrap();
        assert!(snapshot.get("password_hash").is_none());
        assert_eq!(snapshot["email"], "ana@example.com");
    }
}
