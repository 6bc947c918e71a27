//! Bulk role ↔ permission assignment
//!
//! Every id in the request gets its own status, in request order. Real
//! state changes produce one audit record each, and a summary record is
//! added when at least one change happened.

use serde_json::json;
use sqlx::SqliteConnection;

use crate::audit::{AuditAction, AuditContext, AuditRecorder, NewAuditEntry, entity};
use crate::db::repository::{permission, role, role_permission};
use shared::models::{AssignmentStatus, BulkAssignmentReport, Role};
use shared::{AppError, ErrorCode};

async fn load_role(conn: &mut SqliteConnection, role_id: i64) -> Result<Role, AppError> {
    role::find_by_id(conn, role_id)
        .await?
        .ok_or_else(|| AppError::missing(ErrorCode::RoleNotFound, role_id))
}

fn require_ids(permission_ids: &[i64]) -> Result<(), AppError> {
    if permission_ids.is_empty() {
        return Err(AppError::validation("permission id list must not be empty"));
    }
    Ok(())
}

/// Link each permission to the role.
///
/// Per id: `assigned`, `already_assigned` (including a repeat of an id
/// earlier in the same request) or `not_found`.
pub async fn bulk_assign(
    conn: &mut SqliteConnection,
    ctx: &AuditContext,
    role_id: i64,
    permission_ids: &[i64],
) -> Result<BulkAssignmentReport, AppError> {
    require_ids(permission_ids)?;
    let role = load_role(conn, role_id).await?;
    let mut report = BulkAssignmentReport::new(role_id);

    for &permission_id in permission_ids {
        let Some(perm) = permission::find_by_id(conn, permission_id).await? else {
            report.push(permission_id, AssignmentStatus::NotFound);
            continue;
        };

        if role_permission::assign(conn, role_id, permission_id).await? {
            AuditRecorder::permission_assigned(conn, ctx, role_id, permission_id, &perm.key)
                .await?;
            report.push(permission_id, AssignmentStatus::Assigned);
        } else {
            report.push(permission_id, AssignmentStatus::AlreadyAssigned);
        }
    }

    let changed = report.changed_ids();
    if !changed.is_empty() {
        let entry = NewAuditEntry::new(
            AuditAction::BulkPermissionsAssigned,
            entity::ROLE,
            role_id,
            format!("{} permission(s) assigned to role {}", changed.len(), role.name),
        )
        .new_values(json!({
            "role_id": role_id,
            "role_name": role.name,
            "permission_ids": changed,
            "count": changed.len(),
        }));
        AuditRecorder::record(conn, ctx, entry).await?;
    }

    tracing::info!(
        role_id,
        requested = permission_ids.len(),
        assigned = report.count(AssignmentStatus::Assigned),
        "Bulk permission assignment"
    );
    Ok(report)
}

/// Unlink each permission from the role.
///
/// Per id: `removed`, `not_assigned` or `not_found`.
pub async fn bulk_remove(
    conn: &mut SqliteConnection,
    ctx: &AuditContext,
    role_id: i64,
    permission_ids: &[i64],
) -> Result<BulkAssignmentReport, AppError> {
    require_ids(permission_ids)?;
    let role = load_role(conn, role_id).await?;
    let mut report = BulkAssignmentReport::new(role_id);

    for &permission_id in permission_ids {
        let Some(perm) = permission::find_by_id(conn, permission_id).await? else {
            report.push(permission_id, AssignmentStatus::NotFound);
            continue;
        };

        if role_permission::remove(conn, role_id, permission_id).await? {
            AuditRecorder::permission_removed(conn, ctx, role_id, permission_id, &perm.key)
                .await?;
            report.push(permission_id, AssignmentStatus::Removed);
        } else {
            report.push(permission_id, AssignmentStatus::NotAssigned);
        }
    }

    let changed = report.changed_ids();
    if !changed.is_empty() {
        let entry = NewAuditEntry::new(
            AuditAction::BulkPermissionsRemoved,
            entity::ROLE,
            role_id,
            format!("{} permission(s) removed from role {}", changed.len(), role.name),
        )
        .old(json!({
            "role_id": role_id,
            "role_name": role.name,
            "permission_ids": changed,
            "count": changed.len(),
        }));
        AuditRecorder::record(conn, ctx, entry).await?;
    }

    tracing::info!(
        role_id,
        requested = permission_ids.len(),
        removed = report.count(AssignmentStatus::Removed),
        "Bulk permission removal"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::audit::{RequestContext, storage};
    use crate::db::begin_write;
    use crate::db::repository::test_support;
    use shared::models::AssignmentStatus::*;

    fn ctx() -> AuditContext {
        AuditContext::new(Some(1), RequestContext::default())
    }

    async fn setup(conn: &mut SqliteConnection) -> (i64, i64, i64) {
        let role = role::create(conn, "Editor").await.unwrap();
        let events = permission::find_by_key(conn, "MANAGE_EVENTS")
            .await
            .unwrap()
            .unwrap();
        let tickets = permission::find_by_key(conn, "MANAGE_TICKETS")
            .await
            .unwrap()
            .unwrap();
        (role.id, events.id, tickets.id)
    }

    fn statuses(report: &BulkAssignmentReport) -> Vec<AssignmentStatus> {
        report.results.iter().map(|r| r.status).collect()
    }

    #[tokio::test]
    async fn assign_reports_each_id_and_audits_changes() {
        let pool = test_support::pool().await;
        let mut tx = pool.begin().await.unwrap();
        let (role_id, events, tickets) = setup(&mut tx).await;

        let report = bulk_assign(&mut tx, &ctx(), role_id, &[events, 9999, events, tickets])
            .await
            .unwrap();
        assert_eq!(
            statuses(&report),
            [Assigned, NotFound, AlreadyAssigned, Assigned]
        );
        tx.commit().await.unwrap();

        let mut conn = pool.acquire().await.unwrap();
        let rows = storage::by_entity(&mut conn, entity::ROLE, &role_id.to_string())
            .await
            .unwrap();
        let single = rows
            .iter()
            .filter(|r| r.action == "PERMISSION_ASSIGNED_TO_ROLE")
            .count();
        let summary = rows
            .iter()
            .filter(|r| r.action == "BULK_PERMISSIONS_ASSIGNED")
            .count();
        assert_eq!((single, summary), (2, 1));
    }

    #[tokio::test]
    async fn repeat_assign_changes_nothing_and_writes_no_audit() {
        let pool = test_support::pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let (role_id, events, _) = setup(&mut conn).await;

        bulk_assign(&mut conn, &ctx(), role_id, &[events]).await.unwrap();
        let before = storage::recent(&mut conn, 500).await.unwrap().len();

        let report = bulk_assign(&mut conn, &ctx(), role_id, &[events]).await.unwrap();
        assert_eq!(statuses(&report), [AlreadyAssigned]);
        assert_eq!(storage::recent(&mut conn, 500).await.unwrap().len(), before);
    }

    #[tokio::test]
    async fn remove_reports_not_assigned() {
        let pool = test_support::pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let (role_id, events, tickets) = setup(&mut conn).await;

        bulk_assign(&mut conn, &ctx(), role_id, &[events]).await.unwrap();
        let report = bulk_remove(&mut conn, &ctx(), role_id, &[events, tickets, 4242])
            .await
            .unwrap();
        assert_eq!(statuses(&report), [Removed, NotAssigned, NotFound]);
        assert!(!role_permission::is_assigned(&mut conn, role_id, events).await.unwrap());
    }

    #[tokio::test]
    async fn empty_list_and_unknown_role_are_rejected() {
        let pool = test_support::pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let (role_id, events, _) = setup(&mut conn).await;

        let err = bulk_assign(&mut conn, &ctx(), role_id, &[]).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let err = bulk_remove(&mut conn, &ctx(), 777, &[events]).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RoleNotFound);
    }

    #[tokio::test]
    async fn writer_that_read_first_does_not_fail_the_queued_writer() {
        let (_dir, pool) = test_support::file_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let (role_id, events, _) = setup(&mut conn).await;
        drop(conn);

        // first request has already read when the second one arrives
        let mut first = begin_write(&pool).await.unwrap();
        assert!(role::find_by_id(&mut first, role_id).await.unwrap().is_some());

        let second = tokio::spawn({
            let pool = pool.clone();
            async move {
                let mut tx = begin_write(&pool).await?;
                let report = bulk_assign(&mut tx, &ctx(), role_id, &[events]).await?;
                tx.commit().await?;
                Ok::<_, AppError>(report)
            }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;

        let report = bulk_assign(&mut first, &ctx(), role_id, &[events]).await.unwrap();
        assert_eq!(statuses(&report), [Assigned]);
        first.commit().await.unwrap();

        let report = second.await.unwrap().unwrap();
        assert_eq!(statuses(&report), [AlreadyAssigned]);

        let mut conn = pool.acquire().await.unwrap();
        let single = storage::by_entity(&mut conn, entity::ROLE, &role_id.to_string())
            .await
            .unwrap()
            .into_iter()
            .filter(|r| r.action == "PERMISSION_ASSIGNED_TO_ROLE")
            .count();
        assert_eq!(single, 1);
    }

    #[tokio::test]
    async fn concurrent_role_creation_reports_a_conflict() {
        let (_dir, pool) = test_support::file_pool().await;

        let mut first = begin_write(&pool).await.unwrap();
        assert!(role::find_by_name(&mut first, "Ops").await.unwrap().is_none());

        let second = tokio::spawn({
            let pool = pool.clone();
            async move {
                let mut tx = begin_write(&pool).await.unwrap();
                role::create(&mut tx, "Ops").await
            }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;

        role::create(&mut first, "Ops").await.unwrap();
        first.commit().await.unwrap();

        let err = second.await.unwrap().unwrap_err();
        assert!(matches!(err, crate::db::repository::RepoError::Duplicate(_)));
    }
}
