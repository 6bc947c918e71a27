//! Role ↔ Permission assignment reports

use serde::{Deserialize, Serialize};

use super::{Permission, Role};

/// Outcome for one permission id in a bulk assign/remove request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Assigned,
    AlreadyAssigned,
    Removed,
    NotAssigned,
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentOutcome {
    pub permission_id: i64,
    pub status: AssignmentStatus,
}

/// Per-id report of a bulk operation, in request order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkAssignmentReport {
    pub role_id: i64,
    pub results: Vec<AssignmentOutcome>,
}

impl BulkAssignmentReport {
    pub fn new(role_id: i64) -> Self {
        Self {
            role_id,
            results: Vec::new(),
        }
    }

    pub fn push(&mut self, permission_id: i64, status: AssignmentStatus) {
        self.results.push(AssignmentOutcome {
            permission_id,
            status,
        });
    }

    /// Number of entries with the given status
    pub fn count(&self, status: AssignmentStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    /// Ids whose state actually changed (assigned or removed)
    pub fn changed_ids(&self) -> Vec<i64> {
        self.results
            .iter()
            .filter(|r| {
                matches!(
                    r.status,
                    AssignmentStatus::Assigned | AssignmentStatus::Removed
                )
            })
            .map(|r| r.permission_id)
            .collect()
    }
}

/// `GET /api/security/roles/{id}/permissions` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RolePermissions {
    pub role: Role,
    pub permissions: Vec<Permission>,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_counts_and_changed_ids() {
        let mut report = BulkAssignmentReport::new(3);
        report.push(1, AssignmentStatus::Assigned);
        report.push(2, AssignmentStatus::AlreadyAssigned);
        report.push(99, AssignmentStatus::NotFound);
        report.push(4, AssignmentStatus::Assigned);

        assert_eq!(report.count(AssignmentStatus::Assigned), 2);
        assert_eq!(report.count(AssignmentStatus::NotFound), 1);
        assert_eq!(report.changed_ids(), vec![1, 4]);
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&AssignmentStatus::AlreadyAssigned).unwrap();
        assert_eq!(json, "\"already_assigned\"");
    }
}
