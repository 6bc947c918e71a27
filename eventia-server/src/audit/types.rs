//! Audit log types
//!
//! Rows are immutable once written; the crate exposes no update or delete.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;

/// Audited action codes
///
/// Stored as free text (`as_str`) so reporting can filter on codes that
/// predate or postdate this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    // ═══ Auth ═══
    LoginSucceeded,

    // ═══ Users ═══
    UserCreated,
    UserUpdated,
    UserDeleted,
    UserDisabled,
    UserEnabled,
    UserRoleAssigned,
    UserRoleRemoved,

    // ═══ Roles ═══
    RoleCreated,
    RoleUpdated,
    RoleDeleted,
    RoleUsersQueried,

    // ═══ Permissions ═══
    PermissionCreated,
    PermissionUpdated,
    PermissionDeleted,
    PermissionAssignedToRole,
    PermissionRemovedFromRole,
    BulkPermissionsAssigned,
    BulkPermissionsRemoved,

    // ═══ Events ═══
    EventCreated,
    EventUpdated,
    EventDeleted,

    // ═══ Tickets ═══
    TicketCreated,
    TicketUpdated,
    TicketAssigned,
    TicketStatusChanged,
    TicketDeleted,
    TicketTypeCreated,
}

impl AuditAction {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LoginSucceeded => "LOGIN_SUCCEEDED",
            Self::UserCreated => "USER_CREATED",
            Self::UserUpdated => "USER_UPDATED",
            Self::UserDeleted => "USER_DELETED",
            Self::UserDisabled => "USER_DISABLED",
            Self::UserEnabled => "USER_ENABLED",
            Self::UserRoleAssigned => "USER_ROLE_ASSIGNED",
            Self::UserRoleRemoved => "USER_ROLE_REMOVED",
            Self::RoleCreated => "ROLE_CREATED",
            Self::RoleUpdated => "ROLE_UPDATED",
            Self::RoleDeleted => "ROLE_DELETED",
            Self::RoleUsersQueried => "ROLE_USERS_QUERIED",
            Self::PermissionCreated => "PERMISSION_CREATED",
            Self::PermissionUpdated => "PERMISSION_UPDATED",
            Self::PermissionDeleted => "PERMISSION_DELETED",
            Self::PermissionAssignedToRole => "PERMISSION_ASSIGNED_TO_ROLE",
            Self::PermissionRemovedFromRole => "PERMISSION_REMOVED_FROM_ROLE",
            Self::BulkPermissionsAssigned => "BULK_PERMISSIONS_ASSIGNED",
            Self::BulkPermissionsRemoved => "BULK_PERMISSIONS_REMOVED",
            Self::EventCreated => "EVENT_CREATED",
            Self::EventUpdated => "EVENT_UPDATED",
            Self::EventDeleted => "EVENT_DELETED",
            Self::TicketCreated => "TICKET_CREATED",
            Self::TicketUpdated => "TICKET_UPDATED",
            Self::TicketAssigned => "TICKET_ASSIGNED",
            Self::TicketStatusChanged => "TICKET_STATUS_CHANGED",
            Self::TicketDeleted => "TICKET_DELETED",
            Self::TicketTypeCreated => "TICKET_TYPE_CREATED",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entity type names used in `audit_log.entity_type`
pub mod entity {
    pub const USER: &str = "User";
    pub const ROLE: &str = "Role";
    pub const PERMISSION: &str = "Permission";
    pub const EVENT: &str = "Event";
    pub const TICKET: &str = "Ticket";
    pub const TICKET_TYPE: &str = "TicketType";
}

/// A stored audit row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuditEntry {
    pub id: i64,
    pub action: String,
    pub entity_type: String,
    pub entity_id: String,
    pub description: String,
    pub old_values: Option<Json<Value>>,
    pub new_values: Option<Json<Value>>,
    pub user_id: Option<i64>,
    pub created_at: i64,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// An audit record about to be written
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuditEntry {
    pub action: String,
    pub entity_type: String,
    pub entity_id: String,
    pub description: String,
    pub old_values: Option<Value>,
    pub new_values: Option<Value>,
}

impl NewAuditEntry {
    pub fn new(
        action: AuditAction,
        entity_type: &str,
        entity_id: impl ToString,
        description: impl Into<String>,
    ) -> Self {
        Self {
            action: action.as_str().to_string(),
            entity_type: entity_type.to_string(),
            entity_id: entity_id.to_string(),
            description: description.into(),
            old_values: None,
            new_values: None,
        }
    }

    pub fn old(mut self, values: Value) -> Self {
        self.old_values = Some(values);
        self
    }

    pub fn new_values(mut self, values: Value) -> Self {
        self.new_values = Some(values);
        self
    }
}

/// Filters for `GET /api/audit`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditQuery {
    pub action: Option<String>,
    pub entity_type: Option<String>,
    pub user_id: Option<i64>,
    /// Inclusive lower bound (Unix millis)
    pub from: Option<i64>,
    /// Inclusive upper bound (Unix millis)
    pub to: Option<i64>,
    #[serde(default)]
    pub offset: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    50
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuditListResponse {
    pub items: Vec<AuditEntry>,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_codes_match_serde_names() {
        for action in [
            AuditAction::LoginSucceeded,
            AuditAction::PermissionAssignedToRole,
            AuditAction::BulkPermissionsRemoved,
            AuditAction::TicketTypeCreated,
        ] {
            let json = serde_json::to_string(&action).unwrap();
            assert_eq!(json, format!("\"{}\"", action.as_str()));
        }
    }

    #[test]
    fn builder_sets_snapshots() {
        let entry = NewAuditEntry::new(AuditAction::RoleUpdated, entity::ROLE, 3, "Role renamed")
            .old(serde_json::json!({"name": "Editor"}))
            .new_values(serde_json::json!({"name": "Editors"}));
        assert_eq!(entry.action, "ROLE_UPDATED");
        assert_eq!(entry.entity_id, "3");
        assert_eq!(entry.old_values.unwrap()["name"], "Editor");
    }
}
