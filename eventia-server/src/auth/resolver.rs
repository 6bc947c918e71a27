//! Permission resolution at login time

use std::collections::BTreeSet;

use sqlx::SqliteConnection;

use crate::db::repository::{RepoResult, role, role_permission, user};

/// Role names and permission keys granted to a user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedAccess {
    pub roles: BTreeSet<String>,
    pub permissions: BTreeSet<String>,
}

impl ResolvedAccess {
    /// A user without an active role may not log in
    pub fn has_role(&self) -> bool {
        !self.roles.is_empty()
    }

    pub fn role_list(&self) -> Vec<String> {
        self.roles.iter().cloned().collect()
    }

    pub fn permission_list(&self) -> Vec<String> {
        self.permissions.iter().cloned().collect()
    }
}

/// Resolve the user's active role and its active permission keys
///
/// An inactive role counts as no role. Unknown users resolve to empty sets.
pub async fn resolve(conn: &mut SqliteConnection, user_id: i64) -> RepoResult<ResolvedAccess> {
    let Some(user) = user::find_by_id(conn, user_id).await? else {
        return Ok(ResolvedAccess::default());
    };
    let Some(role_id) = user.role_id else {
        return Ok(ResolvedAccess::default());
    };
    let Some(role) = role::find_by_id(conn, role_id).await? else {
        return Ok(ResolvedAccess::default());
    };
    if !role.is_active {
        return Ok(ResolvedAccess::default());
    }

    let permissions = role_permission::active_keys_for_role(conn, role.id)
        .await?
        .into_iter()
        .collect();

    Ok(ResolvedAccess {
        roles: BTreeSet::from([role.name]),
        permissions,
    })
}
