//! Built-in permission keys
//!
//! Each protected route group requires exactly one of these. They are
//! seeded by the initial migration; further keys can be created at runtime
//! but no route checks them.

pub const MANAGE_USERS: &str = "MANAGE_USERS";
pub const MANAGE_ROLES: &str = "MANAGE_ROLES";
pub const MANAGE_TICKETS: &str = "MANAGE_TICKETS";
pub const MANAGE_PERMISSIONS: &str = "MANAGE_PERMISSIONS";
pub const MANAGE_EVENTS: &str = "MANAGE_EVENTS";
pub const MANAGE_AUDIT: &str = "MANAGE_AUDIT";

pub const ALL_PERMISSIONS: &[&str] = &[
    MANAGE_USERS,
    MANAGE_ROLES,
    MANAGE_TICKETS,
    MANAGE_PERMISSIONS,
    MANAGE_EVENTS,
    MANAGE_AUDIT,
];

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::normalize_permission_key;

    #[test]
    fn built_in_keys_are_canonical() {
        for key in ALL_PERMISSIONS {
            assert_eq!(normalize_permission_key(key), *key);
        }
    }
}
