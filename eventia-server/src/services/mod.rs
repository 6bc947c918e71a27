//! Service layer
//!
//! Operations that span several repositories plus the audit trail. Each
//! takes the caller's connection so the handler owns the transaction.
//!
//! - [`role_permission`]: bulk role ↔ permission assignment
//! - [`bootstrap`]: first-run admin account

pub mod bootstrap;
pub mod role_permission;
