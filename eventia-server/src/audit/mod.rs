//! Audit trail
//!
//! ```text
//! handler ── begin tx ── repository mutation
//!                    └── AuditRecorder::record(&mut tx, ctx, entry)
//!         ── commit (both rows, or neither)
//! ```
//!
//! Rows are append-only. Reads go through [`storage`].

pub mod context;
pub mod diff;
pub mod recorder;
pub mod storage;
pub mod types;

pub use context::{AuditContext, RequestContext};
pub use recorder::AuditRecorder;
pub use types::{AuditAction, AuditEntry, AuditListResponse, AuditQuery, NewAuditEntry, entity};
