//! Audit trail for AIMS
//!
//! Every create, update and delete of a logged row is appended to
//! `audit.log` as one JSON line with before/after snapshots. Sealed fields
//! (mood, journal entries) appear in snapshots as ciphertext tokens only.
//!
//! - `AuditEntry`: one operation on one row
//! - `AuditLogger`: appends to and reads back the JSONL file
//! - `generate_diff`: top-level field changes between two snapshots

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
