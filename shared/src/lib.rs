//! Shared types for the SOC sync jobs
//!
//! Typed records stored by the import jobs and the run accounting
//! types reported by them.

pub mod models;
pub mod report;

// Re-exports
pub use models::{Company, CompanyRef, Employee};
pub use report::{SyncReport, UpsertOutcome};
