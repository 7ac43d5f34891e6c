//! Data models
//!
//! Store-facing record types. All generated IDs are UUID v4.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.

pub mod company;
pub mod employee;

// Re-exports
pub use company::*;
pub use employee::*;
