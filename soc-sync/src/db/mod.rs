//! Persistence layer

#[cfg(test)]
pub(crate) mod memory;
mod postgres;
pub mod reconcile;
mod store;

pub use postgres::PgStore;
pub use store::{CompanyFilter, StoreConn, SyncRecord, SyncStore};
