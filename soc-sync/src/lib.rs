//! soc-sync - SOC company and employee import jobs
//!
//! Pulls company and employee master data from the SOC `exportadados`
//! web service and reconciles it into the portal's PostgreSQL tables.
//!
//! ```text
//! soc::SocClient ──► soc::payload ──► mapper ──► batch ──► db::PgStore
//!                                                  ▲
//!                                    jobs::{run_company_import, run_employee_import}
//! ```

pub mod batch;
pub mod config;
pub mod db;
pub mod error;
pub mod jobs;
pub mod logger;
pub mod mapper;
pub mod soc;

#[cfg(test)]
mod test_support;

pub use config::{Config, LogSettings};
pub use error::{MappingError, SyncError, SyncResult};
