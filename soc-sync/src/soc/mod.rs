//! SOC data source
//!
//! ```text
//! SocClient ── RateLimiter (employee fetches only)
//!     │
//!     └── GET /exportadados?parametro={json}
//!             │
//!             └── payload::extract_items → Vec<raw item>
//! ```

mod client;
pub mod params;
pub mod payload;
pub mod rate_limit;

pub use client::{COMPANY_FETCH_TIMEOUT, DataSource, EMPLOYEE_FETCH_TIMEOUT, SocClient};
pub use params::StatusFilter;
pub use rate_limit::RateLimiter;
