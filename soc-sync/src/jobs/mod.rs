//! Job drivers

mod company;
mod employee;
#[cfg(test)]
pub(crate) mod testing;

pub use company::run_company_import;
pub use employee::{EmployeeJobOptions, run_employee_import};
