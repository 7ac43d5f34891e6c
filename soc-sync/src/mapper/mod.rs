//! Record mapping
//!
//! Raw export items (uppercase upstream names, loosely typed values) are
//! converted into typed records right after shape detection. A failing
//! item is logged and counted, never partially kept.

pub mod coerce;
mod company;
mod employee;

pub use company::map_company;
pub use employee::map_employee;

use serde_json::Value;
use shared::{Company, CompanyRef, Employee, SyncReport};

/// Display name of a raw item for logs
fn item_name(item: &Value, field: &str) -> String {
    match item.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => "Unknown".to_string(),
    }
}

/// Map a company export, dropping inactive and malformed items
///
/// The returned report carries `fetched`, `skipped` and mapping `errors`.
pub fn map_companies(items: &[Value]) -> (Vec<Company>, SyncReport) {
    let mut report = SyncReport {
        fetched: items.len() as u64,
        ..Default::default()
    };
    let mut companies = Vec::with_capacity(items.len());

    for item in items {
        match map_company(item) {
            Ok(Some(company)) => companies.push(company),
            Ok(None) => report.skipped += 1,
            Err(e) => {
                report.errors += 1;
                tracing::error!(
                    company = %item_name(item, "CODIGO"),
                    error = %e,
                    "Skipping company item"
                );
            }
        }
    }

    tracing::info!(
        active = companies.len(),
        total = items.len(),
        "Processed active companies"
    );
    (companies, report)
}

/// Map one company's employee export, dropping malformed items
pub fn map_employees(items: &[Value], company: &CompanyRef) -> (Vec<Employee>, SyncReport) {
    let mut report = SyncReport {
        fetched: items.len() as u64,
        ..Default::default()
    };
    let mut employees = Vec::with_capacity(items.len());

    for item in items {
        match map_employee(item, company) {
            Ok(employee) => employees.push(employee),
            Err(e) => {
                report.errors += 1;
                tracing::error!(
                    company = company.codigo,
                    employee = %item_name(item, "NOME"),
                    error = %e,
                    "Error processing employee"
                );
            }
        }
    }

    tracing::info!(
        company = company.codigo,
        employees = employees.len(),
        "Processed employees"
    );
    (employees, report)
}
