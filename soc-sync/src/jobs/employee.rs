//! Employee import
//!
//! ```text
//! list target companies ──► for each company (sequential):
//!     fetch (rate-limited) → detect shape → map → run_batches
//! ──► summary
//! ```
//!
//! A company whose fetch fails is logged and skipped with zero counts.

use std::sync::Arc;
use std::time::Instant;

use shared::{CompanyRef, SyncReport};

use crate::batch::run_batches;
use crate::db::{CompanyFilter, SyncStore};
use crate::error::SyncResult;
use crate::mapper::map_employees;
use crate::soc::{DataSource, StatusFilter};
use crate::soc::payload::extract_items;

/// Employee import options (from the command line)
#[derive(Debug, Clone, Copy, Default)]
pub struct EmployeeJobOptions {
    /// Also export dismissed employees
    pub include_inactive: bool,
    /// Sync only this company, whatever its active flag
    pub company_code: Option<i64>,
}

impl EmployeeJobOptions {
    fn filter(&self) -> CompanyFilter {
        match self.company_code {
            Some(code) => CompanyFilter::Code(code),
            None => CompanyFilter::Active,
        }
    }
}

/// Run the employee import once
///
/// Fails only when the target companies cannot be listed (including an
/// unknown `company_code`).
pub async fn run_employee_import(
    source: &dyn DataSource,
    store: Arc<dyn SyncStore>,
    options: EmployeeJobOptions,
) -> SyncResult<SyncReport> {
    let started = Instant::now();
    tracing::info!(
        include_inactive = options.include_inactive,
        company = ?options.company_code,
        "Starting employee import"
    );

    let companies = store.list_companies(options.filter()).await?;
    if companies.is_empty() {
        tracing::warn!("No companies found to process");
        return Ok(SyncReport::default());
    }
    tracing::info!(companies = companies.len(), "Processing companies");

    let status = StatusFilter::including_inactive(options.include_inactive);
    let mut total = SyncReport::default();
    let count = companies.len();

    for (i, company) in companies.iter().enumerate() {
        let report = sync_company(source, store.clone(), company, status).await;
        tracing::info!(
            company = company.codigo,
            inserted = report.inserted,
            updated = report.updated,
            errors = report.errors,
            "Company processed"
        );
        total += report;
        tracing::info!("Progress: {}/{}", i + 1, count);
    }

    tracing::info!(
        companies = count,
        fetched = total.fetched,
        inserted = total.inserted,
        updated = total.updated,
        written = total.written(),
        errors = total.errors,
        duration_ms = started.elapsed().as_millis() as u64,
        "Employee import finished: {total}"
    );
    Ok(total)
}

async fn sync_company(
    source: &dyn DataSource,
    store: Arc<dyn SyncStore>,
    company: &CompanyRef,
    status: StatusFilter,
) -> SyncReport {
    let body = match source.fetch_employees(company.codigo, status).await {
        Ok(body) => body,
        Err(e) => {
            tracing::error!(
                company = company.codigo,
                error = %e,
                body = e.body().unwrap_or_default(),
                "Error fetching employees"
            );
            return SyncReport::default();
        }
    };

    let context = format!("employees of company {}", company.codigo);
    let items = extract_items(body, &context);
    if items.is_empty() {
        tracing::warn!(company = company.codigo, "No employees found");
        return SyncReport::default();
    }

    let (employees, mapped) = map_employees(&items, company);
    mapped + run_batches(store, employees).await
}
