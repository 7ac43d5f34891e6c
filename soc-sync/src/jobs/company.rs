//! Company import
//!
//! ```text
//! fetch (fatal on error) → detect shape → map → one connection,
//! sequential upsert → summary
//! ```

use std::time::Instant;

use shared::SyncReport;

use crate::db::{SyncRecord, SyncStore};
use crate::error::SyncResult;
use crate::mapper::map_companies;
use crate::soc::DataSource;
use crate::soc::payload::extract_items;

/// Run the company import once
///
/// Fails only when the export cannot be fetched or no store connection
/// can be obtained; record-level failures are counted in the report.
pub async fn run_company_import(
    source: &dyn DataSource,
    store: &dyn SyncStore,
) -> SyncResult<SyncReport> {
    let started = Instant::now();
    tracing::info!("Starting company import");

    let body = source.fetch_companies().await?;
    let items = extract_items(body, "companies");
    let (companies, mut report) = map_companies(&items);

    if companies.is_empty() {
        tracing::warn!("No active companies to save");
    } else {
        let mut conn = store.acquire().await?;
        tracing::info!(companies = companies.len(), "Saving companies");
        for company in &companies {
            match company.upsert(&mut *conn).await {
                Ok(outcome) => report.record(outcome),
                Err(e) => {
                    report.errors += 1;
                    tracing::error!(
                        record = %company.describe(),
                        error = %e,
                        "Error saving company"
                    );
                }
            }
        }
    }

    tracing::info!(
        fetched = report.fetched,
        skipped = report.skipped,
        inserted = report.inserted,
        updated = report.updated,
        written = report.written(),
        errors = report.errors,
        duration_ms = started.elapsed().as_millis() as u64,
        "Company import finished: {report}"
    );
    Ok(report)
}
