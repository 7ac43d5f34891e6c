//! Sync run accounting
//!
//! Counts produced by one batch, one company or one whole job run.
//! Merging is plain summation, so the order in which batches finish
//! does not change the totals.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// Result of a single upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Counters for a sync run (never persisted)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Raw items received from the data source
    pub fetched: u64,
    /// Items intentionally filtered out (e.g. inactive companies)
    pub skipped: u64,
    pub inserted: u64,
    pub updated: u64,
    /// Mapping failures, store failures and records of failed batches
    pub errors: u64,
}

impl SyncReport {
    pub fn record(&mut self, outcome: UpsertOutcome) {
        match outcome {
            UpsertOutcome::Inserted => self.inserted += 1,
            UpsertOutcome::Updated => self.updated += 1,
        }
    }

    /// Records that reached the store successfully
    pub fn written(&self) -> u64 {
        self.inserted + self.updated
    }

    /// `(inserted, updated, errors)`
    pub fn counts(&self) -> (u64, u64, u64) {
        (self.inserted, self.updated, self.errors)
    }
}

impl AddAssign for SyncReport {
    fn add_assign(&mut self, rhs: Self) {
        self.fetched += rhs.fetched;
        self.skipped += rhs.skipped;
        self.inserted += rhs.inserted;
        self.updated += rhs.updated;
        self.errors += rhs.errors;
    }
}

impl Add for SyncReport {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl std::fmt::Display for SyncReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} inserted, {} updated, {} errors",
            self.inserted, self.updated, self.errors
        )
    }
}
