//! Canned data source

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{SyncError, SyncResult};
use crate::soc::{DataSource, StatusFilter};

/// Replays fixed bodies; anything not configured answers HTTP 500
#[derive(Default)]
pub(crate) struct FakeSource {
    companies: Option<Value>,
    employees: HashMap<i64, Value>,
    calls: Mutex<Vec<(i64, StatusFilter)>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_companies(mut self, body: Value) -> Self {
        self.companies = Some(body);
        self
    }

    pub fn with_employees(mut self, company_code: i64, body: Value) -> Self {
        self.employees.insert(company_code, body);
        self
    }

    /// Employee fetches in call order
    pub fn calls(&self) -> Vec<(i64, StatusFilter)> {
        self.calls.lock().unwrap().clone()
    }
}

fn unavailable() -> SyncError {
    SyncError::Api {
        status: 500,
        body: "unavailable".to_string(),
    }
}

#[async_trait]
impl DataSource for FakeSource {
    async fn fetch_companies(&self) -> SyncResult<Value> {
        self.companies.clone().ok_or_else(unavailable)
    }

    async fn fetch_employees(&self, company_code: i64, filter: StatusFilter) -> SyncResult<Value> {
        self.calls.lock().unwrap().push((company_code, filter));
        self.employees.get(&company_code).cloned().ok_or_else(unavailable)
    }
}
