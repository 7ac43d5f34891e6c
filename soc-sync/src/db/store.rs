//! Store seams used by the batch orchestrator and the job drivers

use async_trait::async_trait;
use shared::{Company, CompanyRef, Employee, UpsertOutcome};

use crate::error::SyncResult;

/// Which companies the employee job iterates over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanyFilter {
    /// Every company with `ativo = true`
    Active,
    /// One company by code, regardless of its flag
    Code(i64),
}

/// Relational store holding companies and employees
#[async_trait]
pub trait SyncStore: Send + Sync {
    /// Exclusive connection, released when dropped
    async fn acquire(&self) -> SyncResult<Box<dyn StoreConn>>;

    /// Targets of the employee job
    ///
    /// `CompanyFilter::Code` fails with `SyncError::CompanyNotFound` when
    /// the code is unknown.
    async fn list_companies(&self, filter: CompanyFilter) -> SyncResult<Vec<CompanyRef>>;
}

/// One exclusive store connection
///
/// Every upsert runs in its own transaction: a failure rolls back that
/// record only and leaves the connection usable.
#[async_trait]
pub trait StoreConn: Send {
    async fn upsert_company(&mut self, company: &Company) -> SyncResult<UpsertOutcome>;

    async fn upsert_employee(&mut self, employee: &Employee) -> SyncResult<UpsertOutcome>;
}

/// Record type the batch orchestrator can write
#[async_trait]
pub trait SyncRecord: Send + Sync + 'static {
    async fn upsert(&self, conn: &mut dyn StoreConn) -> SyncResult<UpsertOutcome>;

    /// Short identification for error logs
    fn describe(&self) -> String;
}

#[async_trait]
impl SyncRecord for Company {
    async fn upsert(&self, conn: &mut dyn StoreConn) -> SyncResult<UpsertOutcome> {
        conn.upsert_company(self).await
    }

    fn describe(&self) -> String {
        format!("company {}", self.codigo)
    }
}

#[async_trait]
impl SyncRecord for Employee {
    async fn upsert(&self, conn: &mut dyn StoreConn) -> SyncResult<UpsertOutcome> {
        conn.upsert_employee(self).await
    }

    fn describe(&self) -> String {
        format!("employee {} (CPF: {})", self.nome, self.cpf)
    }
}
