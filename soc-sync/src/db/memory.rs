//! In-memory store for tests
//!
//! Applies the same reconciliation rules as the PostgreSQL store and
//! counts connection checkouts so tests can assert every connection
//! was handed back.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use shared::{Company, CompanyRef, Employee, UpsertOutcome};

use super::reconcile::{ExistingEmployee, resolve_employee_match, warn_replaced_cpf};
use super::store::{CompanyFilter, StoreConn, SyncStore};
use crate::error::{SyncError, SyncResult};

#[derive(Default)]
struct Tables {
    companies: BTreeMap<i64, Company>,
    employees: Vec<Employee>,
}

#[derive(Default)]
struct Inner {
    tables: Mutex<Tables>,
    fail_cpfs: Mutex<HashSet<String>>,
    panic_cpfs: Mutex<HashSet<String>>,
    fail_companies: Mutex<HashSet<i64>>,
    upsert_delay: Mutex<Option<Duration>>,
    failing_acquires: AtomicUsize,
    acquired: AtomicU64,
    released: AtomicU64,
    live: AtomicU64,
    peak_live: AtomicU64,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with companies
    pub fn with_companies(companies: impl IntoIterator<Item = Company>) -> Self {
        let store = Self::new();
        {
            let mut tables = store.tables();
            for c in companies {
                tables.companies.insert(c.codigo, c);
            }
        }
        store
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.inner.tables.lock().unwrap()
    }

    /// Upserts of employees with this cpf fail with a store error
    pub fn fail_on_cpf(&self, cpf: &str) {
        self.inner.fail_cpfs.lock().unwrap().insert(cpf.to_string());
    }

    /// Upserts of employees with this cpf panic inside the worker
    pub fn panic_on_cpf(&self, cpf: &str) {
        self.inner.panic_cpfs.lock().unwrap().insert(cpf.to_string());
    }

    /// Upserts of this company code fail with a store error
    pub fn fail_on_company(&self, codigo: i64) {
        self.inner.fail_companies.lock().unwrap().insert(codigo);
    }

    /// Every employee upsert sleeps this long before writing
    pub fn delay_upserts(&self, delay: Duration) {
        *self.inner.upsert_delay.lock().unwrap() = Some(delay);
    }

    /// The next `n` acquires fail
    pub fn fail_next_acquires(&self, n: usize) {
        self.inner.failing_acquires.store(n, Ordering::SeqCst);
    }

    pub fn acquired(&self) -> u64 {
        self.inner.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> u64 {
        self.inner.released.load(Ordering::SeqCst)
    }

    /// Highest number of connections checked out at the same time
    pub fn peak_live(&self) -> u64 {
        self.inner.peak_live.load(Ordering::SeqCst)
    }

    pub fn companies(&self) -> Vec<Company> {
        self.tables().companies.values().cloned().collect()
    }

    pub fn employees(&self) -> Vec<Employee> {
        self.tables().employees.clone()
    }

    pub fn insert_employee(&self, employee: Employee) {
        self.tables().employees.push(employee);
    }
}

#[async_trait]
impl SyncStore for MemoryStore {
    async fn acquire(&self) -> SyncResult<Box<dyn StoreConn>> {
        let failing = self
            .inner
            .failing_acquires
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if failing.is_ok() {
            return Err(SyncError::Store(sqlx::Error::PoolTimedOut));
        }
        self.inner.acquired.fetch_add(1, Ordering::SeqCst);
        let live = self.inner.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.peak_live.fetch_max(live, Ordering::SeqCst);
        Ok(Box::new(MemoryConn {
            store: self.clone(),
        }))
    }

    async fn list_companies(&self, filter: CompanyFilter) -> SyncResult<Vec<CompanyRef>> {
        let tables = self.tables();
        let to_ref = |c: &Company| CompanyRef {
            id: c.id,
            codigo: c.codigo,
        };
        match filter {
            CompanyFilter::Code(codigo) => tables
                .companies
                .get(&codigo)
                .map(|c| vec![to_ref(c)])
                .ok_or(SyncError::CompanyNotFound(codigo)),
            CompanyFilter::Active => Ok(tables
                .companies
                .values()
                .filter(|c| c.ativo)
                .map(to_ref)
                .collect()),
        }
    }
}

struct MemoryConn {
    store: MemoryStore,
}

impl Drop for MemoryConn {
    fn drop(&mut self) {
        self.store.inner.live.fetch_sub(1, Ordering::SeqCst);
        self.store.inner.released.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl StoreConn for MemoryConn {
    async fn upsert_company(&mut self, company: &Company) -> SyncResult<UpsertOutcome> {
        let should_fail = self
            .store
            .inner
            .fail_companies
            .lock()
            .unwrap()
            .contains(&company.codigo);
        if should_fail {
            return Err(SyncError::Store(sqlx::Error::Protocol(format!(
                "injected failure for company {}",
                company.codigo
            ))));
        }

        let mut tables = self.store.tables();
        match tables.companies.get_mut(&company.codigo) {
            Some(existing) => {
                let id = existing.id;
                let usuario_id = existing.usuario_id;
                *existing = Company {
                    id,
                    usuario_id,
                    ..company.clone()
                };
                Ok(UpsertOutcome::Updated)
            }
            None => {
                tables.companies.insert(company.codigo, company.clone());
                Ok(UpsertOutcome::Inserted)
            }
        }
    }

    async fn upsert_employee(&mut self, employee: &Employee) -> SyncResult<UpsertOutcome> {
        let delay = *self.store.inner.upsert_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let should_panic = self
            .store
            .inner
            .panic_cpfs
            .lock()
            .unwrap()
            .contains(&employee.cpf);
        if should_panic {
            panic!("injected panic for cpf {}", employee.cpf);
        }
        let should_fail = self
            .store
            .inner
            .fail_cpfs
            .lock()
            .unwrap()
            .contains(&employee.cpf);
        if should_fail {
            return Err(SyncError::Store(sqlx::Error::Protocol(format!(
                "injected failure for cpf {}",
                employee.cpf
            ))));
        }

        let mut tables = self.store.tables();
        let existing = |e: &Employee| ExistingEmployee {
            id: e.id,
            cpf: Some(e.cpf.clone()),
        };
        let by_cpf = employee.cpf_key().and_then(|cpf| {
            tables
                .employees
                .iter()
                .find(|e| !e.cpf.is_empty() && e.cpf == cpf)
                .map(existing)
        });
        let by_code = employee.codigo.and_then(|codigo| {
            tables
                .employees
                .iter()
                .find(|e| {
                    e.codigo == Some(codigo) && e.codigo_empresa == employee.codigo_empresa
                })
                .map(existing)
        });

        let matched = resolve_employee_match(employee, by_cpf, by_code);
        warn_replaced_cpf(employee, &matched);

        match matched.existing_id() {
            Some(id) => {
                if let Some(row) = tables.employees.iter_mut().find(|e| e.id == id) {
                    *row = Employee {
                        id,
                        ..employee.clone()
                    };
                }
                Ok(UpsertOutcome::Updated)
            }
            None => {
                tables.employees.push(employee.clone());
                Ok(UpsertOutcome::Inserted)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{company, employee};

    #[tokio::test]
    async fn employee_reconciles_by_cpf_then_code() {
        let store = MemoryStore::new();
        let mut conn = store.acquire().await.unwrap();

        let first = employee(1, "111");
        assert_eq!(conn.upsert_employee(&first).await.unwrap(), UpsertOutcome::Inserted);

        // same cpf, new code
        let moved = employee(2, "111");
        assert_eq!(conn.upsert_employee(&moved).await.unwrap(), UpsertOutcome::Updated);

        // same code, cpf changed upstream
        let changed = employee(2, "222");
        assert_eq!(conn.upsert_employee(&changed).await.unwrap(), UpsertOutcome::Updated);

        let rows = store.employees();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, first.id);
        assert_eq!(rows[0].cpf, "222");
    }

    #[tokio::test]
    async fn company_update_keeps_id() {
        let store = MemoryStore::new();
        let mut conn = store.acquire().await.unwrap();

        let original = company(7);
        conn.upsert_company(&original).await.unwrap();
        let again = company(7);
        assert_ne!(again.id, original.id);
        assert_eq!(conn.upsert_company(&again).await.unwrap(), UpsertOutcome::Updated);

        assert_eq!(store.companies()[0].id, original.id);
    }

    #[tokio::test]
    async fn connections_are_counted() {
        let store = MemoryStore::new();
        store.fail_next_acquires(1);
        assert!(store.acquire().await.is_err());

        let conn = store.acquire().await.unwrap();
        assert_eq!((store.acquired(), store.released()), (1, 0));
        drop(conn);
        assert_eq!((store.acquired(), store.released()), (1, 1));
    }
}
