//! PostgreSQL store
//!
//! Raw parameterized statements against `empresas` and `funcionarios`.
//! Schema is owned elsewhere; nothing here creates or alters tables.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use shared::{Company, CompanyRef, Employee, UpsertOutcome};
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgArguments, PgPoolOptions};
use sqlx::query::Query;
use sqlx::{Connection, PgPool, Postgres};
use uuid::Uuid;

use super::reconcile::{ExistingEmployee, resolve_employee_match, warn_replaced_cpf};
use super::store::{CompanyFilter, StoreConn, SyncStore};
use crate::error::{SyncError, SyncResult};

/// `funcionarios` columns written by the import, in bind order (`id` excluded)
pub(crate) const EMPLOYEE_COLUMNS: &[&str] = &[
    "empresa_id",
    "codigo_empresa",
    "nome_empresa",
    "codigo",
    "nome",
    "codigo_unidade",
    "nome_unidade",
    "codigo_setor",
    "nome_setor",
    "codigo_cargo",
    "nome_cargo",
    "cbo_cargo",
    "ccusto",
    "nome_centro_custo",
    "matricula_funcionario",
    "cpf",
    "rg",
    "uf_rg",
    "orgao_emissor_rg",
    "situacao",
    "sexo",
    "pis",
    "ctps",
    "serie_ctps",
    "estado_civil",
    "tipo_contratacao",
    "data_nascimento",
    "data_admissao",
    "data_demissao",
    "endereco",
    "numero_endereco",
    "bairro",
    "cidade",
    "uf",
    "cep",
    "telefone_residencial",
    "telefone_celular",
    "email",
    "deficiente",
    "deficiencia",
    "nm_mae_funcionario",
    "data_ult_alteracao",
    "matricula_rh",
    "cor",
    "escolaridade",
    "naturalidade",
    "ramal",
    "regime_revezamento",
    "regime_trabalho",
    "tel_comercial",
    "turno_trabalho",
    "rh_unidade",
    "rh_setor",
    "rh_cargo",
    "rh_centro_custo_unidade",
];

/// `INSERT ... (id, <columns>) VALUES ($1, $2, ...)`
static EMPLOYEE_INSERT: LazyLock<String> = LazyLock::new(|| {
    let placeholders: Vec<String> = (1..=EMPLOYEE_COLUMNS.len() + 1)
        .map(|i| format!("${i}"))
        .collect();
    format!(
        "INSERT INTO funcionarios (id, {}) VALUES ({})",
        EMPLOYEE_COLUMNS.join(", "),
        placeholders.join(", ")
    )
});

/// `UPDATE ... SET <column> = $n, ... WHERE id = $last`
static EMPLOYEE_UPDATE: LazyLock<String> = LazyLock::new(|| {
    let assignments: Vec<String> = EMPLOYEE_COLUMNS
        .iter()
        .enumerate()
        .map(|(i, column)| format!("{column} = ${}", i + 1))
        .collect();
    format!(
        "UPDATE funcionarios SET {} WHERE id = ${}",
        assignments.join(", "),
        EMPLOYEE_COLUMNS.len() + 1
    )
});

type PgQuery<'q> = Query<'q, Postgres, PgArguments>;

/// Bind every column of [`EMPLOYEE_COLUMNS`] in order
fn bind_employee_columns<'q>(query: PgQuery<'q>, e: &'q Employee) -> PgQuery<'q> {
    query
        .bind(e.empresa_id)
        .bind(e.codigo_empresa)
        .bind(&e.nome_empresa)
        .bind(e.codigo)
        .bind(&e.nome)
        .bind(&e.codigo_unidade)
        .bind(&e.nome_unidade)
        .bind(&e.codigo_setor)
        .bind(&e.nome_setor)
        .bind(&e.codigo_cargo)
        .bind(&e.nome_cargo)
        .bind(&e.cbo_cargo)
        .bind(&e.ccusto)
        .bind(&e.nome_centro_custo)
        .bind(&e.matricula_funcionario)
        .bind(&e.cpf)
        .bind(&e.rg)
        .bind(&e.uf_rg)
        .bind(&e.orgao_emissor_rg)
        .bind(&e.situacao)
        .bind(e.sexo)
        .bind(&e.pis)
        .bind(&e.ctps)
        .bind(&e.serie_ctps)
        .bind(e.estado_civil)
        .bind(e.tipo_contratacao)
        .bind(e.data_nascimento)
        .bind(e.data_admissao)
        .bind(e.data_demissao)
        .bind(&e.endereco)
        .bind(&e.numero_endereco)
        .bind(&e.bairro)
        .bind(&e.cidade)
        .bind(&e.uf)
        .bind(&e.cep)
        .bind(&e.telefone_residencial)
        .bind(&e.telefone_celular)
        .bind(&e.email)
        .bind(e.deficiente)
        .bind(&e.deficiencia)
        .bind(&e.nm_mae_funcionario)
        .bind(e.data_ult_alteracao)
        .bind(&e.matricula_rh)
        .bind(e.cor)
        .bind(e.escolaridade)
        .bind(&e.naturalidade)
        .bind(&e.ramal)
        .bind(e.regime_revezamento)
        .bind(&e.regime_trabalho)
        .bind(&e.tel_comercial)
        .bind(e.turno_trabalho)
        .bind(&e.rh_unidade)
        .bind(&e.rh_setor)
        .bind(&e.rh_cargo)
        .bind(&e.rh_centro_custo_unidade)
}

/// PostgreSQL-backed [`SyncStore`]
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect eagerly so an unreachable database fails the job at start
    pub async fn connect(database_url: &str, max_connections: u32) -> SyncResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl SyncStore for PgStore {
    async fn acquire(&self) -> SyncResult<Box<dyn StoreConn>> {
        let conn = self.pool.acquire().await?;
        Ok(Box::new(PgStoreConn { conn }))
    }

    async fn list_companies(&self, filter: CompanyFilter) -> SyncResult<Vec<CompanyRef>> {
        match filter {
            CompanyFilter::Code(codigo) => {
                let company = sqlx::query_as::<_, CompanyRef>(
                    "SELECT id, codigo FROM empresas WHERE codigo = $1",
                )
                .bind(codigo)
                .fetch_optional(&self.pool)
                .await?
                .ok_or(SyncError::CompanyNotFound(codigo))?;
                Ok(vec![company])
            }
            CompanyFilter::Active => Ok(sqlx::query_as::<_, CompanyRef>(
                "SELECT id, codigo FROM empresas WHERE ativo = true ORDER BY codigo",
            )
            .fetch_all(&self.pool)
            .await?),
        }
    }
}

/// Pooled connection, returned to the pool on drop
struct PgStoreConn {
    conn: PoolConnection<Postgres>,
}

#[async_trait]
impl StoreConn for PgStoreConn {
    async fn upsert_company(&mut self, c: &Company) -> SyncResult<UpsertOutcome> {
        let mut tx = self.conn.begin().await?;

        let existing: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM empresas WHERE codigo = $1")
                .bind(c.codigo)
                .fetch_optional(&mut *tx)
                .await?;

        let outcome = if existing.is_some() {
            sqlx::query(
                r#"
                UPDATE empresas SET
                    nome_abreviado = $2, razao_social_inicial = $3, razao_social = $4,
                    endereco = $5, numero_endereco = $6, complemento_endereco = $7,
                    bairro = $8, cidade = $9, cep = $10, uf = $11, cnpj = $12,
                    inscricao_estadual = $13, inscricao_municipal = $14, ativo = $15
                WHERE codigo = $1
                "#,
            )
            .bind(c.codigo)
            .bind(&c.nome_abreviado)
            .bind(&c.razao_social_inicial)
            .bind(&c.razao_social)
            .bind(&c.endereco)
            .bind(&c.numero_endereco)
            .bind(&c.complemento_endereco)
            .bind(&c.bairro)
            .bind(&c.cidade)
            .bind(&c.cep)
            .bind(&c.uf)
            .bind(&c.cnpj)
            .bind(&c.inscricao_estadual)
            .bind(&c.inscricao_municipal)
            .bind(c.ativo)
            .execute(&mut *tx)
            .await?;
            UpsertOutcome::Updated
        } else {
            sqlx::query(
                r#"
                INSERT INTO empresas (
                    id, codigo, nome_abreviado, razao_social_inicial, razao_social,
                    endereco, numero_endereco, complemento_endereco, bairro, cidade,
                    cep, uf, cnpj, inscricao_estadual, inscricao_municipal, ativo
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
                "#,
            )
            .bind(c.id)
            .bind(c.codigo)
            .bind(&c.nome_abreviado)
            .bind(&c.razao_social_inicial)
            .bind(&c.razao_social)
            .bind(&c.endereco)
            .bind(&c.numero_endereco)
            .bind(&c.complemento_endereco)
            .bind(&c.bairro)
            .bind(&c.cidade)
            .bind(&c.cep)
            .bind(&c.uf)
            .bind(&c.cnpj)
            .bind(&c.inscricao_estadual)
            .bind(&c.inscricao_municipal)
            .bind(c.ativo)
            .execute(&mut *tx)
            .await?;
            UpsertOutcome::Inserted
        };

        tx.commit().await?;
        Ok(outcome)
    }

    async fn upsert_employee(&mut self, e: &Employee) -> SyncResult<UpsertOutcome> {
        let mut tx = self.conn.begin().await?;

        let by_cpf = match e.cpf_key() {
            Some(cpf) => {
                sqlx::query_as::<_, ExistingEmployee>(
                    "SELECT id, cpf FROM funcionarios WHERE cpf = $1 AND cpf <> '' LIMIT 1",
                )
                .bind(cpf)
                .fetch_optional(&mut *tx)
                .await?
            }
            None => None,
        };

        let by_code = match (&by_cpf, e.codigo) {
            (None, Some(codigo)) => {
                sqlx::query_as::<_, ExistingEmployee>(
                    "SELECT id, cpf FROM funcionarios \
                     WHERE codigo = $1 AND codigo_empresa = $2 LIMIT 1",
                )
                .bind(codigo)
                .bind(e.codigo_empresa)
                .fetch_optional(&mut *tx)
                .await?
            }
            _ => None,
        };

        let matched = resolve_employee_match(e, by_cpf, by_code);
        warn_replaced_cpf(e, &matched);

        let outcome = match matched.existing_id() {
            Some(existing_id) => {
                bind_employee_columns(sqlx::query(EMPLOYEE_UPDATE.as_str()), e)
                    .bind(existing_id)
                    .execute(&mut *tx)
                    .await?;
                UpsertOutcome::Updated
            }
            None => {
                bind_employee_columns(sqlx::query(EMPLOYEE_INSERT.as_str()).bind(e.id), e)
                    .execute(&mut *tx)
                    .await?;
                UpsertOutcome::Inserted
            }
        };

        tx.commit().await?;
        Ok(outcome)
    }
}
