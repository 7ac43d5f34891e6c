//! Company Model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Company row (`empresas`)
///
/// `codigo` is the natural key used for reconciliation; `id` is generated
/// locally and never used to match upstream records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: Uuid,
    pub codigo: i64,
    pub nome_abreviado: String,
    pub razao_social_inicial: String,
    pub razao_social: String,
    pub endereco: String,
    pub numero_endereco: String,
    pub complemento_endereco: String,
    pub bairro: String,
    pub cidade: String,
    pub cep: String,
    pub uf: String,
    pub cnpj: String,
    pub inscricao_estadual: String,
    pub inscricao_municipal: String,
    pub ativo: bool,
    /// Owner assigned later by the portal, never written by the import
    pub usuario_id: Option<Uuid>,
}

/// Company reference read back from the store
///
/// Unit of iteration for the employee import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CompanyRef {
    pub id: Uuid,
    pub codigo: i64,
}
