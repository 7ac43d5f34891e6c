//! Employee Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Employee row (`funcionarios`)
///
/// Reconciled by `cpf` when non-empty, otherwise by
/// (`codigo`, `codigo_empresa`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: Uuid,
    pub empresa_id: Uuid,
    /// Denormalized company code, same value as the referenced company's `codigo`
    pub codigo_empresa: i64,
    pub nome_empresa: String,
    pub codigo: Option<i64>,
    pub nome: String,
    pub codigo_unidade: String,
    pub nome_unidade: String,
    pub codigo_setor: String,
    pub nome_setor: String,
    pub codigo_cargo: String,
    pub nome_cargo: String,
    pub cbo_cargo: String,
    pub ccusto: String,
    pub nome_centro_custo: String,
    pub matricula_funcionario: String,
    pub cpf: String,
    pub rg: String,
    pub uf_rg: String,
    pub orgao_emissor_rg: String,
    pub situacao: String,
    /// 1 = M, 2 = F
    pub sexo: Option<i32>,
    pub pis: String,
    pub ctps: String,
    pub serie_ctps: String,
    pub estado_civil: Option<i32>,
    pub tipo_contratacao: Option<i32>,
    pub data_nascimento: Option<NaiveDate>,
    pub data_admissao: Option<NaiveDate>,
    pub data_demissao: Option<NaiveDate>,
    pub endereco: String,
    pub numero_endereco: String,
    pub bairro: String,
    pub cidade: String,
    pub uf: String,
    pub cep: String,
    pub telefone_residencial: String,
    pub telefone_celular: String,
    pub email: String,
    pub deficiente: bool,
    pub deficiencia: String,
    pub nm_mae_funcionario: String,
    pub data_ult_alteracao: Option<NaiveDate>,
    pub matricula_rh: String,
    pub cor: Option<i32>,
    pub escolaridade: Option<i32>,
    pub naturalidade: String,
    pub ramal: String,
    pub regime_revezamento: Option<i32>,
    pub regime_trabalho: String,
    pub tel_comercial: String,
    pub turno_trabalho: Option<i32>,
    pub rh_unidade: String,
    pub rh_setor: String,
    pub rh_cargo: String,
    pub rh_centro_custo_unidade: String,
}

impl Employee {
    /// `cpf` when it can serve as a natural key
    pub fn cpf_key(&self) -> Option<&str> {
        (!self.cpf.is_empty()).then_some(self.cpf.as_str())
    }
}
