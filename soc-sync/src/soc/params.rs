//! `parametro` query blob of the `exportadados` endpoint
//!
//! The web service takes a single query parameter holding a compact JSON
//! object. Field order follows the SOC documentation.

use serde::Serialize;

use crate::config::ExportCredentials;

/// Output format requested from the export
pub const OUTPUT_JSON: &str = "json";

const INCLUDED: &str = "Sim";
const EXCLUDED: &str = "";

/// Company export query
#[derive(Debug, Serialize)]
pub struct CompanyQuery<'a> {
    pub empresa: &'a str,
    pub codigo: &'a str,
    pub chave: &'a str,
    #[serde(rename = "tipoSaida")]
    pub tipo_saida: &'a str,
}

impl<'a> CompanyQuery<'a> {
    pub fn new(credentials: &'a ExportCredentials) -> Self {
        Self {
            empresa: credentials.empresa.as_deref().unwrap_or_default(),
            codigo: &credentials.codigo,
            chave: &credentials.chave,
            tipo_saida: OUTPUT_JSON,
        }
    }
}

/// Which employment statuses the employee export returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusFilter {
    pub active: bool,
    pub inactive: bool,
    pub on_leave: bool,
    pub pending: bool,
    pub vacation: bool,
}

impl Default for StatusFilter {
    /// Everyone still employed
    fn default() -> Self {
        Self {
            active: true,
            inactive: false,
            on_leave: true,
            pending: true,
            vacation: true,
        }
    }
}

impl StatusFilter {
    pub fn including_inactive(include_inactive: bool) -> Self {
        Self {
            inactive: include_inactive,
            ..Self::default()
        }
    }
}

fn flag(included: bool) -> &'static str {
    if included { INCLUDED } else { EXCLUDED }
}

/// Employee export query for one company
#[derive(Debug, Serialize)]
pub struct EmployeeQuery<'a> {
    pub empresa: String,
    pub codigo: &'a str,
    pub chave: &'a str,
    #[serde(rename = "tipoSaida")]
    pub tipo_saida: &'a str,
    pub ativo: &'static str,
    pub inativo: &'static str,
    pub afastado: &'static str,
    pub pendente: &'static str,
    pub ferias: &'static str,
}

impl<'a> EmployeeQuery<'a> {
    pub fn new(
        credentials: &'a ExportCredentials,
        company_code: i64,
        filter: StatusFilter,
    ) -> Self {
        Self {
            empresa: company_code.to_string(),
            codigo: &credentials.codigo,
            chave: &credentials.chave,
            tipo_saida: OUTPUT_JSON,
            ativo: flag(filter.active),
            inativo: flag(filter.inactive),
            afastado: flag(filter.on_leave),
            pendente: flag(filter.pending),
            ferias: flag(filter.vacation),
        }
    }
}
