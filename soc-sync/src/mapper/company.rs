//! Company export item → [`Company`]

use serde_json::Value;
use shared::Company;
use uuid::Uuid;

use super::coerce::{RawItem, kind, text};
use crate::error::MappingError;

/// Only companies flagged `ATIVO = "1"` are imported
fn is_active(item: &RawItem) -> bool {
    match item.get("ATIVO") {
        Some(Value::String(s)) => s.trim() == "1",
        Some(Value::Number(n)) => n.as_i64() == Some(1),
        _ => false,
    }
}

/// Company code, the natural key: must be present and integral
fn company_code(item: &RawItem) -> Result<i64, MappingError> {
    let value = item.get("CODIGO");
    let code = match value {
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(Value::Number(n)) => n.as_i64(),
        _ => None,
    };
    code.ok_or_else(|| MappingError::InvalidCode {
        field: "CODIGO",
        value: value.map(Value::to_string).unwrap_or_default(),
    })
}

/// Map one company item
///
/// Returns `Ok(None)` for inactive companies.
pub fn map_company(item: &Value) -> Result<Option<Company>, MappingError> {
    let item = item
        .as_object()
        .ok_or_else(|| MappingError::NotAnObject(kind(item)))?;

    if !is_active(item) {
        return Ok(None);
    }

    Ok(Some(Company {
        id: Uuid::new_v4(),
        codigo: company_code(item)?,
        nome_abreviado: text(item, "NOMEABREVIADO")?,
        razao_social_inicial: text(item, "RAZAOSOCIALINICIAL")?,
        razao_social: text(item, "RAZAOSOCIAL")?,
        endereco: text(item, "ENDERECO")?,
        numero_endereco: text(item, "NUMEROENDERECO")?,
        complemento_endereco: text(item, "COMPLEMENTOENDERECO")?,
        bairro: text(item, "BAIRRO")?,
        cidade: text(item, "CIDADE")?,
        cep: text(item, "CEP")?,
        uf: text(item, "UF")?,
        cnpj: text(item, "CNPJ")?,
        inscricao_estadual: text(item, "INSCRICAOESTADUAL")?,
        inscricao_municipal: text(item, "INSCRICAOMUNICIPAL")?,
        ativo: true,
        usuario_id: None,
    }))
}
