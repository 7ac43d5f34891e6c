//! Test fixtures

use serde_json::{Value, json};
use shared::{Company, CompanyRef, Employee};
use uuid::Uuid;

pub(crate) fn company_ref(codigo: i64) -> CompanyRef {
    CompanyRef {
        id: Uuid::from_u128(codigo as u128),
        codigo,
    }
}

pub(crate) fn employee_item(codigo: i64, cpf: &str) -> Value {
    json!({"CODIGO": codigo.to_string(), "CPF": cpf, "NOME": format!("Funcionario {codigo}")})
}

/// Employee of company 55
pub(crate) fn employee(codigo: i64, cpf: &str) -> Employee {
    crate::mapper::map_employee(&employee_item(codigo, cpf), &company_ref(55)).unwrap()
}

pub(crate) fn company(codigo: i64) -> Company {
    let item = json!({
        "CODIGO": codigo.to_string(),
        "ATIVO": "1",
        "RAZAOSOCIAL": format!("Empresa {codigo}"),
    });
    crate::mapper::map_company(&item).unwrap().unwrap()
}
