//! Employee export item → [`Employee`]

use serde_json::Value;
use shared::{CompanyRef, Employee};
use uuid::Uuid;

use super::coerce::{date, int, kind, text, yes_flag};
use crate::error::MappingError;

/// Map one employee item of `company`'s export
///
/// No status filtering here: the export query already selected which
/// employees come back, and `SITUACAO` is stored as-is.
pub fn map_employee(item: &Value, company: &CompanyRef) -> Result<Employee, MappingError> {
    let item = item
        .as_object()
        .ok_or_else(|| MappingError::NotAnObject(kind(item)))?;

    Ok(Employee {
        id: Uuid::new_v4(),
        empresa_id: company.id,
        codigo_empresa: company.codigo,
        nome_empresa: text(item, "NOMEEMPRESA")?,
        codigo: int(item, "CODIGO"),
        nome: text(item, "NOME")?,
        codigo_unidade: text(item, "CODIGOUNIDADE")?,
        nome_unidade: text(item, "NOMEUNIDADE")?,
        codigo_setor: text(item, "CODIGOSETOR")?,
        nome_setor: text(item, "NOMESETOR")?,
        codigo_cargo: text(item, "CODIGOCARGO")?,
        nome_cargo: text(item, "NOMECARGO")?,
        cbo_cargo: text(item, "CBOCARGO")?,
        ccusto: text(item, "CCUSTO")?,
        nome_centro_custo: text(item, "NOMECENTROCUSTO")?,
        matricula_funcionario: text(item, "MATRICULAFUNCIONARIO")?,
        cpf: text(item, "CPF")?,
        rg: text(item, "RG")?,
        uf_rg: text(item, "UFRG")?,
        orgao_emissor_rg: text(item, "ORGAOEMISSORRG")?,
        situacao: text(item, "SITUACAO")?,
        sexo: int(item, "SEXO"),
        pis: text(item, "PIS")?,
        ctps: text(item, "CTPS")?,
        serie_ctps: text(item, "SERIECTPS")?,
        estado_civil: int(item, "ESTADOCIVIL"),
        // upstream spelling
        tipo_contratacao: int(item, "TIPOCONTATACAO"),
        data_nascimento: date(item, "DATA_NASCIMENTO"),
        data_admissao: date(item, "DATA_ADMISSAO"),
        data_demissao: date(item, "DATA_DEMISSAO"),
        endereco: text(item, "ENDERECO")?,
        numero_endereco: text(item, "NUMERO_ENDERECO")?,
        bairro: text(item, "BAIRRO")?,
        cidade: text(item, "CIDADE")?,
        uf: text(item, "UF")?,
        cep: text(item, "CEP")?,
        telefone_residencial: text(item, "TELEFONERESIDENCIAL")?,
        telefone_celular: text(item, "TELEFONECELULAR")?,
        email: text(item, "EMAIL")?,
        deficiente: yes_flag(item, "DEFICIENTE"),
        deficiencia: text(item, "DEFICIENCIA")?,
        nm_mae_funcionario: text(item, "NM_MAE_FUNCIONARIO")?,
        data_ult_alteracao: date(item, "DATAULTALTERACAO"),
        matricula_rh: text(item, "MATRICULARH")?,
        cor: int(item, "COR"),
        escolaridade: int(item, "ESCOLARIDADE"),
        naturalidade: text(item, "NATURALIDADE")?,
        ramal: text(item, "RAMAL")?,
        regime_revezamento: int(item, "REGIMEREVEZAMENTO"),
        regime_trabalho: text(item, "REGIMETRABALHO")?,
        tel_comercial: text(item, "TELCOMERCIAL")?,
        turno_trabalho: int(item, "TURNOTRABALHO"),
        rh_unidade: text(item, "RHUNIDADE")?,
        rh_setor: text(item, "RHSETOR")?,
        rh_cargo: text(item, "RHCARGO")?,
        rh_centro_custo_unidade: text(item, "RHCENTROCUSTOUNIDADE")?,
    })
}
