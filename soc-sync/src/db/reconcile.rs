//! Insert-or-update decision for employees
//!
//! Shared by every store implementation so the matching rules live in
//! one place: `cpf` first, then (`codigo`, `codigo_empresa`).

use shared::Employee;
use uuid::Uuid;

/// Existing row found by a natural-key lookup
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ExistingEmployee {
    pub id: Uuid,
    pub cpf: Option<String>,
}

/// What to do with an incoming employee
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeeMatch {
    Insert,
    /// Row with the same non-empty cpf
    ByCpf { id: Uuid },
    /// Row with the same (`codigo`, `codigo_empresa`)
    ///
    /// `replaced_cpf` is set when the stored cpf is non-empty and differs
    /// from the incoming one; the update overwrites it.
    ByCode { id: Uuid, replaced_cpf: Option<String> },
}

impl EmployeeMatch {
    pub fn existing_id(&self) -> Option<Uuid> {
        match self {
            Self::Insert => None,
            Self::ByCpf { id } | Self::ByCode { id, .. } => Some(*id),
        }
    }
}

/// Decide between insert and update
///
/// `by_cpf` is the row matching the incoming non-empty cpf, `by_code` the
/// row matching (`codigo`, `codigo_empresa`). The cpf match wins when both
/// exist, even if they are different rows.
pub fn resolve_employee_match(
    incoming: &Employee,
    by_cpf: Option<ExistingEmployee>,
    by_code: Option<ExistingEmployee>,
) -> EmployeeMatch {
    if let Some(row) = by_cpf {
        return EmployeeMatch::ByCpf { id: row.id };
    }
    match by_code {
        Some(row) => {
            let replaced_cpf = row
                .cpf
                .filter(|stored| !stored.is_empty() && *stored != incoming.cpf);
            EmployeeMatch::ByCode {
                id: row.id,
                replaced_cpf,
            }
        }
        None => EmployeeMatch::Insert,
    }
}

/// Log the ambiguous overwrite case
pub fn warn_replaced_cpf(incoming: &Employee, matched: &EmployeeMatch) {
    if let EmployeeMatch::ByCode {
        id,
        replaced_cpf: Some(old_cpf),
    } = matched
    {
        tracing::warn!(
            employee_id = %id,
            company = incoming.codigo_empresa,
            codigo = ?incoming.codigo,
            old_cpf = %old_cpf,
            new_cpf = %incoming.cpf,
            "Employee matched by code has a different CPF, overwriting"
        );
    }
}
