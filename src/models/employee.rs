// src/models/employee.rs

use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::Row,
    models::collection::{encode_row, Collection, Record},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeStatus {
    Ativo,
    Inativo,
    Ferias,
}

impl EmployeeStatus {
    fn from_wire(value: Option<&str>) -> Self {
        match value {
            Some("inativo") => EmployeeStatus::Inativo,
            Some("ferias") => EmployeeStatus::Ferias,
            Some("ativo") | None => EmployeeStatus::Ativo,
            Some(other) => {
                tracing::warn!("Status de funcionário desconhecido '{}', assumindo ativo", other);
                EmployeeStatus::Ativo
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EmployeeRow {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub cpf: Option<String>,
    pub role: Option<String>,
    pub shift: Option<String>,
    pub status: Option<String>,
    pub entry_time: Option<String>,
    pub exit_time: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub admission_date: Option<String>,
    pub photo_url: Option<String>,
    pub observations: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    #[schema(example = "Carlos Souza")]
    pub name: String,
    pub cpf: String,
    #[schema(example = "Porteiro")]
    pub role: String,
    #[schema(example = "diurno")]
    pub shift: String,
    pub status: EmployeeStatus,
    #[schema(example = "07:00")]
    pub entry_time: Option<String>,
    #[schema(example = "19:00")]
    pub exit_time: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub admission_date: Option<String>,
    pub photo_url: Option<String>,
    pub observations: Option<String>,
    pub created_at: Option<String>,
}

impl Record for Employee {
    const COLLECTION: Collection = Collection::Employees;
    type Row = EmployeeRow;

    fn from_row(row: EmployeeRow) -> Self {
        Self {
            id: row.id.unwrap_or_default(),
            name: row.name.unwrap_or_default(),
            cpf: row.cpf.unwrap_or_default(),
            role: row.role.unwrap_or_default(),
            shift: row.shift.unwrap_or_default(),
            status: EmployeeStatus::from_wire(row.status.as_deref()),
            entry_time: row.entry_time,
            exit_time: row.exit_time,
            phone: row.phone,
            email: row.email,
            admission_date: row.admission_date,
            photo_url: row.photo_url,
            observations: row.observations,
            created_at: row.created_at,
        }
    }
}

/// Formulário de cadastro e edição.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeForm {
    #[validate(length(min = 2, message = "invalid_name"))]
    pub name: String,
    #[serde(default)]
    pub cpf: String,
    #[validate(length(min = 1, message = "required"))]
    pub role: String,
    #[validate(length(min = 1, message = "required"))]
    pub shift: String,
    pub status: EmployeeStatus,
    pub entry_time: Option<String>,
    pub exit_time: Option<String>,
    pub phone: Option<String>,
    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,
    pub admission_date: Option<String>,
    pub photo_url: Option<String>,
    pub observations: Option<String>,
}

impl EmployeeForm {
    pub fn to_row(&self) -> Result<Row, AppError> {
        encode_row(&json!({
            "name": self.name,
            "cpf": self.cpf,
            "role": self.role,
            "shift": self.shift,
            "status": self.status,
            "entry_time": self.entry_time,
            "exit_time": self.exit_time,
            "phone": self.phone,
            "email": self.email,
            "admission_date": self.admission_date,
            "photo_url": self.photo_url,
            "observations": self.observations,
        }))
    }
}
