// src/models/delivery.rs

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

// =============================================================================
//  ENTREGADORES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DriverStatus {
    Ativo,
    Inativo,
    Bloqueado,
}

impl DriverStatus {
    fn from_wire(value: Option<&str>) -> Self {
        match value {
            Some("inativo") => DriverStatus::Inativo,
            Some("bloqueado") => DriverStatus::Bloqueado,
            Some("ativo") | None => DriverStatus::Ativo,
            Some(other) => {
                tracing::warn!("Status de entregador desconhecido '{}', assumindo ativo", other);
                DriverStatus::Ativo
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeliveryDriverRow {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub company_id: Option<Uuid>,
    pub company_name: Option<String>,
    pub phone: Option<String>,
    pub cpf: Option<String>,
    pub rg: Option<String>,
    pub status: Option<String>,
    pub observations: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryDriver {
    pub id: Uuid,
    pub name: String,
    pub company_id: Option<Uuid>,
    /// Nome da empresa gravado junto com o entregador.
    #[schema(example = "Correios")]
    pub company_name: String,
    pub phone: Option<String>,
    pub cpf: String,
    pub rg: String,
    pub status: DriverStatus,
    pub observations: Option<String>,
    pub created_at: Option<String>,
}

impl Record for DeliveryDriver {
    const COLLECTION: Collection = Collection::DeliveryDrivers;
    type Row = DeliveryDriverRow;

    fn from_row(row: DeliveryDriverRow) -> Self {
        Self {
            id: row.id.unwrap_or_default(),
            name: row.name.unwrap_or_default(),
            company_id: row.company_id,
            company_name: row.company_name.unwrap_or_default(),
            phone: row.phone,
            cpf: row.cpf.unwrap_or_default(),
            rg: row.rg.unwrap_or_default(),
            status: DriverStatus::from_wire(row.status.as_deref()),
            observations: row.observations,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DriverForm {
    #[validate(length(min = 2, message = "invalid_name"))]
    pub name: String,
    pub company_id: Option<Uuid>,
    pub phone: Option<String>,
    #[serde(default)]
    pub cpf: String,
    #[serde(default)]
    pub rg: String,
    pub status: DriverStatus,
    pub observations: Option<String>,
}

pub const UNKNOWN_COMPANY: &str = "N/A";

impl DriverForm {
    pub fn to_row(&self, company_name: &str) -> Result<Row, AppError> {
        encode_row(&json!({
            "name": self.name,
            "company_id": self.company_id,
            "company_name": company_name,
            "phone": self.phone,
            "cpf": self.cpf,
            "rg": self.rg,
            "status": self.status,
            "observations": self.observations,
        }))
    }
}

// =============================================================================
//  VISITAS
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeliveryVisitRow {
    pub id: Option<Uuid>,
    pub driver_id: Option<Uuid>,
    pub driver_name: Option<String>,
    pub company_name: Option<String>,
    pub package_count: Option<i64>,
    pub shift: Option<String>,
    pub observations: Option<String>,
    pub entry_time: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryVisit {
    pub id: Uuid,
    pub driver_id: Option<Uuid>,
    pub driver_name: String,
    pub company_name: String,
    #[schema(example = 3)]
    pub package_count: i64,
    pub shift: Option<String>,
    pub observations: String,
    // Ano com quatro dígitos, diferente das outras coleções.
    #[schema(example = "05/03/2025 07:05")]
    pub entry_time: String,
    pub created_at: Option<String>,
}

impl Record for DeliveryVisit {
    const COLLECTION: Collection = Collection::DeliveryVisits;
    type Row = DeliveryVisitRow;

    fn from_row(row: DeliveryVisitRow) -> Self {
        Self {
            id: row.id.unwrap_or_default(),
            driver_id: row.driver_id,
            driver_name: row.driver_name.unwrap_or_default(),
            company_name: row.company_name.unwrap_or_default(),
            package_count: row.package_count.unwrap_or_default(),
            shift: row.shift,
            observations: row.observations.unwrap_or_default(),
            entry_time: row.entry_time.unwrap_or_default(),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisitForm {
    pub driver_id: Uuid,
    #[validate(length(min = 2, message = "invalid_name"))]
    pub driver_name: String,
    #[serde(default)]
    pub company_name: String,
    #[validate(range(min = 0, message = "required"))]
    pub package_count: i64,
    pub shift: Option<String>,
    #[serde(default)]
    pub observations: String,
}

impl VisitForm {
    /// Campos comuns a criação e edição (a edição não mexe no horário de entrada).
    pub fn to_row(&self) -> Result<Row, AppError> {
        encode_row(&json!({
            "driver_id": self.driver_id,
            "driver_name": self.driver_name,
            "company_name": self.company_name,
            "package_count": self.package_count,
            "shift": self.shift,
            "observations": self.observations,
        }))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisitDaySummary {
    #[schema(example = "2025-03-05")]
    pub date: String,
    pub visits: usize,
    pub packages: i64,
}
