// src/models/visitor.rs

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
#[serde(rename_all = "snake_case")]
pub enum VisitorStatus {
    NoCondominio,
    Saiu,
}

impl VisitorStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            VisitorStatus::NoCondominio => "no_condominio",
            VisitorStatus::Saiu => "saiu",
        }
    }

    fn from_wire(value: Option<&str>) -> Self {
        match value {
            Some("saiu") => VisitorStatus::Saiu,
            Some("no_condominio") | None => VisitorStatus::NoCondominio,
            Some(other) => {
                tracing::warn!("Status de visitante desconhecido '{}', assumindo no condomínio", other);
                VisitorStatus::NoCondominio
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VisitorRow {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub document: Option<String>,
    pub phone: Option<String>,
    pub unit: Option<String>,
    pub block: Option<String>,
    pub resident_name: Option<String>,
    pub resident_id: Option<Uuid>,
    pub entry_time: Option<String>,
    pub exit_time: Option<String>,
    pub status: Option<String>,
    pub observations: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Visitor {
    pub id: Uuid,
    pub name: String,
    pub document: Option<String>,
    pub phone: Option<String>,
    pub unit: String,
    pub block: Option<String>,
    pub resident_name: Option<String>,
    pub resident_id: Option<Uuid>,
    #[schema(example = "05/03/25 07:05")]
    pub entry_time: String,
    pub exit_time: Option<String>,
    pub status: VisitorStatus,
    pub observations: Option<String>,
    pub created_at: Option<String>,
}

impl Record for Visitor {
    const COLLECTION: Collection = Collection::Visitors;
    type Row = VisitorRow;

    fn from_row(row: VisitorRow) -> Self {
        Self {
            id: row.id.unwrap_or_default(),
            name: row.name.unwrap_or_default(),
            document: row.document,
            phone: row.phone,
            unit: row.unit.unwrap_or_default(),
            block: row.block,
            resident_name: row.resident_name,
            resident_id: row.resident_id,
            entry_time: row.entry_time.unwrap_or_default(),
            exit_time: row.exit_time,
            status: VisitorStatus::from_wire(row.status.as_deref()),
            observations: row.observations,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewVisitor {
    #[validate(length(min = 2, message = "invalid_name"))]
    pub name: String,
    pub document: Option<String>,
    pub phone: Option<String>,
    #[validate(length(min = 1, message = "required"))]
    pub unit: String,
    pub block: Option<String>,
    pub resident_name: Option<String>,
    pub resident_id: Option<Uuid>,
    pub observations: Option<String>,
}

impl NewVisitor {
    pub fn to_row(&self, entry_time: &str) -> Result<Row, AppError> {
        encode_row(&json!({
            "name": self.name,
            "document": self.document,
            "phone": self.phone,
            "unit": self.unit,
            "block": self.block,
            "resident_name": self.resident_name,
            "resident_id": self.resident_id,
            "entry_time": entry_time,
            "status": VisitorStatus::NoCondominio,
            "observations": self.observations,
        }))
    }
}

pub fn exit_row(exit_time: &str) -> Result<Row, AppError> {
    encode_row(&json!({
        "status": VisitorStatus::Saiu,
        "exit_time": exit_time,
    }))
}
