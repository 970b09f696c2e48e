// src/models/resident.rs

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

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResidentRow {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub unit: Option<String>,
    pub block: Option<String>,
    pub phone: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Resident {
    pub id: Uuid,
    #[schema(example = "Maria da Silva")]
    pub name: String,
    #[schema(example = "101")]
    pub unit: String,
    #[schema(example = "A")]
    pub block: String,
    pub phone: Option<String>,
    pub created_at: Option<String>,
}

impl Record for Resident {
    const COLLECTION: Collection = Collection::Residents;
    type Row = ResidentRow;

    fn from_row(row: ResidentRow) -> Self {
        Self {
            id: row.id.unwrap_or_default(),
            name: row.name.unwrap_or_default(),
            unit: row.unit.unwrap_or_default(),
            block: row.block.unwrap_or_default(),
            phone: row.phone,
            created_at: row.created_at,
        }
    }
}

// Cadastro de morador (formulário)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewResident {
    #[validate(length(min = 2, message = "invalid_name"))]
    #[schema(example = "Maria da Silva")]
    pub name: String,
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "101")]
    pub unit: String,
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "A")]
    pub block: String,
    pub phone: Option<String>,
}

impl NewResident {
    pub fn to_row(&self) -> Result<Row, AppError> {
        encode_row(&json!({
            "name": self.name,
            "unit": self.unit,
            "block": self.block,
            "phone": self.phone,
        }))
    }
}
