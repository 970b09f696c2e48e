// src/models/company.rs

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
pub struct CompanyRow {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub cnpj: Option<String>,
    pub phone: Option<String>,
    pub created_at: Option<String>,
}

/// Transportadora ou loja de onde vêm os entregadores.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: Uuid,
    #[schema(example = "Correios")]
    pub name: String,
    pub cnpj: Option<String>,
    pub phone: Option<String>,
    pub created_at: Option<String>,
}

impl Record for Company {
    const COLLECTION: Collection = Collection::Companies;
    type Row = CompanyRow;

    fn from_row(row: CompanyRow) -> Self {
        Self {
            id: row.id.unwrap_or_default(),
            name: row.name.unwrap_or_default(),
            cnpj: row.cnpj,
            phone: row.phone,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewCompany {
    #[validate(length(min = 2, message = "invalid_name"))]
    #[schema(example = "Correios")]
    pub name: String,
    pub cnpj: Option<String>,
    pub phone: Option<String>,
}

impl NewCompany {
    pub fn to_row(&self) -> Result<Row, AppError> {
        encode_row(&json!({
            "name": self.name,
            "cnpj": self.cnpj,
            "phone": self.phone,
        }))
    }
}
