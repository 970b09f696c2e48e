// src/models/material.rs

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
pub enum LoanStatus {
    Emprestado,
    Devolvido,
}

impl LoanStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            LoanStatus::Emprestado => "Emprestado",
            LoanStatus::Devolvido => "Devolvido",
        }
    }

    fn from_wire(value: Option<&str>) -> Self {
        match value {
            Some("Devolvido") => LoanStatus::Devolvido,
            Some("Emprestado") | None => LoanStatus::Emprestado,
            Some(other) => {
                tracing::warn!("Status de empréstimo desconhecido '{}', assumindo emprestado", other);
                LoanStatus::Emprestado
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MaterialRow {
    pub id: Option<Uuid>,
    pub material_name: Option<String>,
    pub borrower_type: Option<String>,
    pub borrower_name: Option<String>,
    pub unit: Option<String>,
    pub block: Option<String>,
    pub document: Option<String>,
    pub phone: Option<String>,
    pub loan_date: Option<String>,
    pub return_date: Option<String>,
    pub status: Option<String>,
    pub observations: Option<String>,
    pub created_at: Option<String>,
}

/// Material emprestado (escada, carrinho, furadeira...).
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowedMaterial {
    pub id: Uuid,
    #[schema(example = "Carrinho de compras")]
    pub material_name: String,
    #[schema(example = "morador")]
    pub borrower_type: String,
    pub borrower_name: String,
    pub unit: Option<String>,
    pub block: Option<String>,
    pub document: Option<String>,
    pub phone: Option<String>,
    #[schema(example = "05/03/25 07:05")]
    pub loan_date: String,
    pub return_date: Option<String>,
    pub status: LoanStatus,
    pub observations: Option<String>,
    pub created_at: Option<String>,
}

impl Record for BorrowedMaterial {
    const COLLECTION: Collection = Collection::Materials;
    type Row = MaterialRow;

    fn from_row(row: MaterialRow) -> Self {
        Self {
            id: row.id.unwrap_or_default(),
            material_name: row.material_name.unwrap_or_default(),
            borrower_type: row.borrower_type.unwrap_or_default(),
            borrower_name: row.borrower_name.unwrap_or_default(),
            unit: row.unit,
            block: row.block,
            document: row.document,
            phone: row.phone,
            loan_date: row.loan_date.unwrap_or_default(),
            return_date: row.return_date,
            status: LoanStatus::from_wire(row.status.as_deref()),
            observations: row.observations,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewLoan {
    #[validate(length(min = 2, message = "required"))]
    pub material_name: String,
    #[validate(length(min = 1, message = "required"))]
    pub borrower_type: String,
    #[validate(length(min = 2, message = "invalid_name"))]
    pub borrower_name: String,
    pub unit: Option<String>,
    pub block: Option<String>,
    pub document: Option<String>,
    pub phone: Option<String>,
    pub observations: Option<String>,
}

impl NewLoan {
    pub fn to_row(&self, loan_date: &str) -> Result<Row, AppError> {
        encode_row(&json!({
            "material_name": self.material_name,
            "borrower_type": self.borrower_type,
            "borrower_name": self.borrower_name,
            "unit": self.unit,
            "block": self.block,
            "document": self.document,
            "phone": self.phone,
            "loan_date": loan_date,
            "status": LoanStatus::Emprestado,
            "observations": self.observations,
        }))
    }
}

pub fn return_row(return_date: &str) -> Result<Row, AppError> {
    encode_row(&json!({
        "status": LoanStatus::Devolvido,
        "return_date": return_date,
    }))
}
