// src/models/occurrence.rs

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
pub struct OccurrenceRow {
    pub id: Option<Uuid>,
    pub outgoing_employee_name: Option<String>,
    pub incoming_employee_name: Option<String>,
    pub description: Option<String>,
    pub timestamp: Option<String>,
    pub created_at: Option<String>,
}

/// Passagem de turno.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    pub id: Uuid,
    #[schema(example = "Carlos Souza")]
    pub outgoing_employee_name: String,
    #[schema(example = "Ana Lima")]
    pub incoming_employee_name: String,
    pub description: String,
    // Texto pronto para exibição, não é um carimbo de máquina.
    #[schema(example = "5 de março de 2025 às 07:05")]
    pub timestamp: String,
    pub created_at: Option<String>,
}

impl Record for Occurrence {
    const COLLECTION: Collection = Collection::Occurrences;
    type Row = OccurrenceRow;

    fn from_row(row: OccurrenceRow) -> Self {
        Self {
            id: row.id.unwrap_or_default(),
            outgoing_employee_name: row.outgoing_employee_name.unwrap_or_default(),
            incoming_employee_name: row.incoming_employee_name.unwrap_or_default(),
            description: row.description.unwrap_or_default(),
            timestamp: row.timestamp.unwrap_or_default(),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewOccurrence {
    #[validate(length(min = 2, message = "invalid_name"))]
    pub outgoing_employee_name: String,
    #[validate(length(min = 2, message = "invalid_name"))]
    pub incoming_employee_name: String,
    #[validate(length(min = 1, message = "required"))]
    pub description: String,
}

impl NewOccurrence {
    pub fn to_row(&self, timestamp: &str) -> Result<Row, AppError> {
        encode_row(&json!({
            "outgoing_employee_name": self.outgoing_employee_name,
            "incoming_employee_name": self.incoming_employee_name,
            "description": self.description,
            "timestamp": timestamp,
        }))
    }
}
