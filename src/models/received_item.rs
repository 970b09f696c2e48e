// src/models/received_item.rs

use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{code_tag, error::AppError},
    db::Row,
    models::{
        collection::{encode_row, Collection, Record},
        package::PickupStatus,
    },
};

/// Sentido da entrega.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    /// Alguém de fora deixou algo para o morador.
    ExternoParaMorador,
    /// O morador deixou algo para alguém de fora retirar.
    MoradorParaExterno,
}

impl OperationType {
    fn from_wire(value: Option<&str>) -> Self {
        match value {
            Some("morador_para_externo") => OperationType::MoradorParaExterno,
            _ => OperationType::ExternoParaMorador,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReceivedItemRow {
    pub id: Option<Uuid>,
    pub operation_type: Option<String>,
    pub unit: Option<String>,
    pub block: Option<String>,
    pub recipient_name: Option<String>,
    pub resident_id: Option<Uuid>,
    pub left_by: Option<String>,
    pub document: Option<String>,
    pub description: Option<String>,
    pub shift: Option<String>,
    pub observations: Option<String>,
    pub received_at: Option<String>,
    pub status: Option<String>,
    pub picked_up_by: Option<String>,
    pub picked_up_at: Option<String>,
    // Só aparece se o backend um dia ganhar a coluna.
    pub received_code: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedItem {
    pub id: Uuid,
    pub operation_type: OperationType,
    pub unit: String,
    pub block: String,
    pub recipient_name: String,
    pub resident_id: Option<Uuid>,
    pub left_by: String,
    pub document: Option<String>,
    pub description: String,
    pub shift: Option<String>,
    pub observations: Option<String>,
    pub received_at: String,
    pub status: PickupStatus,
    pub picked_up_by: Option<String>,
    pub picked_up_at: Option<String>,
    #[schema(example = "4821")]
    pub received_code: Option<String>,
    pub created_at: Option<String>,
}

impl Record for ReceivedItem {
    const COLLECTION: Collection = Collection::ReceivedItems;
    type Row = ReceivedItemRow;

    fn from_row(row: ReceivedItemRow) -> Self {
        let received_code = row
            .observations
            .as_deref()
            .and_then(code_tag::extract_code)
            .or(row.received_code);

        Self {
            id: row.id.unwrap_or_default(),
            operation_type: OperationType::from_wire(row.operation_type.as_deref()),
            unit: row.unit.unwrap_or_default(),
            block: row.block.unwrap_or_default(),
            recipient_name: row.recipient_name.unwrap_or_default(),
            resident_id: row.resident_id,
            left_by: row.left_by.unwrap_or_default(),
            document: row.document,
            description: row.description.unwrap_or_default(),
            shift: row.shift,
            observations: row.observations,
            received_at: row.received_at.unwrap_or_default(),
            status: PickupStatus::from_wire(row.status.as_deref()),
            picked_up_by: row.picked_up_by,
            picked_up_at: row.picked_up_at,
            received_code,
            created_at: row.created_at,
        }
    }
}

impl ReceivedItem {
    /// Observações para exibição, sem o marcador do código.
    pub fn display_observations(&self) -> String {
        self.observations
            .as_deref()
            .map(code_tag::strip_code)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewReceivedItem {
    pub operation_type: OperationType,
    #[validate(length(min = 1, message = "required"))]
    pub unit: String,
    #[serde(default)]
    pub block: String,
    #[validate(length(min = 2, message = "invalid_name"))]
    pub recipient_name: String,
    pub resident_id: Option<Uuid>,
    #[validate(length(min = 2, message = "invalid_name"))]
    #[schema(example = "Pedro (irmão)")]
    pub left_by: String,
    pub document: Option<String>,
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Chave do apartamento")]
    pub description: String,
    pub shift: Option<String>,
    pub observations: Option<String>,
    #[validate(length(min = 1, message = "required"), custom(function = "validate_digits"))]
    #[schema(example = "4821")]
    pub received_code: String,
}

fn validate_digits(code: &str) -> Result<(), validator::ValidationError> {
    if code.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("digits");
        err.message = Some("invalid_code".into());
        Err(err)
    }
}

impl NewReceivedItem {
    // O código não tem coluna própria: vai para observations.
    pub fn to_row(&self, received_at: &str) -> Result<Row, AppError> {
        let observations = code_tag::embed_code(self.observations.as_deref(), &self.received_code);
        encode_row(&json!({
            "operation_type": self.operation_type,
            "unit": self.unit,
            "block": self.block,
            "recipient_name": self.recipient_name,
            "resident_id": self.resident_id,
            "left_by": self.left_by,
            "document": self.document,
            "description": self.description,
            "shift": self.shift,
            "observations": observations,
            "received_at": received_at,
            "status": PickupStatus::AwaitingPickup,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::collection::decode_rows;

    fn form(observations: Option<&str>) -> NewReceivedItem {
        NewReceivedItem {
            operation_type: OperationType::MoradorParaExterno,
            unit: "202".into(),
            block: "B".into(),
            recipient_name: "Ana".into(),
            resident_id: None,
            left_by: "Carlos".into(),
            document: None,
            description: "Envelope".into(),
            shift: Some("diurno".into()),
            observations: observations.map(String::from),
            received_code: "4821".into(),
        }
    }

    #[test]
    fn received_code_travels_inside_observations() {
        let mut row = form(Some("Entregar à tarde")).to_row("05/03/25 07:05").unwrap();
        assert!(!row.contains_key("received_code"));
        assert_eq!(row["observations"], "Entregar à tarde | Cód: 4821");

        row.insert("id".into(), json!(Uuid::new_v4()));
        let items: Vec<ReceivedItem> = decode_rows(vec![row]).unwrap();
        assert_eq!(items[0].received_code.as_deref(), Some("4821"));
        assert_eq!(items[0].display_observations(), "Entregar à tarde");
        assert_eq!(items[0].operation_type, OperationType::MoradorParaExterno);
    }

    #[test]
    fn non_digit_codes_are_rejected() {
        let mut payload = form(None);
        payload.received_code = "12a".into();
        assert!(payload.validate().is_err());
    }
}
