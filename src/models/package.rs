// src/models/package.rs

use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{code_tag, error::AppError},
    db::Row,
    models::collection::{encode_row, Collection, Record},
};

// --- ENUMS ---

/// Situação de encomendas e itens recebidos. Só anda para frente.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum PickupStatus {
    #[serde(rename = "Aguardando Retirada")]
    AwaitingPickup,
    #[serde(rename = "Retirada")]
    PickedUp,
}

impl PickupStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PickupStatus::AwaitingPickup => "Aguardando Retirada",
            PickupStatus::PickedUp => "Retirada",
        }
    }

    pub fn from_wire(value: Option<&str>) -> Self {
        match value {
            Some("Retirada") => PickupStatus::PickedUp,
            Some("Aguardando Retirada") | None => PickupStatus::AwaitingPickup,
            Some(other) => {
                tracing::warn!("Status de retirada desconhecido '{}', assumindo pendente", other);
                PickupStatus::AwaitingPickup
            }
        }
    }
}

// --- LINHA DO BACKEND ---

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PackageRow {
    pub id: Option<Uuid>,
    pub unit: Option<String>,
    pub block: Option<String>,
    pub recipient_name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub sender: Option<String>,
    pub tracking_code: Option<String>,
    pub withdrawal_code: Option<String>,
    pub received_at: Option<String>,
    pub status: Option<String>,
    pub description: Option<String>,
    pub observations: Option<String>,
    pub picked_up_by: Option<String>,
    pub picked_up_at: Option<String>,
    pub created_at: Option<String>,
}

// --- MODELO DE VISÃO ---

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub id: Uuid,
    #[schema(example = "101")]
    pub unit: String,
    #[schema(example = "A")]
    pub block: String,
    #[schema(example = "Maria da Silva")]
    pub recipient_name: String,
    #[serde(rename = "type")]
    #[schema(example = "Caixa")]
    pub kind: String,
    pub sender: Option<String>,
    pub tracking_code: Option<String>,
    #[schema(example = "1234")]
    pub withdrawal_code: String,
    #[schema(example = "05/03/25 07:05")]
    pub received_at: String,
    pub status: PickupStatus,
    pub description: Option<String>,
    pub observations: Option<String>,
    pub picked_up_by: Option<String>,
    pub picked_up_at: Option<String>,
    pub created_at: Option<String>,
}

impl Record for Package {
    const COLLECTION: Collection = Collection::Packages;
    type Row = PackageRow;

    fn from_row(row: PackageRow) -> Self {
        Self {
            id: row.id.unwrap_or_default(),
            unit: row.unit.unwrap_or_default(),
            block: row.block.unwrap_or_default(),
            recipient_name: row.recipient_name.unwrap_or_default(),
            kind: row.kind.unwrap_or_default(),
            sender: row.sender,
            tracking_code: row.tracking_code,
            withdrawal_code: row.withdrawal_code.unwrap_or_default(),
            received_at: row.received_at.unwrap_or_default(),
            status: PickupStatus::from_wire(row.status.as_deref()),
            description: row.description,
            observations: row.observations,
            picked_up_by: row.picked_up_by,
            picked_up_at: row.picked_up_at,
            created_at: row.created_at,
        }
    }
}

impl Package {
    /// Código interno embutido nas observações, quando houver.
    pub fn internal_code(&self) -> Option<String> {
        self.observations.as_deref().and_then(code_tag::extract_code)
    }

    /// Grupo de retirada em lote: bloco em maiúsculas, vazio vira "OUTROS".
    pub fn group_block(&self) -> String {
        group_block(&self.block)
    }
}

pub fn group_block(block: &str) -> String {
    if block.trim().is_empty() {
        "OUTROS".to_string()
    } else {
        block.to_uppercase()
    }
}

// --- PAYLOADS ---

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewPackage {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "101")]
    pub unit: String,
    #[schema(example = "A")]
    #[serde(default)]
    pub block: String,
    #[validate(length(min = 2, message = "invalid_name"))]
    #[schema(example = "Maria da Silva")]
    pub recipient_name: String,
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Caixa")]
    pub kind: String,
    pub sender: Option<String>,
    pub tracking_code: Option<String>,
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "1234")]
    pub withdrawal_code: String,
    /// Carimbo informado no formulário; vazio usa o horário atual.
    pub received_at: Option<String>,
    pub description: Option<String>,
    pub observations: Option<String>,
}

impl NewPackage {
    pub fn to_row(&self, received_at: &str) -> Result<Row, AppError> {
        encode_row(&json!({
            "unit": self.unit,
            "block": self.block,
            "recipient_name": self.recipient_name,
            "type": self.kind,
            "sender": self.sender,
            "tracking_code": self.tracking_code,
            "withdrawal_code": self.withdrawal_code,
            "received_at": received_at,
            "status": PickupStatus::AwaitingPickup,
            "description": self.description,
            "observations": self.observations,
        }))
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PickupPayload {
    /// Quem retirou.
    #[validate(length(min = 2, message = "invalid_name"))]
    #[schema(example = "João")]
    pub picked_up_by: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkPickupPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "101")]
    pub unit: String,
    #[schema(example = "A")]
    #[serde(default)]
    pub block: String,
    #[validate(length(min = 2, message = "invalid_name"))]
    #[schema(example = "João")]
    pub picked_up_by: String,
}

/// Linha de atualização da retirada (encomendas e itens recebidos).
pub fn pickup_row(picked_up_by: &str, picked_up_at: &str) -> Result<Row, AppError> {
    encode_row(&json!({
        "status": PickupStatus::PickedUp,
        "picked_up_by": picked_up_by,
        "picked_up_at": picked_up_at,
    }))
}

// --- AGREGADOS ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PickupStats {
    pub total: usize,
    pub pending: usize,
    pub picked_up: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnitGroup {
    pub unit: String,
    pub block: String,
    pub count: usize,
    pub items: Vec<Package>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlockGroup {
    pub block_name: String,
    pub total_in_block: usize,
    pub unit_groups: Vec<UnitGroup>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::collection::decode_rows;

    #[test]
    fn snake_case_rows_become_camel_case_views() {
        let rows = vec![json!({
            "id": "6f9619ff-8b86-d011-b42d-00cf4fc964ff",
            "unit": "101",
            "block": "A",
            "recipient_name": "Maria",
            "type": "Caixa",
            "withdrawal_code": "1234",
            "received_at": "05/03/25 07:05",
            "status": "Aguardando Retirada",
            "tracking_code": null
        })
        .as_object()
        .cloned()
        .unwrap()];

        let packages: Vec<Package> = decode_rows(rows).unwrap();
        let view = serde_json::to_value(&packages[0]).unwrap();
        assert_eq!(view["recipientName"], "Maria");
        assert_eq!(view["withdrawalCode"], "1234");
        assert_eq!(view["type"], "Caixa");
        assert_eq!(view["status"], "Aguardando Retirada");
        assert!(view["trackingCode"].is_null());
    }

    #[test]
    fn missing_fields_are_tolerated() {
        let rows = vec![json!({ "id": null, "status": "Extraviada" }).as_object().cloned().unwrap()];
        let packages: Vec<Package> = decode_rows(rows).unwrap();
        assert_eq!(packages[0].recipient_name, "");
        assert_eq!(packages[0].status, PickupStatus::AwaitingPickup);
    }

    #[test]
    fn empty_block_groups_as_outros() {
        assert_eq!(group_block(""), "OUTROS");
        assert_eq!(group_block("b"), "B");
    }

    #[test]
    fn new_package_is_written_as_pending() {
        let payload: NewPackage = serde_json::from_value(json!({
            "unit": "101", "block": "A", "recipientName": "Maria", "type": "Caixa",
            "withdrawalCode": "1234"
        }))
        .unwrap();
        let row = payload.to_row("05/03/25 07:05").unwrap();
        assert_eq!(row["status"], "Aguardando Retirada");
        assert_eq!(row["recipient_name"], "Maria");
        assert!(row.keys().all(|k| Collection::Packages.has_column(k)));
    }
}
