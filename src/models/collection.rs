// src/models/collection.rs

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{common::error::AppError, db::gateway::Row};

// --- ENUMS ---

/// As onze coleções que o painel mantém em memória.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Residents,
    Packages,
    Companies,
    Employees,
    Occurrences,
    ReceivedItems,
    Materials,
    Visitors,
    TimeRecords,
    DeliveryDrivers,
    DeliveryVisits,
}

/// Ordenação padrão da leitura de uma coleção.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ordering {
    /// Cadastros: ordem natural do backend.
    Unordered,
    /// Logs transacionais: mais recentes primeiro.
    CreatedAtDesc,
}

/// Descritor de uma coleção no backend remoto.
#[derive(Debug)]
pub struct CollectionDescriptor {
    pub table: &'static str,
    pub ordering: Ordering,
    // Colunas graváveis. `id` e `created_at` são gerados pelo backend.
    pub columns: &'static [&'static str],
}

// =============================================================================
//  TABELA DE MAPEAMENTO (identificador -> tabela, ordenação, colunas)
// =============================================================================

static RESIDENTS: CollectionDescriptor = CollectionDescriptor {
    table: "residents",
    ordering: Ordering::Unordered,
    columns: &["name", "unit", "block", "phone"],
};

static PACKAGES: CollectionDescriptor = CollectionDescriptor {
    table: "packages",
    ordering: Ordering::CreatedAtDesc,
    columns: &[
        "unit", "block", "recipient_name", "type", "sender", "tracking_code",
        "withdrawal_code", "received_at", "status", "description", "observations",
        "picked_up_by", "picked_up_at",
    ],
};

static COMPANIES: CollectionDescriptor = CollectionDescriptor {
    table: "companies",
    ordering: Ordering::Unordered,
    columns: &["name", "cnpj", "phone"],
};

static EMPLOYEES: CollectionDescriptor = CollectionDescriptor {
    table: "employees",
    ordering: Ordering::Unordered,
    columns: &[
        "name", "cpf", "role", "shift", "status", "entry_time", "exit_time", "phone",
        "email", "admission_date", "photo_url", "observations",
    ],
};

static OCCURRENCES: CollectionDescriptor = CollectionDescriptor {
    table: "occurrences",
    ordering: Ordering::CreatedAtDesc,
    columns: &["outgoing_employee_name", "incoming_employee_name", "description", "timestamp"],
};

static RECEIVED_ITEMS: CollectionDescriptor = CollectionDescriptor {
    table: "received_items",
    ordering: Ordering::CreatedAtDesc,
    // Não existe coluna received_code: o código vai dentro de observations.
    columns: &[
        "operation_type", "unit", "block", "recipient_name", "resident_id", "left_by",
        "document", "description", "shift", "observations", "received_at", "status",
        "picked_up_by", "picked_up_at",
    ],
};

static MATERIALS: CollectionDescriptor = CollectionDescriptor {
    table: "borrowed_materials",
    ordering: Ordering::CreatedAtDesc,
    columns: &[
        "material_name", "borrower_type", "borrower_name", "unit", "block", "document",
        "phone", "loan_date", "return_date", "status", "observations",
    ],
};

static VISITORS: CollectionDescriptor = CollectionDescriptor {
    table: "visitors",
    ordering: Ordering::CreatedAtDesc,
    columns: &[
        "name", "document", "phone", "unit", "block", "resident_name", "resident_id",
        "entry_time", "exit_time", "status", "observations",
    ],
};

static TIME_RECORDS: CollectionDescriptor = CollectionDescriptor {
    table: "time_records",
    ordering: Ordering::CreatedAtDesc,
    columns: &[
        "employee_id", "employee_name", "date", "shift", "entry_time", "exit_time", "type",
        "observations",
    ],
};

static DELIVERY_DRIVERS: CollectionDescriptor = CollectionDescriptor {
    table: "delivery_drivers",
    ordering: Ordering::Unordered,
    columns: &[
        "name", "company_id", "company_name", "phone", "cpf", "rg", "status", "observations",
    ],
};

static DELIVERY_VISITS: CollectionDescriptor = CollectionDescriptor {
    table: "delivery_visits",
    ordering: Ordering::CreatedAtDesc,
    columns: &[
        "driver_id", "driver_name", "company_name", "package_count", "shift", "observations",
        "entry_time",
    ],
};

impl Collection {
    pub const ALL: [Collection; 11] = [
        Collection::Residents,
        Collection::Packages,
        Collection::Companies,
        Collection::Employees,
        Collection::Occurrences,
        Collection::ReceivedItems,
        Collection::Materials,
        Collection::Visitors,
        Collection::TimeRecords,
        Collection::DeliveryDrivers,
        Collection::DeliveryVisits,
    ];

    pub fn descriptor(self) -> &'static CollectionDescriptor {
        match self {
            Collection::Residents => &RESIDENTS,
            Collection::Packages => &PACKAGES,
            Collection::Companies => &COMPANIES,
            Collection::Employees => &EMPLOYEES,
            Collection::Occurrences => &OCCURRENCES,
            Collection::ReceivedItems => &RECEIVED_ITEMS,
            Collection::Materials => &MATERIALS,
            Collection::Visitors => &VISITORS,
            Collection::TimeRecords => &TIME_RECORDS,
            Collection::DeliveryDrivers => &DELIVERY_DRIVERS,
            Collection::DeliveryVisits => &DELIVERY_VISITS,
        }
    }

    pub fn table(self) -> &'static str {
        self.descriptor().table
    }

    /// Posição fixa usada para indexar contadores por coleção.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn has_column(self, column: &str) -> bool {
        self.descriptor().columns.contains(&column)
    }
}

/// Escopo de atualização: uma coleção ou o curinga `all`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum Scope {
    All(AllScope),
    One(Collection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AllScope {
    All,
}

impl Scope {
    pub const ALL: Scope = Scope::All(AllScope::All);

    /// Resolve uma lista de escopos nas coleções distintas a buscar,
    /// sempre na ordem da tabela de mapeamento.
    pub fn resolve(scopes: &[Scope]) -> Vec<Collection> {
        if scopes.iter().any(|s| matches!(s, Scope::All(_))) {
            return Collection::ALL.to_vec();
        }
        Collection::ALL
            .into_iter()
            .filter(|c| scopes.contains(&Scope::One(*c)))
            .collect()
    }
}

impl From<Collection> for Scope {
    fn from(collection: Collection) -> Self {
        Scope::One(collection)
    }
}

// --- TRADUTORES ---

/// Um modelo de visão com a sua linha do backend.
/// A leitura nunca falha por campos ausentes ou nulos.
pub trait Record: Sized + Clone + Send + Sync + 'static {
    const COLLECTION: Collection;
    type Row: DeserializeOwned + Default;

    fn from_row(row: Self::Row) -> Self;
}

/// Converte as linhas cruas de uma coleção para o modelo de visão.
pub fn decode_rows<T: Record>(rows: Vec<Row>) -> Result<Vec<T>, AppError> {
    rows.into_iter()
        .map(|row| {
            serde_json::from_value::<T::Row>(serde_json::Value::Object(row))
                .map(T::from_row)
                .map_err(|source| AppError::RowDecode {
                    collection: T::COLLECTION.table(),
                    source,
                })
        })
        .collect()
}

/// Serializa um payload de escrita (já em snake_case) numa linha do gateway.
pub fn encode_row<P: Serialize>(payload: &P) -> Result<Row, AppError> {
    match serde_json::to_value(payload).map_err(|e| AppError::InternalServerError(e.into()))? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(AppError::InternalServerError(anyhow::anyhow!(
            "payload não é um objeto: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_scope_expands_to_every_collection() {
        let resolved = Scope::resolve(&[Scope::ALL, Scope::One(Collection::Packages)]);
        assert_eq!(resolved, Collection::ALL.to_vec());
    }

    #[test]
    fn scope_list_is_deduplicated_and_kept_in_table_order() {
        let resolved = Scope::resolve(&[
            Collection::DeliveryVisits.into(),
            Collection::DeliveryDrivers.into(),
            Collection::DeliveryVisits.into(),
        ]);
        assert_eq!(resolved, vec![Collection::DeliveryDrivers, Collection::DeliveryVisits]);
    }

    #[test]
    fn scopes_parse_from_wire_names() {
        let scopes: Vec<Scope> =
            serde_json::from_str(r#"["all", "received_items", "materials"]"#).unwrap();
        assert_eq!(
            scopes,
            vec![
                Scope::ALL,
                Scope::One(Collection::ReceivedItems),
                Scope::One(Collection::Materials)
            ]
        );
    }

    #[test]
    fn materials_live_in_the_borrowed_materials_table() {
        assert_eq!(Collection::Materials.table(), "borrowed_materials");
        assert_eq!(Collection::Materials.descriptor().ordering, Ordering::CreatedAtDesc);
        assert_eq!(Collection::Residents.descriptor().ordering, Ordering::Unordered);
    }

    #[test]
    fn received_items_have_no_received_code_column() {
        assert!(!Collection::ReceivedItems.has_column("received_code"));
        assert!(Collection::ReceivedItems.has_column("observations"));
    }

    #[test]
    fn indexes_are_dense() {
        for (i, c) in Collection::ALL.iter().enumerate() {
            assert_eq!(c.index(), i);
        }
    }
}
