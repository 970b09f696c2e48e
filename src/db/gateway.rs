// src/db/gateway.rs

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::models::collection::{Collection, Ordering};

/// Linha crua do backend: objeto plano em snake_case.
pub type Row = Map<String, Value>;

/// Id usado pelo "limpar tudo" (`id <> sentinela` casa com todas as linhas).
pub const SENTINEL_ID: Uuid = Uuid::nil();

/// Filtro por id aceito pelas escritas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdMatch {
    Eq(Uuid),
    In(Vec<Uuid>),
    Neq(Uuid),
}

impl IdMatch {
    pub fn matches(&self, id: Uuid) -> bool {
        match self {
            IdMatch::Eq(target) => id == *target,
            IdMatch::In(ids) => ids.contains(&id),
            IdMatch::Neq(target) => id != *target,
        }
    }
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Erro de banco de dados: {0}")]
    Database(#[from] sqlx::Error),

    // Equivalente ao PGRST204 do backend hospedado.
    #[error("A coluna '{column}' não existe em '{table}'")]
    UnknownColumn { table: &'static str, column: String },

    #[error("Linha inválida: {0}")]
    InvalidRow(String),

    #[error("Backend indisponível: {0}")]
    Unavailable(String),
}

/// Cliente genérico de coleções remotas.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn select(&self, collection: Collection, ordering: Ordering) -> Result<Vec<Row>, GatewayError>;

    async fn insert(&self, collection: Collection, row: Row) -> Result<(), GatewayError>;

    /// Retorna quantas linhas foram alteradas.
    async fn update(&self, collection: Collection, row: Row, filter: IdMatch) -> Result<u64, GatewayError>;

    /// Retorna quantas linhas foram removidas.
    async fn delete(&self, collection: Collection, filter: IdMatch) -> Result<u64, GatewayError>;
}

/// Rejeita colunas fora da lista gravável da coleção.
pub fn check_columns(collection: Collection, row: &Row) -> Result<(), GatewayError> {
    match row.keys().find(|k| !collection.has_column(k)) {
        Some(column) => Err(GatewayError::UnknownColumn {
            table: collection.table(),
            column: column.clone(),
        }),
        None => Ok(()),
    }
}
