// src/db/memory_gateway.rs

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    db::gateway::{check_columns, Gateway, GatewayError, IdMatch, Row},
    models::collection::{Collection, Ordering},
};

/// Backend em memória, com as mesmas regras de colunas do Postgres.
/// Usado em demonstrações locais (`GATEWAY_BACKEND=memory`) e nos testes.
#[derive(Default)]
pub struct MemoryGateway {
    // Linhas em ordem de inserção.
    tables: Mutex<HashMap<Collection, Vec<Row>>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }
}

fn row_id(row: &Row) -> Option<Uuid> {
    row.get("id")
        .and_then(Value::as_str)
        .and_then(|s| Uuid::parse_str(s).ok())
}

#[async_trait]
impl Gateway for MemoryGateway {
    async fn select(&self, collection: Collection, ordering: Ordering) -> Result<Vec<Row>, GatewayError> {
        let tables = self.tables.lock().await;
        let mut rows = tables.get(&collection).cloned().unwrap_or_default();
        if ordering == Ordering::CreatedAtDesc {
            rows.reverse();
        }
        Ok(rows)
    }

    async fn insert(&self, collection: Collection, mut row: Row) -> Result<(), GatewayError> {
        check_columns(collection, &row)?;
        row.insert("id".into(), Value::String(Uuid::new_v4().to_string()));
        row.insert("created_at".into(), Value::String(Utc::now().to_rfc3339()));

        self.tables.lock().await.entry(collection).or_default().push(row);
        Ok(())
    }

    async fn update(&self, collection: Collection, row: Row, filter: IdMatch) -> Result<u64, GatewayError> {
        check_columns(collection, &row)?;
        let mut tables = self.tables.lock().await;
        let mut changed = 0;
        for existing in tables.entry(collection).or_default().iter_mut() {
            if row_id(existing).is_some_and(|id| filter.matches(id)) {
                for (column, value) in &row {
                    existing.insert(column.clone(), value.clone());
                }
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn delete(&self, collection: Collection, filter: IdMatch) -> Result<u64, GatewayError> {
        let mut tables = self.tables.lock().await;
        let rows = tables.entry(collection).or_default();
        let before = rows.len();
        rows.retain(|row| !row_id(row).is_some_and(|id| filter.matches(id)));
        Ok((before - rows.len()) as u64)
    }
}
