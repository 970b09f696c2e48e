// src/db/pg_gateway.rs

use async_trait::async_trait;
use sqlx::{types::Json, PgPool, Postgres, QueryBuilder};

use crate::{
    db::gateway::{check_columns, Gateway, GatewayError, IdMatch, Row},
    models::collection::{Collection, Ordering},
};

// O gateway sobre o Postgres hospedado. Monta as queries a partir da tabela de
// mapeamento; nomes de coluna só entram no SQL depois de `check_columns`.
#[derive(Clone)]
pub struct PgGateway {
    pool: PgPool,
}

impl PgGateway {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn quoted(column: &str) -> String {
    format!("\"{}\"", column)
}

fn push_id_match(qb: &mut QueryBuilder<'_, Postgres>, filter: IdMatch) {
    match filter {
        IdMatch::Eq(id) => {
            qb.push(" WHERE t.id = ").push_bind(id);
        }
        IdMatch::In(ids) => {
            qb.push(" WHERE t.id = ANY(").push_bind(ids).push(")");
        }
        IdMatch::Neq(id) => {
            qb.push(" WHERE t.id <> ").push_bind(id);
        }
    }
}

#[async_trait]
impl Gateway for PgGateway {
    async fn select(&self, collection: Collection, ordering: Ordering) -> Result<Vec<Row>, GatewayError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT to_jsonb(t) AS row FROM ");
        qb.push(collection.table()).push(" AS t");
        if ordering == Ordering::CreatedAtDesc {
            qb.push(" ORDER BY t.created_at DESC");
        }

        let rows: Vec<(Json<Row>,)> = qb.build_query_as().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(|(Json(row),)| row).collect())
    }

    async fn insert(&self, collection: Collection, row: Row) -> Result<(), GatewayError> {
        check_columns(collection, &row)?;
        if row.is_empty() {
            return Err(GatewayError::InvalidRow("insert sem colunas".into()));
        }
        let table = collection.table();
        let columns: Vec<String> = row.keys().cloned().collect();

        let mut qb = QueryBuilder::<Postgres>::new("INSERT INTO ");
        qb.push(table).push(" (");
        {
            let mut cols = qb.separated(", ");
            for column in &columns {
                cols.push(quoted(column));
            }
        }
        qb.push(") SELECT ");
        {
            let mut cols = qb.separated(", ");
            for column in &columns {
                cols.push(format!("r.{}", quoted(column)));
            }
        }
        qb.push(" FROM jsonb_populate_record(NULL::").push(table).push(", ");
        qb.push_bind(Json(row));
        qb.push(") AS r");

        qb.build().execute(&self.pool).await?;
        Ok(())
    }

    async fn update(&self, collection: Collection, row: Row, filter: IdMatch) -> Result<u64, GatewayError> {
        check_columns(collection, &row)?;
        if row.is_empty() {
            return Err(GatewayError::InvalidRow("update sem colunas".into()));
        }
        let table = collection.table();
        let columns: Vec<String> = row.keys().cloned().collect();

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE ");
        qb.push(table).push(" AS t SET ");
        {
            let mut sets = qb.separated(", ");
            for column in &columns {
                sets.push(format!("{0} = r.{0}", quoted(column)));
            }
        }
        qb.push(" FROM jsonb_populate_record(NULL::").push(table).push(", ");
        qb.push_bind(Json(row));
        qb.push(") AS r");
        push_id_match(&mut qb, filter);

        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, collection: Collection, filter: IdMatch) -> Result<u64, GatewayError> {
        let mut qb = QueryBuilder::<Postgres>::new("DELETE FROM ");
        qb.push(collection.table()).push(" AS t");
        push_id_match(&mut qb, filter);

        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
