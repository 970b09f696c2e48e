// src/db/testing.rs

use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicUsize, Ordering as AtomicOrdering},
        Mutex,
    },
};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::{
    db::{
        gateway::{Gateway, GatewayError, IdMatch, Row},
        memory_gateway::MemoryGateway,
    },
    models::collection::{Collection, Ordering},
};

/// Gateway de teste: conta chamadas, injeta falhas e pode segurar as leituras.
#[derive(Default)]
pub struct ProbeGateway {
    pub inner: MemoryGateway,
    pub selects: AtomicUsize,
    pub updates: AtomicUsize,
    pub deletes: AtomicUsize,
    failing_reads: Mutex<HashSet<Collection>>,
    failing_writes: Mutex<bool>,
    read_gate: Mutex<Option<std::sync::Arc<Semaphore>>>,
}

impl ProbeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads_of(&self, collection: Collection) {
        self.failing_reads.lock().unwrap().insert(collection);
    }

    pub fn fail_writes(&self, fail: bool) {
        *self.failing_writes.lock().unwrap() = fail;
    }

    /// Leituras passam a esperar uma permissão do semáforo devolvido.
    pub fn hold_reads(&self) -> std::sync::Arc<Semaphore> {
        let gate = std::sync::Arc::new(Semaphore::new(0));
        *self.read_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(AtomicOrdering::SeqCst)
    }

    fn check_write(&self) -> Result<(), GatewayError> {
        if *self.failing_writes.lock().unwrap() {
            return Err(GatewayError::Unavailable("escrita recusada".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl Gateway for ProbeGateway {
    async fn select(&self, collection: Collection, ordering: Ordering) -> Result<Vec<Row>, GatewayError> {
        self.selects.fetch_add(1, AtomicOrdering::SeqCst);
        let gate = self.read_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.acquire().await.unwrap().forget();
        }
        if self.failing_reads.lock().unwrap().contains(&collection) {
            return Err(GatewayError::Unavailable(format!("leitura de {}", collection.table())));
        }
        self.inner.select(collection, ordering).await
    }

    async fn insert(&self, collection: Collection, row: Row) -> Result<(), GatewayError> {
        self.check_write()?;
        self.inner.insert(collection, row).await
    }

    async fn update(&self, collection: Collection, row: Row, filter: IdMatch) -> Result<u64, GatewayError> {
        self.check_write()?;
        self.updates.fetch_add(1, AtomicOrdering::SeqCst);
        self.inner.update(collection, row, filter).await
    }

    async fn delete(&self, collection: Collection, filter: IdMatch) -> Result<u64, GatewayError> {
        self.check_write()?;
        self.deletes.fetch_add(1, AtomicOrdering::SeqCst);
        self.inner.delete(collection, filter).await
    }
}
