// src/services/refresh_service.rs

use std::{
    future::Future,
    sync::{
        atomic::{AtomicU64, AtomicUsize, Ordering as AtomicOrdering},
        Arc, RwLock, RwLockReadGuard, RwLockWriteGuard,
    },
    time::Instant,
};

use futures::future::try_join_all;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    common::error::{Alert, AppError},
    db::{Gateway, GatewayError},
    models::{
        collection::{Collection, Scope},
        snapshot::{Slice, Snapshot},
    },
};

/// Resultado de uma atualização. Falhas de leitura nunca viram erro para quem chamou.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Committed {
        applied: Vec<Collection>,
        // Respostas mais velhas que o último commit da coleção.
        discarded: Vec<Collection>,
    },
    Failed,
}

impl RefreshOutcome {
    /// A coleção foi relida com sucesso (aplicada agora ou já coberta por um commit mais novo).
    pub fn covers(&self, collection: Collection) -> bool {
        match self {
            RefreshOutcome::Committed { applied, discarded } => {
                applied.contains(&collection) || discarded.contains(&collection)
            }
            RefreshOutcome::Failed => false,
        }
    }
}

#[derive(Debug, Default)]
struct Committed {
    snapshot: Snapshot,
    // Maior geração já aplicada, por coleção.
    watermarks: [u64; Collection::ALL.len()],
}

/// Resumo do estado de sincronização para o front end.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub is_loading: bool,
    pub collections: Vec<CollectionStatus>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollectionStatus {
    pub collection: Collection,
    pub records: usize,
    pub generation: u64,
}

/// Coordenador de atualização: dono único do estado em memória.
pub struct RefreshCoordinator {
    gateway: Arc<dyn Gateway>,
    state: RwLock<Committed>,
    // Atualizações bloqueantes em andamento; `is_loading` enquanto > 0.
    loading: AtomicUsize,
    issued: [AtomicU64; Collection::ALL.len()],
}

struct LoadingGuard<'a>(&'a AtomicUsize);

impl<'a> LoadingGuard<'a> {
    fn raise(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, AtomicOrdering::SeqCst);
        Self(counter)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, AtomicOrdering::SeqCst);
    }
}

impl RefreshCoordinator {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            gateway,
            state: RwLock::new(Committed::default()),
            loading: AtomicUsize::new(0),
            issued: std::array::from_fn(|_| AtomicU64::new(0)),
        }
    }

    pub fn gateway(&self) -> &dyn Gateway {
        self.gateway.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(AtomicOrdering::SeqCst) > 0
    }

    /// Fotografia imutável do estado atual.
    pub fn snapshot(&self) -> Snapshot {
        self.read_state().snapshot.clone()
    }

    pub fn status(&self) -> SyncStatus {
        let state = self.read_state();
        let snapshot = &state.snapshot;
        let collections = Collection::ALL
            .into_iter()
            .map(|collection| CollectionStatus {
                collection,
                records: record_count(snapshot, collection),
                generation: state.watermarks[collection.index()],
            })
            .collect();
        SyncStatus {
            is_loading: self.is_loading(),
            collections,
        }
    }

    /// Busca as coleções do escopo em paralelo e publica tudo de uma vez.
    ///
    /// Em modo bloqueante o indicador de carregamento fica ligado durante o lote;
    /// em segundo plano ele não é tocado. Qualquer falha descarta o lote inteiro.
    pub async fn refresh(&self, scopes: &[Scope], background: bool) -> RefreshOutcome {
        let collections = Scope::resolve(scopes);
        if collections.is_empty() {
            return RefreshOutcome::Committed {
                applied: Vec::new(),
                discarded: Vec::new(),
            };
        }

        let _loading = (!background).then(|| LoadingGuard::raise(&self.loading));
        let started = Instant::now();

        let reads = collections.iter().map(|&collection| {
            let ticket = self.issue(collection);
            async move {
                let rows = self
                    .gateway
                    .select(collection, collection.descriptor().ordering)
                    .await?;
                let slice = Slice::decode(collection, rows)?;
                Ok::<_, AppError>((ticket, slice))
            }
        });

        match try_join_all(reads).await {
            Ok(batch) => {
                let outcome = self.commit(batch);
                tracing::debug!(
                    "Atualização {:?} concluída em {:?} ({})",
                    collections,
                    started.elapsed(),
                    if background { "segundo plano" } else { "bloqueante" }
                );
                outcome
            }
            Err(e) => {
                tracing::error!("Falha ao atualizar {:?}: {}. Estado anterior mantido.", collections, e);
                RefreshOutcome::Failed
            }
        }
    }

    /// Executa uma escrita e, se ela der certo, atualiza o escopo em segundo plano.
    /// Uma escrita recusada vira o alerta genérico do formulário.
    pub async fn commit_write<T, F>(&self, alert: Alert, scopes: &[Scope], write: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, GatewayError>>,
    {
        let value = accept(alert, write.await)?;
        self.refresh(scopes, true).await;
        Ok(value)
    }

    /// Como `commit_write`, mas informa se a releitura trouxe `collection` de volta.
    /// Sem releitura, a fotografia ainda mostra o registro de antes da escrita.
    pub async fn commit_transition<T, F>(
        &self,
        alert: Alert,
        collection: Collection,
        scopes: &[Scope],
        write: F,
    ) -> Result<(T, bool), AppError>
    where
        F: Future<Output = Result<T, GatewayError>>,
    {
        let value = accept(alert, write.await)?;
        let fresh = self.refresh(scopes, true).await.covers(collection);
        Ok((value, fresh))
    }

    /// Aplica na fotografia uma escrita já aceita pelo backend cuja releitura falhou.
    /// A marca d'água não muda: a próxima leitura bem-sucedida substitui a fatia inteira.
    pub fn patch(&self, apply: impl FnOnce(&mut Snapshot)) {
        apply(&mut self.write_state().snapshot);
    }

    fn issue(&self, collection: Collection) -> u64 {
        self.issued[collection.index()].fetch_add(1, AtomicOrdering::SeqCst) + 1
    }

    fn commit(&self, batch: Vec<(u64, Slice)>) -> RefreshOutcome {
        let mut applied = Vec::new();
        let mut discarded = Vec::new();

        let mut state = self.write_state();
        for (ticket, slice) in batch {
            let collection = slice.collection();
            let watermark = &mut state.watermarks[collection.index()];
            if ticket <= *watermark {
                tracing::debug!(
                    "Resposta velha de {} descartada (geração {} <= {})",
                    collection.table(),
                    ticket,
                    watermark
                );
                discarded.push(collection);
                continue;
            }
            *watermark = ticket;
            state.snapshot.apply(slice);
            applied.push(collection);
        }

        RefreshOutcome::Committed { applied, discarded }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, Committed> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, Committed> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn accept<T>(alert: Alert, result: Result<T, GatewayError>) -> Result<T, AppError> {
    result.map_err(|e| {
        tracing::error!("Escrita recusada ({}): {}", alert.key(), e);
        AppError::WriteFailed(alert)
    })
}

fn record_count(snapshot: &Snapshot, collection: Collection) -> usize {
    match collection {
        Collection::Residents => snapshot.residents.len(),
        Collection::Packages => snapshot.packages.len(),
        Collection::Companies => snapshot.companies.len(),
        Collection::Employees => snapshot.employees.len(),
        Collection::Occurrences => snapshot.occurrences.len(),
        Collection::ReceivedItems => snapshot.received_items.len(),
        Collection::Materials => snapshot.materials.len(),
        Collection::Visitors => snapshot.visitors.len(),
        Collection::TimeRecords => snapshot.time_records.len(),
        Collection::DeliveryDrivers => snapshot.delivery_drivers.len(),
        Collection::DeliveryVisits => snapshot.delivery_visits.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::testing::ProbeGateway,
        models::{collection::decode_rows, package::Package},
    };
    use serde_json::json;
    use std::time::Duration;

    fn row(value: serde_json::Value) -> crate::db::Row {
        value.as_object().cloned().unwrap()
    }

    async fn seeded() -> Arc<ProbeGateway> {
        let gateway = Arc::new(ProbeGateway::new());
        gateway
            .inner
            .insert(Collection::Residents, row(json!({ "name": "Maria", "unit": "101", "block": "A" })))
            .await
            .unwrap();
        gateway
            .inner
            .insert(Collection::Packages, row(json!({ "unit": "101", "status": "Aguardando Retirada" })))
            .await
            .unwrap();
        gateway
    }

    async fn wait_for_selects(gateway: &ProbeGateway, n: usize) {
        while ProbeGateway::count(&gateway.selects) < n {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }

    #[tokio::test]
    async fn scoped_refresh_replaces_only_the_requested_slice() {
        let gateway = seeded().await;
        let coordinator = RefreshCoordinator::new(gateway.clone());
        coordinator.refresh(&[Scope::ALL], false).await;
        let before = coordinator.snapshot();
        assert_eq!(ProbeGateway::count(&gateway.selects), 11);

        let outcome = coordinator.refresh(&[Collection::Packages.into()], true).await;
        let after = coordinator.snapshot();

        assert_eq!(
            outcome,
            RefreshOutcome::Committed {
                applied: vec![Collection::Packages],
                discarded: vec![]
            }
        );
        assert_eq!(ProbeGateway::count(&gateway.selects), 12);
        assert!(!Arc::ptr_eq(&before.packages, &after.packages));
        assert!(Arc::ptr_eq(&before.residents, &after.residents));
        assert!(Arc::ptr_eq(&before.visitors, &after.visitors));
        assert!(Arc::ptr_eq(&before.delivery_visits, &after.delivery_visits));
    }

    #[tokio::test]
    async fn blocking_refresh_raises_loading_until_the_batch_joins() {
        let gateway = seeded().await;
        let gate = gateway.hold_reads();
        let coordinator = Arc::new(RefreshCoordinator::new(gateway.clone()));

        let task = tokio::spawn({
            let coordinator = coordinator.clone();
            async move { coordinator.refresh(&[Scope::ALL], false).await }
        });
        wait_for_selects(&gateway, 11).await;
        assert!(coordinator.is_loading());

        gate.add_permits(11);
        let outcome = task.await.unwrap();
        assert!(matches!(outcome, RefreshOutcome::Committed { .. }));
        assert!(!coordinator.is_loading());
        assert_eq!(coordinator.snapshot().residents.len(), 1);
    }

    #[tokio::test]
    async fn background_refresh_never_touches_loading() {
        let gateway = seeded().await;
        let gate = gateway.hold_reads();
        let coordinator = Arc::new(RefreshCoordinator::new(gateway.clone()));

        let task = tokio::spawn({
            let coordinator = coordinator.clone();
            async move { coordinator.refresh(&[Collection::Packages.into()], true).await }
        });
        wait_for_selects(&gateway, 1).await;
        assert!(!coordinator.is_loading());

        gate.add_permits(1);
        task.await.unwrap();
        assert!(!coordinator.is_loading());
        assert_eq!(coordinator.snapshot().packages.len(), 1);
    }

    #[tokio::test]
    async fn one_failed_read_keeps_every_slice() {
        let gateway = seeded().await;
        let coordinator = RefreshCoordinator::new(gateway.clone());
        coordinator.refresh(&[Scope::ALL], false).await;
        let before = coordinator.snapshot();

        gateway
            .inner
            .insert(Collection::Residents, row(json!({ "name": "João", "unit": "202" })))
            .await
            .unwrap();
        gateway.fail_reads_of(Collection::Visitors);

        let outcome = coordinator.refresh(&[Scope::ALL], false).await;
        let after = coordinator.snapshot();

        assert_eq!(outcome, RefreshOutcome::Failed);
        assert!(!coordinator.is_loading());
        assert!(Arc::ptr_eq(&before.residents, &after.residents));
        assert_eq!(after.residents.len(), 1);
    }

    #[test]
    fn stale_responses_never_overwrite_newer_ones() {
        let coordinator = RefreshCoordinator::new(Arc::new(ProbeGateway::new()));
        let older = coordinator.issue(Collection::Packages);
        let newer = coordinator.issue(Collection::Packages);

        let fresh: Vec<Package> = decode_rows(vec![row(json!({ "recipient_name": "Maria" }))]).unwrap();
        coordinator.commit(vec![(newer, Slice::Packages(fresh))]);
        let outcome = coordinator.commit(vec![(older, Slice::Packages(Vec::new()))]);

        assert_eq!(
            outcome,
            RefreshOutcome::Committed {
                applied: vec![],
                discarded: vec![Collection::Packages]
            }
        );
        assert_eq!(coordinator.snapshot().packages[0].recipient_name, "Maria");
        assert_eq!(coordinator.status().collections[1].generation, newer);
    }

    #[tokio::test]
    async fn refused_write_becomes_an_alert_and_skips_the_refresh() {
        let gateway = seeded().await;
        gateway.fail_writes(true);
        let coordinator = RefreshCoordinator::new(gateway.clone());

        let result = coordinator
            .commit_write(
                Alert::SaveResident,
                &[Collection::Residents.into()],
                coordinator.gateway().insert(Collection::Residents, row(json!({ "name": "Ana" }))),
            )
            .await;

        assert!(matches!(result, Err(AppError::WriteFailed(Alert::SaveResident))));
        assert_eq!(ProbeGateway::count(&gateway.selects), 0);
    }
}
