// src/services/delete_service.rs

// Exclusão em duas etapas: o pedido só guarda o id; a confirmação apaga.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use uuid::Uuid;

use crate::{
    common::error::{Alert, AppError},
    db::IdMatch,
    models::collection::{Collection, Scope},
    services::refresh_service::RefreshCoordinator,
};

#[derive(Clone)]
pub struct DeleteService {
    coordinator: Arc<RefreshCoordinator>,
    // Um pedido pendente por coleção (uma tela, um diálogo).
    pending: Arc<Mutex<HashMap<Collection, Uuid>>>,
}

impl DeleteService {
    pub fn new(coordinator: Arc<RefreshCoordinator>) -> Self {
        Self {
            coordinator,
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Abre o diálogo de confirmação. Um novo pedido substitui o anterior.
    pub fn request(&self, collection: Collection, id: Uuid) {
        self.lock().insert(collection, id);
    }

    pub fn cancel(&self, collection: Collection) {
        self.lock().remove(&collection);
    }

    pub fn pending(&self, collection: Collection) -> Option<Uuid> {
        self.lock().get(&collection).copied()
    }

    /// Apaga o registro pendente. Sem pedido aberto, não faz nada e devolve `None`.
    pub async fn confirm(&self, collection: Collection) -> Result<Option<Uuid>, AppError> {
        // O pedido sai do mapa antes da escrita: uma segunda confirmação não apaga de novo.
        let Some(id) = self.lock().remove(&collection) else {
            return Ok(None);
        };

        self.coordinator
            .commit_write(
                Alert::Delete,
                &refresh_scopes(collection),
                self.coordinator.gateway().delete(collection, IdMatch::Eq(id)),
            )
            .await?;

        tracing::info!("🗑️ Registro {} removido de {}", id, collection.table());
        Ok(Some(id))
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Collection, Uuid>> {
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

// Entregadores e visitas aparecem uma na tela da outra.
fn refresh_scopes(collection: Collection) -> Vec<Scope> {
    match collection {
        Collection::DeliveryDrivers | Collection::DeliveryVisits => vec![
            Scope::One(Collection::DeliveryVisits),
            Scope::One(Collection::DeliveryDrivers),
        ],
        other => vec![Scope::One(other)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{testing::ProbeGateway, Gateway};
    use serde_json::json;

    async fn setup() -> (DeleteService, Arc<RefreshCoordinator>, Arc<ProbeGateway>, Uuid) {
        let gateway = Arc::new(ProbeGateway::new());
        gateway
            .inner
            .insert(
                Collection::Residents,
                json!({ "name": "Maria", "unit": "101", "block": "A" }).as_object().cloned().unwrap(),
            )
            .await
            .unwrap();
        let coordinator = Arc::new(RefreshCoordinator::new(gateway.clone()));
        coordinator.refresh(&[Scope::ALL], false).await;
        let id = coordinator.snapshot().residents[0].id;
        (DeleteService::new(coordinator.clone()), coordinator, gateway, id)
    }

    #[tokio::test]
    async fn confirming_twice_deletes_once() {
        let (service, coordinator, gateway, id) = setup().await;

        service.request(Collection::Residents, id);
        assert_eq!(service.pending(Collection::Residents), Some(id));

        let (first, second) = tokio::join!(
            service.confirm(Collection::Residents),
            service.confirm(Collection::Residents)
        );
        let confirmed: Vec<_> = [first.unwrap(), second.unwrap()].into_iter().flatten().collect();

        assert_eq!(confirmed, vec![id]);
        assert_eq!(ProbeGateway::count(&gateway.deletes), 1);
        assert!(coordinator.snapshot().residents.is_empty());
    }

    #[tokio::test]
    async fn cancel_leaves_the_record_alone() {
        let (service, coordinator, gateway, id) = setup().await;

        service.request(Collection::Residents, id);
        service.cancel(Collection::Residents);

        assert_eq!(service.confirm(Collection::Residents).await.unwrap(), None);
        assert_eq!(ProbeGateway::count(&gateway.deletes), 0);
        assert_eq!(coordinator.snapshot().residents.len(), 1);
    }

    #[tokio::test]
    async fn a_refused_delete_keeps_the_state() {
        let (service, coordinator, gateway, id) = setup().await;
        gateway.fail_writes(true);

        service.request(Collection::Residents, id);
        let result = service.confirm(Collection::Residents).await;

        assert!(matches!(result, Err(AppError::WriteFailed(Alert::Delete))));
        assert_eq!(coordinator.snapshot().residents.len(), 1);
    }

    #[test]
    fn delivery_deletes_refresh_both_slices() {
        assert_eq!(refresh_scopes(Collection::DeliveryDrivers).len(), 2);
        assert_eq!(refresh_scopes(Collection::Packages), vec![Scope::One(Collection::Packages)]);
    }
}
