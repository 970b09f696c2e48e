// src/services/received_item_service.rs

use std::sync::Arc;

use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    common::{clock::Clock, datefmt, error::{Alert, AppError}, search::contains_ci},
    db::IdMatch,
    models::{
        collection::Collection,
        package::{pickup_row, PickupStats, PickupStatus},
        received_item::{NewReceivedItem, OperationType, ReceivedItem},
    },
    services::{package_service::PackageStatusFilter, refresh_service::RefreshCoordinator},
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ReceivedItemFilter {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    #[param(inline)]
    pub status: PackageStatusFilter,
    #[param(inline)]
    pub operation_type: Option<OperationType>,
}

impl ReceivedItemFilter {
    pub fn matches(&self, item: &ReceivedItem) -> bool {
        let term = self.search.as_str();
        // Observações brutas entram na busca: é por elas que se acha o código.
        let matches_search = contains_ci(&item.description, term)
            || item.unit.contains(term)
            || contains_ci(&item.block, term)
            || contains_ci(&item.left_by, term)
            || item.observations.as_deref().is_some_and(|o| contains_ci(o, term))
            || item.received_code.as_deref().is_some_and(|c| c.contains(term));

        let matches_status = match self.status {
            PackageStatusFilter::Todos => true,
            PackageStatusFilter::Pendentes => item.status == PickupStatus::AwaitingPickup,
            PackageStatusFilter::Retiradas => item.status == PickupStatus::PickedUp,
        };

        matches_search
            && matches_status
            && self.operation_type.is_none_or(|op| op == item.operation_type)
    }
}

#[derive(Clone)]
pub struct ReceivedItemService {
    coordinator: Arc<RefreshCoordinator>,
    clock: Arc<dyn Clock>,
}

impl ReceivedItemService {
    pub fn new(coordinator: Arc<RefreshCoordinator>, clock: Arc<dyn Clock>) -> Self {
        Self { coordinator, clock }
    }

    pub fn list(&self, filter: &ReceivedItemFilter) -> Vec<ReceivedItem> {
        self.coordinator
            .snapshot()
            .received_items
            .iter()
            .filter(|i| filter.matches(i))
            .cloned()
            .collect()
    }

    pub fn stats(&self) -> PickupStats {
        let snapshot = self.coordinator.snapshot();
        let pending = snapshot
            .received_items
            .iter()
            .filter(|i| i.status == PickupStatus::AwaitingPickup)
            .count();
        PickupStats {
            total: snapshot.received_items.len(),
            pending,
            picked_up: snapshot.received_items.len() - pending,
        }
    }

    pub async fn create(&self, payload: NewReceivedItem) -> Result<(), AppError> {
        let row = payload.to_row(&datefmt::short_stamp(self.clock.now()))?;

        self.coordinator
            .commit_write(
                Alert::SaveReceivedItem,
                &[Collection::ReceivedItems.into()],
                self.coordinator.gateway().insert(Collection::ReceivedItems, row),
            )
            .await
    }

    pub async fn pickup(&self, id: Uuid, picked_up_by: &str) -> Result<ReceivedItem, AppError> {
        let current = self.find(id)?;
        if current.status == PickupStatus::PickedUp {
            return Err(AppError::AlreadyTransitioned(PickupStatus::PickedUp.as_str()));
        }

        let stamp = datefmt::short_stamp(self.clock.now());
        let row = pickup_row(picked_up_by, &stamp)?;
        let (changed, fresh) = self
            .coordinator
            .commit_transition(
                Alert::RegisterPickup,
                Collection::ReceivedItems,
                &[Collection::ReceivedItems.into()],
                self.coordinator.gateway().update(Collection::ReceivedItems, row, IdMatch::Eq(id)),
            )
            .await?;
        if changed == 0 {
            return Err(AppError::RecordNotFound(id));
        }
        if fresh {
            return self.find(id);
        }

        tracing::warn!(
            "Releitura de {} falhou após a escrita; aplicando {} localmente",
            Collection::ReceivedItems.table(),
            id
        );
        let mut updated = current;
        updated.status = PickupStatus::PickedUp;
        updated.picked_up_by = Some(picked_up_by.to_string());
        updated.picked_up_at = Some(stamp);
        self.coordinator.patch(|snapshot| {
            if let Some(slot) = Arc::make_mut(&mut snapshot.received_items).iter_mut().find(|i| i.id == id) {
                *slot = updated.clone();
            }
        });
        Ok(updated)
    }

    fn find(&self, id: Uuid) -> Result<ReceivedItem, AppError> {
        self.coordinator
            .snapshot()
            .received_items
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or(AppError::RecordNotFound(id))
    }
}
