// src/services/package_service.rs

use std::{cmp::Ordering, collections::BTreeMap, sync::Arc};

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    common::{clock::Clock, datefmt, error::{Alert, AppError}, search::contains_ci},
    db::IdMatch,
    models::{
        collection::Collection,
        package::{
            group_block, pickup_row, BlockGroup, BulkPickupPayload, NewPackage, Package,
            PickupStats, PickupStatus, UnitGroup,
        },
    },
    services::refresh_service::RefreshCoordinator,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PackageStatusFilter {
    #[default]
    Todos,
    Pendentes,
    Retiradas,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PackageFilter {
    /// Destinatário, unidade, bloco, códigos, remetente ou observações.
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    #[param(inline)]
    pub status: PackageStatusFilter,
}

impl PackageFilter {
    pub fn matches(&self, pkg: &Package) -> bool {
        let term = self.search.as_str();
        let matches_search = contains_ci(&pkg.recipient_name, term)
            || pkg.unit.contains(term)
            || contains_ci(&pkg.block, term)
            || pkg.withdrawal_code.contains(term)
            || pkg.tracking_code.as_deref().is_some_and(|t| contains_ci(t, term))
            || pkg.observations.as_deref().is_some_and(|o| contains_ci(o, term))
            || pkg.sender.as_deref().is_some_and(|s| contains_ci(s, term));

        matches_search
            && match self.status {
                PackageStatusFilter::Todos => true,
                PackageStatusFilter::Pendentes => pkg.status == PickupStatus::AwaitingPickup,
                PackageStatusFilter::Retiradas => pkg.status == PickupStatus::PickedUp,
            }
    }
}

#[derive(Clone)]
pub struct PackageService {
    coordinator: Arc<RefreshCoordinator>,
    clock: Arc<dyn Clock>,
}

impl PackageService {
    pub fn new(coordinator: Arc<RefreshCoordinator>, clock: Arc<dyn Clock>) -> Self {
        Self { coordinator, clock }
    }

    pub fn list(&self, filter: &PackageFilter) -> Vec<Package> {
        self.coordinator
            .snapshot()
            .packages
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect()
    }

    pub fn stats(&self) -> PickupStats {
        let snapshot = self.coordinator.snapshot();
        let pending = snapshot
            .packages
            .iter()
            .filter(|p| p.status == PickupStatus::AwaitingPickup)
            .count();
        PickupStats {
            total: snapshot.packages.len(),
            pending,
            picked_up: snapshot.packages.len() - pending,
        }
    }

    /// Pendentes agrupadas por bloco e depois por unidade.
    pub fn pending_groups(&self, search: &str) -> Vec<BlockGroup> {
        let filter = PackageFilter {
            search: search.to_string(),
            status: PackageStatusFilter::Pendentes,
        };

        let mut blocks: BTreeMap<String, Vec<Package>> = BTreeMap::new();
        for pkg in self.list(&filter) {
            blocks.entry(pkg.group_block()).or_default().push(pkg);
        }

        blocks
            .into_iter()
            .map(|(block_name, items)| {
                let total_in_block = items.len();
                let mut units: BTreeMap<String, Vec<Package>> = BTreeMap::new();
                for pkg in items {
                    units.entry(pkg.unit.clone()).or_default().push(pkg);
                }
                let mut unit_groups: Vec<UnitGroup> = units
                    .into_iter()
                    .map(|(unit, items)| UnitGroup {
                        unit,
                        block: block_name.clone(),
                        count: items.len(),
                        items,
                    })
                    .collect();
                unit_groups.sort_by(|a, b| natural_cmp(&a.unit, &b.unit));

                BlockGroup {
                    block_name,
                    total_in_block,
                    unit_groups,
                }
            })
            .collect()
    }

    pub async fn create(&self, payload: NewPackage) -> Result<(), AppError> {
        let received_at = match payload.received_at.as_deref().map(str::trim) {
            Some(stamp) if !stamp.is_empty() => stamp.to_string(),
            _ => datefmt::short_stamp(self.clock.now()),
        };
        let row = payload.to_row(&received_at)?;

        self.coordinator
            .commit_write(
                Alert::SavePackage,
                &[Collection::Packages.into()],
                self.coordinator.gateway().insert(Collection::Packages, row),
            )
            .await?;

        tracing::info!("📦 Encomenda registrada para unidade {} / {}", payload.unit, payload.block);
        Ok(())
    }

    /// Registra a retirada de uma encomenda e devolve o registro atualizado.
    pub async fn pickup(&self, id: Uuid, picked_up_by: &str) -> Result<Package, AppError> {
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
                Collection::Packages,
                &[Collection::Packages.into()],
                self.coordinator.gateway().update(Collection::Packages, row, IdMatch::Eq(id)),
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
            Collection::Packages.table(),
            id
        );
        let mut updated = current;
        updated.status = PickupStatus::PickedUp;
        updated.picked_up_by = Some(picked_up_by.to_string());
        updated.picked_up_at = Some(stamp);
        self.coordinator.patch(|snapshot| {
            if let Some(slot) = Arc::make_mut(&mut snapshot.packages).iter_mut().find(|p| p.id == id) {
                *slot = updated.clone();
            }
        });
        Ok(updated)
    }

    /// Retira de uma vez todas as pendentes de uma unidade+bloco.
    /// Devolve quantas encomendas mudaram de status.
    pub async fn bulk_pickup(&self, payload: &BulkPickupPayload) -> Result<u64, AppError> {
        let block = group_block(&payload.block);
        let ids: Vec<Uuid> = self
            .coordinator
            .snapshot()
            .packages
            .iter()
            .filter(|p| {
                p.unit == payload.unit
                    && p.group_block() == block
                    && p.status == PickupStatus::AwaitingPickup
            })
            .map(|p| p.id)
            .collect();

        if ids.is_empty() {
            tracing::debug!("Nenhuma encomenda pendente em {} / {}", payload.unit, block);
            return Ok(0);
        }

        let row = pickup_row(&payload.picked_up_by, &datefmt::short_stamp(self.clock.now()))?;
        let changed = self
            .coordinator
            .commit_write(
                Alert::RegisterPickup,
                &[Collection::Packages.into()],
                self.coordinator.gateway().update(Collection::Packages, row, IdMatch::In(ids)),
            )
            .await?;

        tracing::info!("📦 {} encomendas retiradas em lote ({} / {})", changed, payload.unit, block);
        Ok(changed)
    }

    fn find(&self, id: Uuid) -> Result<Package, AppError> {
        self.coordinator
            .snapshot()
            .packages
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(AppError::RecordNotFound(id))
    }
}

/// Ordenação "natural" de unidades: "2" antes de "10", sem diferenciar maiúsculas.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();
    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let n1 = take_number(&mut left);
                let n2 = take_number(&mut right);
                match n1.cmp(&n2) {
                    Ordering::Equal => continue,
                    other => return other,
                }
            }
            (Some(x), Some(y)) => {
                match x.to_lowercase().cmp(y.to_lowercase()) {
                    Ordering::Equal => {
                        left.next();
                        right.next();
                    }
                    other => return other,
                }
            }
        }
    }
}

fn take_number(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> u128 {
    let mut value: u128 = 0;
    while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
        value = value.saturating_mul(10).saturating_add(d as u128);
        chars.next();
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::clock::FixedClock,
        db::{testing::ProbeGateway, Gateway, Row},
        models::collection::Scope,
    };
    use serde_json::json;

    fn row(value: serde_json::Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    async fn service_with(packages: Vec<serde_json::Value>) -> (PackageService, Arc<ProbeGateway>) {
        let gateway = Arc::new(ProbeGateway::new());
        for p in packages {
            gateway.inner.insert(Collection::Packages, row(p)).await.unwrap();
        }
        let coordinator = Arc::new(RefreshCoordinator::new(gateway.clone()));
        coordinator.refresh(&[Scope::ALL], false).await;
        let clock = Arc::new(FixedClock::at("2025-03-05 07:05"));
        (PackageService::new(coordinator, clock), gateway)
    }

    fn pending(unit: &str, block: &str, name: &str) -> serde_json::Value {
        json!({
            "unit": unit, "block": block, "recipient_name": name, "type": "Caixa",
            "withdrawal_code": "1234", "received_at": "04/03/25 10:00",
            "status": "Aguardando Retirada"
        })
    }

    #[tokio::test]
    async fn pickup_by_joao_leaves_the_pending_list() {
        let (service, _) = service_with(vec![pending("101", "A", "Maria")]).await;
        let id = service.list(&PackageFilter::default())[0].id;

        let updated = service.pickup(id, "João").await.unwrap();

        assert_eq!(updated.status, PickupStatus::PickedUp);
        assert_eq!(updated.picked_up_by.as_deref(), Some("João"));
        assert_eq!(updated.picked_up_at.as_deref(), Some("05/03/25 07:05"));

        let pendentes = PackageFilter {
            search: String::new(),
            status: PackageStatusFilter::Pendentes,
        };
        assert!(service.list(&pendentes).is_empty());
    }

    #[tokio::test]
    async fn second_pickup_is_a_conflict() {
        let (service, gateway) = service_with(vec![pending("101", "A", "Maria")]).await;
        let id = service.list(&PackageFilter::default())[0].id;
        service.pickup(id, "João").await.unwrap();

        let again = service.pickup(id, "Pedro").await;
        assert!(matches!(again, Err(AppError::AlreadyTransitioned("Retirada"))));
        assert_eq!(ProbeGateway::count(&gateway.updates), 1);
    }

    #[tokio::test]
    async fn pickup_without_reread_still_reports_the_new_state() {
        let (service, gateway) = service_with(vec![pending("101", "A", "Maria")]).await;
        let id = service.list(&PackageFilter::default())[0].id;
        gateway.fail_reads_of(Collection::Packages);

        let updated = service.pickup(id, "João").await.unwrap();
        assert_eq!(updated.status, PickupStatus::PickedUp);
        assert_eq!(updated.picked_up_by.as_deref(), Some("João"));
        assert_eq!(updated.picked_up_at.as_deref(), Some("05/03/25 07:05"));

        // A fotografia local já mostra a retirada: repetir é conflito, sem nova escrita.
        let again = service.pickup(id, "Pedro").await;
        assert!(matches!(again, Err(AppError::AlreadyTransitioned("Retirada"))));
        assert_eq!(ProbeGateway::count(&gateway.updates), 1);
    }

    #[tokio::test]
    async fn bulk_pickup_changes_exactly_the_group() {
        let (service, gateway) = service_with(vec![
            pending("101", "A", "Maria"),
            pending("101", "a", "Maria"),
            pending("101", "A", "José"),
            pending("101", "B", "Ana"),
            pending("102", "A", "Rui"),
        ])
        .await;

        let changed = service
            .bulk_pickup(&BulkPickupPayload {
                unit: "101".into(),
                block: "A".into(),
                picked_up_by: "João".into(),
            })
            .await
            .unwrap();

        assert_eq!(changed, 3);
        assert_eq!(ProbeGateway::count(&gateway.updates), 1);
        let stats = service.stats();
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.picked_up, 3);
    }

    #[tokio::test]
    async fn bulk_pickup_of_an_empty_group_writes_nothing() {
        let (service, gateway) = service_with(vec![pending("101", "", "Maria")]).await;
        let changed = service
            .bulk_pickup(&BulkPickupPayload {
                unit: "999".into(),
                block: String::new(),
                picked_up_by: "João".into(),
            })
            .await
            .unwrap();
        assert_eq!(changed, 0);
        assert_eq!(ProbeGateway::count(&gateway.updates), 0);
    }

    #[tokio::test]
    async fn pending_groups_order_units_naturally() {
        let (service, _) = service_with(vec![
            pending("10", "A", "Maria"),
            pending("2", "A", "José"),
            pending("2", "a", "Ana"),
            pending("5", "", "Rui"),
        ])
        .await;

        let groups = service.pending_groups("");
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].block_name, "A");
        assert_eq!(groups[0].total_in_block, 3);
        let units: Vec<&str> = groups[0].unit_groups.iter().map(|g| g.unit.as_str()).collect();
        assert_eq!(units, vec!["2", "10"]);
        assert_eq!(groups[0].unit_groups[0].count, 2);
        assert_eq!(groups[1].block_name, "OUTROS");
    }

    #[tokio::test]
    async fn failed_write_keeps_the_package_pending() {
        let (service, gateway) = service_with(vec![pending("101", "A", "Maria")]).await;
        let id = service.list(&PackageFilter::default())[0].id;
        gateway.fail_writes(true);

        let result = service.pickup(id, "João").await;

        assert!(matches!(result, Err(AppError::WriteFailed(Alert::RegisterPickup))));
        assert_eq!(service.stats().pending, 1);
    }

    #[tokio::test]
    async fn create_stamps_now_when_no_time_is_given() {
        let (service, gateway) = service_with(vec![]).await;
        let payload: NewPackage = serde_json::from_value(json!({
            "unit": "303", "block": "C", "recipientName": "Carla", "type": "Envelope",
            "withdrawalCode": "9876", "receivedAt": "  "
        }))
        .unwrap();

        service.create(payload).await.unwrap();

        let rows = gateway.inner.select(Collection::Packages, Collection::Packages.descriptor().ordering).await.unwrap();
        assert_eq!(rows[0]["received_at"], "05/03/25 07:05");
        assert_eq!(service.list(&PackageFilter::default()).len(), 1);
    }

    #[test]
    fn natural_order_compares_numbers_by_value() {
        assert_eq!(natural_cmp("2", "10"), Ordering::Less);
        assert_eq!(natural_cmp("101a", "101B"), Ordering::Less);
        assert_eq!(natural_cmp("Casa 3", "casa 3"), Ordering::Equal);
    }
}
