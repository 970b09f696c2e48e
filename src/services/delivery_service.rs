// src/services/delivery_service.rs

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    common::{clock::Clock, datefmt, error::{Alert, AppError}, search::contains_ci},
    db::IdMatch,
    models::{
        collection::{Collection, Scope},
        delivery::{DeliveryDriver, DeliveryVisit, DriverForm, VisitDaySummary, VisitForm, UNKNOWN_COMPANY},
    },
    services::refresh_service::RefreshCoordinator,
};

// Visitas mostram o entregador; qualquer escrita nelas recarrega as duas fatias.
const VISIT_SCOPES: [Scope; 2] = [
    Scope::One(Collection::DeliveryVisits),
    Scope::One(Collection::DeliveryDrivers),
];

/// De qual tela veio a escrita do entregador.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DriverOrigin {
    #[default]
    Entregadores,
    Visitas,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DriverSaveQuery {
    #[serde(default)]
    #[param(inline)]
    pub from: DriverOrigin,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct VisitFilter {
    /// Entregador, empresa ou observações.
    #[serde(default)]
    pub search: String,
    /// Dia da visita (AAAA-MM-DD).
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SummaryQuery {
    /// Padrão: hoje.
    pub date: Option<NaiveDate>,
}

#[derive(Clone)]
pub struct DeliveryService {
    coordinator: Arc<RefreshCoordinator>,
    clock: Arc<dyn Clock>,
}

impl DeliveryService {
    pub fn new(coordinator: Arc<RefreshCoordinator>, clock: Arc<dyn Clock>) -> Self {
        Self { coordinator, clock }
    }

    // =========================================================================
    //  ENTREGADORES
    // =========================================================================

    pub fn list_drivers(&self, search: &str) -> Vec<DeliveryDriver> {
        self.coordinator
            .snapshot()
            .delivery_drivers
            .iter()
            .filter(|d| {
                contains_ci(&d.name, search)
                    || contains_ci(&d.company_name, search)
                    || d.cpf.contains(search)
                    || d.rg.contains(search)
            })
            .cloned()
            .collect()
    }

    /// Cadastra ou edita um entregador. O nome da empresa é copiado do cadastro
    /// de empresas; empresa desconhecida vira "N/A".
    pub async fn save_driver(
        &self,
        id: Option<Uuid>,
        form: DriverForm,
        origin: DriverOrigin,
    ) -> Result<(), AppError> {
        let company_name = form
            .company_id
            .and_then(|company_id| {
                self.coordinator
                    .snapshot()
                    .companies
                    .iter()
                    .find(|c| c.id == company_id)
                    .map(|c| c.name.clone())
            })
            .unwrap_or_else(|| UNKNOWN_COMPANY.to_string());

        let row = form.to_row(&company_name)?;
        let scopes: &[Scope] = match origin {
            DriverOrigin::Entregadores => &[Scope::One(Collection::DeliveryDrivers)],
            DriverOrigin::Visitas => &VISIT_SCOPES,
        };
        let gateway = self.coordinator.gateway();

        match id {
            None => {
                self.coordinator
                    .commit_write(Alert::SaveDriver, scopes, gateway.insert(Collection::DeliveryDrivers, row))
                    .await?
            }
            Some(id) => {
                let changed = self
                    .coordinator
                    .commit_write(
                        Alert::SaveDriver,
                        scopes,
                        gateway.update(Collection::DeliveryDrivers, row, IdMatch::Eq(id)),
                    )
                    .await?;
                if changed == 0 {
                    return Err(AppError::RecordNotFound(id));
                }
            }
        }

        tracing::info!("🚚 Entregador salvo: {} ({})", form.name, company_name);
        Ok(())
    }

    // =========================================================================
    //  VISITAS
    // =========================================================================

    pub fn list_visits(&self, filter: &VisitFilter) -> Vec<DeliveryVisit> {
        let term = filter.search.as_str();
        self.coordinator
            .snapshot()
            .delivery_visits
            .iter()
            .filter(|v| {
                datefmt::matches_day(&v.entry_time, filter.date)
                    && (contains_ci(&v.driver_name, term)
                        || contains_ci(&v.company_name, term)
                        || contains_ci(&v.observations, term))
            })
            .cloned()
            .collect()
    }

    /// Contagem de visitas e soma de volumes do dia (ignora a busca).
    pub fn day_summary(&self, date: Option<NaiveDate>) -> VisitDaySummary {
        let day = date.unwrap_or_else(|| self.clock.now().date());
        let snapshot = self.coordinator.snapshot();
        let on_day = snapshot
            .delivery_visits
            .iter()
            .filter(|v| datefmt::matches_day(&v.entry_time, Some(day)));

        let (visits, packages) = on_day.fold((0, 0), |(n, sum), v| (n + 1, sum + v.package_count));
        VisitDaySummary {
            date: day.format("%Y-%m-%d").to_string(),
            visits,
            packages,
        }
    }

    pub async fn save_visit(&self, id: Option<Uuid>, form: VisitForm) -> Result<(), AppError> {
        let mut row = form.to_row()?;
        let gateway = self.coordinator.gateway();

        match id {
            None => {
                // Carimbo com ano de quatro dígitos, só na criação.
                row.insert(
                    "entry_time".into(),
                    datefmt::long_stamp(self.clock.now()).into(),
                );
                self.coordinator
                    .commit_write(Alert::SaveVisit, &VISIT_SCOPES, gateway.insert(Collection::DeliveryVisits, row))
                    .await?
            }
            Some(id) => {
                let changed = self
                    .coordinator
                    .commit_write(
                        Alert::SaveVisit,
                        &VISIT_SCOPES,
                        gateway.update(Collection::DeliveryVisits, row, IdMatch::Eq(id)),
                    )
                    .await?;
                if changed == 0 {
                    return Err(AppError::RecordNotFound(id));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::clock::FixedClock,
        db::{testing::ProbeGateway, Gateway},
    };
    use serde_json::json;

    async fn setup() -> (DeliveryService, Arc<RefreshCoordinator>, Arc<ProbeGateway>) {
        let gateway = Arc::new(ProbeGateway::new());
        gateway
            .inner
            .insert(
                Collection::Companies,
                json!({ "name": "Correios" }).as_object().cloned().unwrap(),
            )
            .await
            .unwrap();
        let coordinator = Arc::new(RefreshCoordinator::new(gateway.clone()));
        coordinator.refresh(&[Scope::ALL], false).await;
        let service = DeliveryService::new(coordinator.clone(), Arc::new(FixedClock::at("2025-03-05 10:15")));
        (service, coordinator, gateway)
    }

    fn driver(company_id: Option<Uuid>) -> DriverForm {
        serde_json::from_value(json!({
            "name": "Rafael", "companyId": company_id, "cpf": "111", "rg": "222", "status": "ativo"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn company_name_is_copied_or_falls_back() {
        let (service, coordinator, _) = setup().await;
        let correios = coordinator.snapshot().companies[0].id;

        service.save_driver(None, driver(Some(correios)), DriverOrigin::Entregadores).await.unwrap();
        service.save_driver(None, driver(Some(Uuid::new_v4())), DriverOrigin::Entregadores).await.unwrap();

        let mut names: Vec<String> = service.list_drivers("").into_iter().map(|d| d.company_name).collect();
        names.sort();
        assert_eq!(names, vec!["Correios", "N/A"]);
    }

    #[tokio::test]
    async fn driver_edit_from_visits_page_refreshes_both_slices() {
        let (service, coordinator, gateway) = setup().await;
        let before = coordinator.snapshot();
        let selects = ProbeGateway::count(&gateway.selects);

        service.save_driver(None, driver(None), DriverOrigin::Visitas).await.unwrap();

        let after = coordinator.snapshot();
        assert_eq!(ProbeGateway::count(&gateway.selects), selects + 2);
        assert!(!Arc::ptr_eq(&before.delivery_visits, &after.delivery_visits));
        assert!(Arc::ptr_eq(&before.companies, &after.companies));
    }

    #[tokio::test]
    async fn visits_use_four_digit_years_and_feed_the_summary() {
        let (service, _, _) = setup().await;
        for count in [3, 2] {
            let form: VisitForm = serde_json::from_value(json!({
                "driverId": Uuid::new_v4(), "driverName": "Rafael", "companyName": "Correios",
                "packageCount": count
            }))
            .unwrap();
            service.save_visit(None, form).await.unwrap();
        }

        let visits = service.list_visits(&VisitFilter::default());
        assert_eq!(visits[0].entry_time, "05/03/2025 10:15");

        let today = service.day_summary(None);
        assert_eq!((today.date.as_str(), today.visits, today.packages), ("2025-03-05", 2, 5));
        let other = service.day_summary(NaiveDate::from_ymd_opt(2025, 3, 4));
        assert_eq!((other.visits, other.packages), (0, 0));
    }
}
