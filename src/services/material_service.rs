// src/services/material_service.rs

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    common::{clock::Clock, datefmt, error::{Alert, AppError}, search::contains_ci},
    db::IdMatch,
    models::{
        collection::Collection,
        material::{return_row, BorrowedMaterial, LoanStatus, NewLoan},
    },
    services::refresh_service::RefreshCoordinator,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatusFilter {
    #[default]
    Todos,
    Emprestados,
    Devolvidos,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct MaterialFilter {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    #[param(inline)]
    pub status: LoanStatusFilter,
    /// Dia do empréstimo (AAAA-MM-DD).
    pub date: Option<NaiveDate>,
}

impl MaterialFilter {
    pub fn matches(&self, item: &BorrowedMaterial) -> bool {
        let term = self.search.as_str();
        let matches_search = contains_ci(&item.material_name, term)
            || contains_ci(&item.borrower_name, term)
            || item.unit.as_deref().is_some_and(|u| u.contains(term));

        let matches_status = match self.status {
            LoanStatusFilter::Todos => true,
            LoanStatusFilter::Emprestados => item.status == LoanStatus::Emprestado,
            LoanStatusFilter::Devolvidos => item.status == LoanStatus::Devolvido,
        };

        datefmt::matches_day(&item.loan_date, self.date) && matches_search && matches_status
    }
}

#[derive(Clone)]
pub struct MaterialService {
    coordinator: Arc<RefreshCoordinator>,
    clock: Arc<dyn Clock>,
}

impl MaterialService {
    pub fn new(coordinator: Arc<RefreshCoordinator>, clock: Arc<dyn Clock>) -> Self {
        Self { coordinator, clock }
    }

    pub fn list(&self, filter: &MaterialFilter) -> Vec<BorrowedMaterial> {
        self.coordinator
            .snapshot()
            .materials
            .iter()
            .filter(|m| filter.matches(m))
            .cloned()
            .collect()
    }

    pub async fn lend(&self, payload: NewLoan) -> Result<(), AppError> {
        let row = payload.to_row(&datefmt::short_stamp(self.clock.now()))?;
        self.coordinator
            .commit_write(
                Alert::RegisterLoan,
                &[Collection::Materials.into()],
                self.coordinator.gateway().insert(Collection::Materials, row),
            )
            .await?;
        tracing::info!("🔧 Empréstimo de '{}' para {}", payload.material_name, payload.borrower_name);
        Ok(())
    }

    /// Registra a devolução.
    pub async fn give_back(&self, id: Uuid) -> Result<BorrowedMaterial, AppError> {
        let current = self.find(id)?;
        if current.status == LoanStatus::Devolvido {
            return Err(AppError::AlreadyTransitioned(LoanStatus::Devolvido.as_str()));
        }

        let stamp = datefmt::short_stamp(self.clock.now());
        let row = return_row(&stamp)?;
        let (changed, fresh) = self
            .coordinator
            .commit_transition(
                Alert::RegisterReturn,
                Collection::Materials,
                &[Collection::Materials.into()],
                self.coordinator.gateway().update(Collection::Materials, row, IdMatch::Eq(id)),
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
            Collection::Materials.table(),
            id
        );
        let mut updated = current;
        updated.status = LoanStatus::Devolvido;
        updated.return_date = Some(stamp);
        self.coordinator.patch(|snapshot| {
            if let Some(slot) = Arc::make_mut(&mut snapshot.materials).iter_mut().find(|m| m.id == id) {
                *slot = updated.clone();
            }
        });
        Ok(updated)
    }

    fn find(&self, id: Uuid) -> Result<BorrowedMaterial, AppError> {
        self.coordinator
            .snapshot()
            .materials
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or(AppError::RecordNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{common::clock::FixedClock, db::testing::ProbeGateway, models::collection::Scope};
    use serde_json::json;

    async fn service(at: &str) -> (MaterialService, Arc<RefreshCoordinator>) {
        let coordinator = Arc::new(RefreshCoordinator::new(Arc::new(ProbeGateway::new())));
        coordinator.refresh(&[Scope::ALL], false).await;
        (MaterialService::new(coordinator.clone(), Arc::new(FixedClock::at(at))), coordinator)
    }

    fn loan(name: &str) -> NewLoan {
        serde_json::from_value(json!({
            "materialName": name, "borrowerType": "morador", "borrowerName": "Maria",
            "unit": "101"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn return_is_one_way() {
        let (service, _) = service("2025-12-01 09:00").await;
        service.lend(loan("Escada")).await.unwrap();
        let id = service.list(&MaterialFilter::default())[0].id;

        let returned = service.give_back(id).await.unwrap();
        assert_eq!(returned.status, LoanStatus::Devolvido);
        assert_eq!(returned.return_date.as_deref(), Some("01/12/25 09:00"));

        assert!(matches!(
            service.give_back(id).await,
            Err(AppError::AlreadyTransitioned("Devolvido"))
        ));
    }

    #[tokio::test]
    async fn filters_by_loan_day_and_status() {
        let (service, _) = service("2025-12-01 09:00").await;
        service.lend(loan("Escada")).await.unwrap();
        service.lend(loan("Carrinho")).await.unwrap();

        let today = MaterialFilter {
            date: NaiveDate::from_ymd_opt(2025, 12, 1),
            status: LoanStatusFilter::Emprestados,
            ..Default::default()
        };
        assert_eq!(service.list(&today).len(), 2);

        let yesterday = MaterialFilter {
            date: NaiveDate::from_ymd_opt(2025, 11, 30),
            ..Default::default()
        };
        assert!(service.list(&yesterday).is_empty());

        let search = MaterialFilter {
            search: "carr".into(),
            ..Default::default()
        };
        assert_eq!(service.list(&search)[0].material_name, "Carrinho");
    }
}
