// src/services/staff_service.rs

// Funcionários e passagem de turno (ocorrências).

use std::sync::Arc;

use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    common::{clock::Clock, datefmt, error::{Alert, AppError}, search::contains_ci},
    db::IdMatch,
    models::{
        collection::Collection,
        employee::{Employee, EmployeeForm, EmployeeStatus},
        occurrence::{NewOccurrence, Occurrence},
    },
    services::refresh_service::RefreshCoordinator,
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct EmployeeFilter {
    /// Nome, CPF ou cargo.
    #[serde(default)]
    pub search: String,
    #[param(inline)]
    pub status: Option<EmployeeStatus>,
}

#[derive(Clone)]
pub struct StaffService {
    coordinator: Arc<RefreshCoordinator>,
    clock: Arc<dyn Clock>,
}

impl StaffService {
    pub fn new(coordinator: Arc<RefreshCoordinator>, clock: Arc<dyn Clock>) -> Self {
        Self { coordinator, clock }
    }

    // =========================================================================
    //  FUNCIONÁRIOS
    // =========================================================================

    pub fn list_employees(&self, filter: &EmployeeFilter) -> Vec<Employee> {
        let term = filter.search.as_str();
        self.coordinator
            .snapshot()
            .employees
            .iter()
            .filter(|e| {
                (contains_ci(&e.name, term) || e.cpf.contains(term) || contains_ci(&e.role, term))
                    && filter.status.is_none_or(|s| s == e.status)
            })
            .cloned()
            .collect()
    }

    /// Cadastra (`id = None`) ou edita um funcionário.
    pub async fn save_employee(&self, id: Option<Uuid>, form: EmployeeForm) -> Result<(), AppError> {
        let row = form.to_row()?;
        let gateway = self.coordinator.gateway();
        let scopes = [Collection::Employees.into()];

        match id {
            None => {
                self.coordinator
                    .commit_write(Alert::SaveEmployee, &scopes, gateway.insert(Collection::Employees, row))
                    .await?
            }
            Some(id) => {
                let changed = self
                    .coordinator
                    .commit_write(
                        Alert::SaveEmployee,
                        &scopes,
                        gateway.update(Collection::Employees, row, IdMatch::Eq(id)),
                    )
                    .await?;
                if changed == 0 {
                    return Err(AppError::RecordNotFound(id));
                }
            }
        }

        tracing::info!("👷 Funcionário salvo: {}", form.name);
        Ok(())
    }

    // =========================================================================
    //  OCORRÊNCIAS
    // =========================================================================

    pub fn list_occurrences(&self, search: &str) -> Vec<Occurrence> {
        self.coordinator
            .snapshot()
            .occurrences
            .iter()
            .filter(|o| {
                contains_ci(&o.description, search)
                    || contains_ci(&o.outgoing_employee_name, search)
                    || contains_ci(&o.incoming_employee_name, search)
            })
            .cloned()
            .collect()
    }

    /// Registra a passagem de turno com o carimbo por extenso.
    pub async fn create_occurrence(&self, payload: NewOccurrence) -> Result<(), AppError> {
        let timestamp = datefmt::occurrence_stamp(self.clock.now());
        let row = payload.to_row(&timestamp)?;
        self.coordinator
            .commit_write(
                Alert::SaveOccurrence,
                &[Collection::Occurrences.into()],
                self.coordinator.gateway().insert(Collection::Occurrences, row),
            )
            .await?;
        tracing::info!(
            "📝 Passagem de turno: {} -> {}",
            payload.outgoing_employee_name,
            payload.incoming_employee_name
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{common::clock::FixedClock, db::testing::ProbeGateway, models::collection::Scope};
    use serde_json::json;

    async fn service() -> StaffService {
        let coordinator = Arc::new(RefreshCoordinator::new(Arc::new(ProbeGateway::new())));
        coordinator.refresh(&[Scope::ALL], false).await;
        StaffService::new(coordinator, Arc::new(FixedClock::at("2025-03-05 07:05")))
    }

    fn employee(name: &str, status: &str) -> EmployeeForm {
        serde_json::from_value(json!({
            "name": name, "cpf": "123.456.789-00", "role": "Porteiro",
            "shift": "diurno", "status": status
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn edit_keeps_one_record() {
        let service = service().await;
        service.save_employee(None, employee("Carlos", "ativo")).await.unwrap();
        let id = service.list_employees(&EmployeeFilter::default())[0].id;

        service.save_employee(Some(id), employee("Carlos Souza", "ferias")).await.unwrap();

        let all = service.list_employees(&EmployeeFilter::default());
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Carlos Souza");
        let active = EmployeeFilter {
            status: Some(EmployeeStatus::Ativo),
            ..Default::default()
        };
        assert!(service.list_employees(&active).is_empty());
    }

    #[tokio::test]
    async fn editing_a_missing_employee_is_not_found() {
        let service = service().await;
        let missing = Uuid::new_v4();
        let result = service.save_employee(Some(missing), employee("Ana", "ativo")).await;
        assert!(matches!(result, Err(AppError::RecordNotFound(id)) if id == missing));
    }

    #[tokio::test]
    async fn occurrences_use_the_long_portuguese_stamp() {
        let service = service().await;
        let payload: NewOccurrence = serde_json::from_value(json!({
            "outgoingEmployeeName": "Carlos", "incomingEmployeeName": "Ana",
            "description": "Portão da garagem com defeito"
        }))
        .unwrap();
        service.create_occurrence(payload).await.unwrap();

        let found = service.list_occurrences("garagem");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].timestamp, "5 de março de 2025 às 07:05");
        assert_eq!(service.list_occurrences("ana").len(), 1);
    }
}
