// src/services/time_record_service.rs

use std::sync::{
    atomic::{AtomicBool, Ordering as AtomicOrdering},
    Arc,
};

use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    common::{error::{Alert, AppError}, search::contains_ci},
    db::{gateway::SENTINEL_ID, IdMatch},
    models::{
        collection::Collection,
        time_record::{Shift, TimeRecord, TimeRecordForm},
    },
    services::refresh_service::RefreshCoordinator,
};

#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TimeRecordFilter {
    /// Nome do funcionário ou observações.
    #[serde(default)]
    pub search: String,
    #[param(inline)]
    pub shift: Option<Shift>,
    pub employee_id: Option<Uuid>,
}

impl TimeRecordFilter {
    pub fn matches(&self, record: &TimeRecord) -> bool {
        (contains_ci(&record.employee_name, &self.search)
            || contains_ci(&record.observations, &self.search))
            && self.shift.is_none_or(|s| record.shift == Some(s))
            && self.employee_id.is_none_or(|id| record.employee_id == Some(id))
    }
}

/// Resultado de uma gravação de ponto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    // Funcionário não existe mais no estado carregado: nada foi enviado.
    Skipped,
}

#[derive(Clone)]
pub struct TimeRecordService {
    coordinator: Arc<RefreshCoordinator>,
    clear_requested: Arc<AtomicBool>,
}

impl TimeRecordService {
    pub fn new(coordinator: Arc<RefreshCoordinator>) -> Self {
        Self {
            coordinator,
            clear_requested: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn list(&self, filter: &TimeRecordFilter) -> Vec<TimeRecord> {
        self.coordinator
            .snapshot()
            .time_records
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect()
    }

    /// Cria (`id = None`) ou edita um registro. O nome do funcionário é
    /// copiado do cadastro no momento da gravação.
    pub async fn save(&self, id: Option<Uuid>, form: TimeRecordForm) -> Result<SaveOutcome, AppError> {
        let snapshot = self.coordinator.snapshot();
        let Some(employee) = snapshot.employees.iter().find(|e| e.id == form.employee_id) else {
            tracing::warn!("Funcionário {} não encontrado; registro de ponto ignorado", form.employee_id);
            return Ok(SaveOutcome::Skipped);
        };

        let row = form.to_row(&employee.name)?;
        let gateway = self.coordinator.gateway();
        let scopes = [Collection::TimeRecords.into()];

        match id {
            None => {
                self.coordinator
                    .commit_write(Alert::SaveTimeRecord, &scopes, gateway.insert(Collection::TimeRecords, row))
                    .await?
            }
            Some(id) => {
                let changed = self
                    .coordinator
                    .commit_write(
                        Alert::SaveTimeRecord,
                        &scopes,
                        gateway.update(Collection::TimeRecords, row, IdMatch::Eq(id)),
                    )
                    .await?;
                if changed == 0 {
                    return Err(AppError::RecordNotFound(id));
                }
            }
        }

        Ok(SaveOutcome::Saved)
    }

    // --- LIMPAR TUDO (em duas etapas) ---

    pub fn request_clear_all(&self) {
        self.clear_requested.store(true, AtomicOrdering::SeqCst);
    }

    pub fn cancel_clear_all(&self) {
        self.clear_requested.store(false, AtomicOrdering::SeqCst);
    }

    pub fn is_clear_requested(&self) -> bool {
        self.clear_requested.load(AtomicOrdering::SeqCst)
    }

    /// Apaga todos os registros de ponto. Sem pedido anterior, não faz nada.
    pub async fn confirm_clear_all(&self) -> Result<u64, AppError> {
        if !self.clear_requested.swap(false, AtomicOrdering::SeqCst) {
            return Ok(0);
        }

        let removed = self
            .coordinator
            .commit_write(
                Alert::ClearTimeRecords,
                &[Collection::TimeRecords.into()],
                self.coordinator
                    .gateway()
                    .delete(Collection::TimeRecords, IdMatch::Neq(SENTINEL_ID)),
            )
            .await?;

        tracing::warn!("🧹 Folha de ponto limpa: {} registros removidos", removed);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{testing::ProbeGateway, Gateway},
        models::collection::Scope,
    };
    use serde_json::json;

    async fn setup() -> (TimeRecordService, Arc<ProbeGateway>, Uuid) {
        let gateway = Arc::new(ProbeGateway::new());
        gateway
            .inner
            .insert(
                Collection::Employees,
                json!({ "name": "Carlos", "role": "Porteiro", "shift": "diurno", "status": "ativo" })
                    .as_object()
                    .cloned()
                    .unwrap(),
            )
            .await
            .unwrap();
        let coordinator = Arc::new(RefreshCoordinator::new(gateway.clone()));
        coordinator.refresh(&[Scope::ALL], false).await;
        let employee_id = coordinator.snapshot().employees[0].id;
        (TimeRecordService::new(coordinator), gateway, employee_id)
    }

    fn form(employee_id: Uuid, shift: &str) -> TimeRecordForm {
        serde_json::from_value(json!({
            "employeeId": employee_id, "date": "2025-03-05", "shift": shift,
            "entryTime": "07:00", "exitTime": "19:00", "type": "normal"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn unknown_employee_is_a_silent_no_op() {
        let (service, gateway, _) = setup().await;
        let selects = ProbeGateway::count(&gateway.selects);

        let outcome = service.save(None, form(Uuid::new_v4(), "diurno")).await.unwrap();

        assert_eq!(outcome, SaveOutcome::Skipped);
        assert_eq!(ProbeGateway::count(&gateway.selects), selects);
        assert!(service.list(&TimeRecordFilter::default()).is_empty());
    }

    #[tokio::test]
    async fn employee_name_is_snapshotted() {
        let (service, _, employee_id) = setup().await;
        service.save(None, form(employee_id, "noturno")).await.unwrap();

        let records = service.list(&TimeRecordFilter {
            shift: Some(Shift::Noturno),
            employee_id: Some(employee_id),
            ..Default::default()
        });
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].employee_name, "Carlos");

        let day_shift = TimeRecordFilter {
            shift: Some(Shift::Diurno),
            ..Default::default()
        };
        assert!(service.list(&day_shift).is_empty());
    }

    #[tokio::test]
    async fn clear_all_needs_a_request_first() {
        let (service, gateway, employee_id) = setup().await;
        service.save(None, form(employee_id, "diurno")).await.unwrap();
        service.save(None, form(employee_id, "noturno")).await.unwrap();

        assert_eq!(service.confirm_clear_all().await.unwrap(), 0);
        assert_eq!(ProbeGateway::count(&gateway.deletes), 0);

        service.request_clear_all();
        service.cancel_clear_all();
        assert_eq!(service.confirm_clear_all().await.unwrap(), 0);

        service.request_clear_all();
        assert_eq!(service.confirm_clear_all().await.unwrap(), 2);
        assert!(!service.is_clear_requested());
        assert_eq!(ProbeGateway::count(&gateway.deletes), 1);
        assert!(service.list(&TimeRecordFilter::default()).is_empty());
    }
}
