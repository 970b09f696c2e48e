// src/services/visitor_service.rs

use std::{collections::HashMap, sync::Arc};

use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    common::{clock::Clock, datefmt, error::{Alert, AppError}, search::contains_ci},
    db::IdMatch,
    models::{
        collection::Collection,
        visitor::{exit_row, NewVisitor, Visitor, VisitorStatus},
    },
    services::refresh_service::RefreshCoordinator,
};

/// Mínimo de caracteres para sugerir visitantes já conhecidos.
const HISTORY_MIN_CHARS: usize = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VisitorStatusFilter {
    #[default]
    Todos,
    NoCondominio,
    Saiu,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct VisitorFilter {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    #[param(inline)]
    pub status: VisitorStatusFilter,
    /// Dia da entrada (AAAA-MM-DD).
    pub date: Option<NaiveDate>,
}

impl VisitorFilter {
    pub fn matches(&self, v: &Visitor) -> bool {
        let term = self.search.as_str();
        let matches_search = contains_ci(&v.name, term)
            || v.document.as_deref().is_some_and(|d| d.contains(term))
            || v.unit.contains(term)
            || v.resident_name.as_deref().is_some_and(|r| contains_ci(r, term));

        let matches_status = match self.status {
            VisitorStatusFilter::Todos => true,
            VisitorStatusFilter::NoCondominio => v.status == VisitorStatus::NoCondominio,
            VisitorStatusFilter::Saiu => v.status == VisitorStatus::Saiu,
        };

        datefmt::matches_day(&v.entry_time, self.date) && matches_search && matches_status
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// Trecho do nome digitado no formulário.
    pub name: String,
}

#[derive(Clone)]
pub struct VisitorService {
    coordinator: Arc<RefreshCoordinator>,
    clock: Arc<dyn Clock>,
}

impl VisitorService {
    pub fn new(coordinator: Arc<RefreshCoordinator>, clock: Arc<dyn Clock>) -> Self {
        Self { coordinator, clock }
    }

    pub fn list(&self, filter: &VisitorFilter) -> Vec<Visitor> {
        self.coordinator
            .snapshot()
            .visitors
            .iter()
            .filter(|v| filter.matches(v))
            .cloned()
            .collect()
    }

    /// Visitantes já conhecidos para o autocompletar do formulário.
    ///
    /// Um por nome (sem diferenciar maiúsculas), na ordem da primeira visita.
    /// Fica a visita mais antiga; uma posterior só a substitui quando a guardada
    /// não tem documento e a posterior tem.
    pub fn history(&self, name: &str) -> Vec<Visitor> {
        if name.chars().count() < HISTORY_MIN_CHARS {
            return Vec::new();
        }

        let snapshot = self.coordinator.snapshot();
        let mut order: Vec<String> = Vec::new();
        let mut unique: HashMap<String, &Visitor> = HashMap::new();

        // A fatia vem da mais nova para a mais velha.
        for visitor in snapshot.visitors.iter().rev() {
            let key = visitor.name.trim().to_lowercase();
            match unique.get(&key).copied() {
                None => {
                    order.push(key.clone());
                    unique.insert(key, visitor);
                }
                Some(existing) if !has_document(existing) && has_document(visitor) => {
                    unique.insert(key, visitor);
                }
                Some(_) => {}
            }
        }

        order
            .iter()
            .filter_map(|key| unique.get(key))
            .filter(|v| contains_ci(&v.name, name))
            .map(|v| (*v).clone())
            .collect()
    }

    pub async fn register_entry(&self, payload: NewVisitor) -> Result<(), AppError> {
        let row = payload.to_row(&datefmt::short_stamp(self.clock.now()))?;
        self.coordinator
            .commit_write(
                Alert::RegisterVisitor,
                &[Collection::Visitors.into()],
                self.coordinator.gateway().insert(Collection::Visitors, row),
            )
            .await?;
        tracing::info!("🚪 Entrada de {} para a unidade {}", payload.name, payload.unit);
        Ok(())
    }

    pub async fn register_exit(&self, id: Uuid) -> Result<Visitor, AppError> {
        let current = self.find(id)?;
        if current.status == VisitorStatus::Saiu {
            return Err(AppError::AlreadyTransitioned(VisitorStatus::Saiu.as_str()));
        }

        let stamp = datefmt::short_stamp(self.clock.now());
        let row = exit_row(&stamp)?;
        let (changed, fresh) = self
            .coordinator
            .commit_transition(
                Alert::RegisterExit,
                Collection::Visitors,
                &[Collection::Visitors.into()],
                self.coordinator.gateway().update(Collection::Visitors, row, IdMatch::Eq(id)),
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
            Collection::Visitors.table(),
            id
        );
        let mut updated = current;
        updated.status = VisitorStatus::Saiu;
        updated.exit_time = Some(stamp);
        self.coordinator.patch(|snapshot| {
            if let Some(slot) = Arc::make_mut(&mut snapshot.visitors).iter_mut().find(|v| v.id == id) {
                *slot = updated.clone();
            }
        });
        Ok(updated)
    }

    fn find(&self, id: Uuid) -> Result<Visitor, AppError> {
        self.coordinator
            .snapshot()
            .visitors
            .iter()
            .find(|v| v.id == id)
            .cloned()
            .ok_or(AppError::RecordNotFound(id))
    }
}

fn has_document(visitor: &Visitor) -> bool {
    visitor.document.as_deref().is_some_and(|d| !d.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::clock::FixedClock,
        db::{testing::ProbeGateway, Gateway},
        models::collection::Scope,
    };
    use serde_json::json;

    async fn service_with(visitors: Vec<serde_json::Value>) -> VisitorService {
        let gateway = Arc::new(ProbeGateway::new());
        for v in visitors {
            gateway
                .inner
                .insert(Collection::Visitors, v.as_object().cloned().unwrap())
                .await
                .unwrap();
        }
        let coordinator = Arc::new(RefreshCoordinator::new(gateway));
        coordinator.refresh(&[Scope::ALL], false).await;
        VisitorService::new(coordinator, Arc::new(FixedClock::at("2025-03-05 14:30")))
    }

    #[tokio::test]
    async fn history_needs_two_characters() {
        let service = service_with(vec![json!({ "name": "Ana", "unit": "101" })]).await;
        assert!(service.history("A").is_empty());
        assert_eq!(service.history("An").len(), 1);
    }

    #[tokio::test]
    async fn history_is_unique_by_name_and_prefers_a_document() {
        // Inseridos do mais velho para o mais novo.
        let service = service_with(vec![
            json!({ "name": "Bruno Lima", "unit": "101", "document": "12.345.678-9" }),
            json!({ "name": "bruno lima ", "unit": "102" }),
            json!({ "name": "Bruna Costa", "unit": "103" }),
        ])
        .await;

        let found = service.history("brun");
        let names: Vec<&str> = found.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["Bruno Lima", "Bruna Costa"]);
        assert_eq!(found[0].document.as_deref(), Some("12.345.678-9"));
    }

    #[tokio::test]
    async fn history_keeps_the_oldest_visit_when_both_have_documents() {
        let service = service_with(vec![
            json!({ "name": "Ana", "unit": "101", "document": "111" }),
            json!({ "name": "Ana", "unit": "101", "document": "222" }),
        ])
        .await;
        let found = service.history("an");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].document.as_deref(), Some("111"));
    }

    #[tokio::test]
    async fn history_takes_a_later_document_when_the_first_visit_had_none() {
        let service = service_with(vec![
            json!({ "name": "Ana", "unit": "101" }),
            json!({ "name": "ana", "unit": "102", "document": "333" }),
        ])
        .await;
        let found = service.history("ana");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].document.as_deref(), Some("333"));
    }

    #[tokio::test]
    async fn exit_is_stamped_once() {
        let service = service_with(vec![]).await;
        let payload: NewVisitor =
            serde_json::from_value(json!({ "name": "Carla", "unit": "304" })).unwrap();
        service.register_entry(payload).await.unwrap();
        let inside = VisitorFilter {
            status: VisitorStatusFilter::NoCondominio,
            date: NaiveDate::from_ymd_opt(2025, 3, 5),
            ..Default::default()
        };
        let id = service.list(&inside)[0].id;

        let visitor = service.register_exit(id).await.unwrap();
        assert_eq!(visitor.status, VisitorStatus::Saiu);
        assert_eq!(visitor.exit_time.as_deref(), Some("05/03/25 14:30"));
        assert!(service.list(&inside).is_empty());
        assert!(matches!(
            service.register_exit(id).await,
            Err(AppError::AlreadyTransitioned("saiu"))
        ));
    }
}
