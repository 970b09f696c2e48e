// src/services/dashboard_service.rs

use std::sync::Arc;

use crate::{
    common::{clock::Clock, datefmt},
    models::{
        dashboard::DashboardSummary,
        employee::EmployeeStatus,
        material::LoanStatus,
        package::PickupStatus,
        visitor::VisitorStatus,
    },
    services::refresh_service::RefreshCoordinator,
};

const LATEST_OCCURRENCES: usize = 5;

#[derive(Clone)]
pub struct DashboardService {
    coordinator: Arc<RefreshCoordinator>,
    clock: Arc<dyn Clock>,
}

impl DashboardService {
    pub fn new(coordinator: Arc<RefreshCoordinator>, clock: Arc<dyn Clock>) -> Self {
        Self { coordinator, clock }
    }

    /// Contadores calculados direto da fotografia atual; nada vai ao backend.
    pub fn get_summary(&self) -> DashboardSummary {
        let snapshot = self.coordinator.snapshot();
        let today = Some(self.clock.now().date());

        let pending_packages = snapshot
            .packages
            .iter()
            .filter(|p| p.status == PickupStatus::AwaitingPickup)
            .count();
        let picked_up_today = snapshot
            .packages
            .iter()
            .filter_map(|p| p.picked_up_at.as_deref())
            .filter(|stamp| datefmt::matches_day(stamp, today))
            .count();

        DashboardSummary {
            pending_packages,
            picked_up_today,
            visitors_inside: snapshot
                .visitors
                .iter()
                .filter(|v| v.status == VisitorStatus::NoCondominio)
                .count(),
            materials_on_loan: snapshot
                .materials
                .iter()
                .filter(|m| m.status == LoanStatus::Emprestado)
                .count(),
            active_employees: snapshot
                .employees
                .iter()
                .filter(|e| e.status == EmployeeStatus::Ativo)
                .count(),
            // A coleção já chega da mais nova para a mais velha.
            latest_occurrences: snapshot
                .occurrences
                .iter()
                .take(LATEST_OCCURRENCES)
                .cloned()
                .collect(),
        }
    }
}
