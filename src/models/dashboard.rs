// src/models/dashboard.rs

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::occurrence::Occurrence;

/// Cards do topo do painel.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub pending_packages: usize,    // Encomendas aguardando retirada
    pub picked_up_today: usize,     // Retiradas com carimbo de hoje
    pub visitors_inside: usize,     // Visitantes ainda no condomínio
    pub materials_on_loan: usize,   // Materiais emprestados
    pub active_employees: usize,
    pub latest_occurrences: Vec<Occurrence>, // As cinco mais recentes
}
