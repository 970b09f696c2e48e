// src/services/registry_service.rs

// Cadastros simples: moradores e empresas.

use std::sync::Arc;

use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::{error::{Alert, AppError}, search::any_contains},
    models::{
        collection::{Collection, Scope},
        company::{Company, NewCompany},
        resident::{NewResident, Resident},
    },
    services::refresh_service::RefreshCoordinator,
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    #[serde(default)]
    pub search: String,
}

#[derive(Clone)]
pub struct RegistryService {
    coordinator: Arc<RefreshCoordinator>,
}

impl RegistryService {
    pub fn new(coordinator: Arc<RefreshCoordinator>) -> Self {
        Self { coordinator }
    }

    // =========================================================================
    //  MORADORES
    // =========================================================================

    pub fn list_residents(&self, search: &str) -> Vec<Resident> {
        self.coordinator
            .snapshot()
            .residents
            .iter()
            .filter(|r| any_contains([r.name.as_str(), r.unit.as_str(), r.block.as_str()], search))
            .cloned()
            .collect()
    }

    /// Também usado pelo atalho de cadastro na tela de encomendas:
    /// em ambos os casos só a fatia de moradores é recarregada.
    pub async fn create_resident(&self, payload: NewResident) -> Result<(), AppError> {
        let row = payload.to_row()?;
        self.coordinator
            .commit_write(
                Alert::SaveResident,
                &[Scope::One(Collection::Residents)],
                self.coordinator.gateway().insert(Collection::Residents, row),
            )
            .await?;
        tracing::info!("🏠 Morador cadastrado: {} ({} / {})", payload.name, payload.unit, payload.block);
        Ok(())
    }

    // =========================================================================
    //  EMPRESAS
    // =========================================================================

    pub fn list_companies(&self, search: &str) -> Vec<Company> {
        self.coordinator
            .snapshot()
            .companies
            .iter()
            .filter(|c| {
                any_contains(
                    [c.name.as_str(), c.cnpj.as_deref().unwrap_or_default()],
                    search,
                )
            })
            .cloned()
            .collect()
    }

    pub async fn create_company(&self, payload: NewCompany) -> Result<(), AppError> {
        let row = payload.to_row()?;
        self.coordinator
            .commit_write(
                Alert::SaveCompany,
                &[Scope::One(Collection::Companies)],
                self.coordinator.gateway().insert(Collection::Companies, row),
            )
            .await
    }
}
