// src/handlers/registry.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::{
        company::{Company, NewCompany},
        resident::{NewResident, Resident},
    },
    services::registry_service::SearchQuery,
};

// --- MORADORES ---

// GET /api/residents
#[utoipa::path(
    get,
    path = "/api/residents",
    tag = "Cadastro",
    params(SearchQuery),
    responses((status = 200, description = "Moradores", body = [Resident]))
)]
pub async fn list_residents(
    State(app_state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    Json(app_state.registry_service.list_residents(&query.search))
}

// POST /api/residents
#[utoipa::path(
    post,
    path = "/api/residents",
    tag = "Cadastro",
    request_body = NewResident,
    responses(
        (status = 201, description = "Morador cadastrado"),
        (status = 400, description = "Dados inválidos"),
        (status = 502, description = "Backend recusou a gravação")
    )
)]
pub async fn create_resident(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<NewResident>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .registry_service
        .create_resident(payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::CREATED)
}

// --- EMPRESAS ---

// GET /api/companies
#[utoipa::path(
    get,
    path = "/api/companies",
    tag = "Cadastro",
    params(SearchQuery),
    responses((status = 200, description = "Empresas", body = [Company]))
)]
pub async fn list_companies(
    State(app_state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    Json(app_state.registry_service.list_companies(&query.search))
}

// POST /api/companies
#[utoipa::path(
    post,
    path = "/api/companies",
    tag = "Cadastro",
    request_body = NewCompany,
    responses(
        (status = 201, description = "Empresa cadastrada"),
        (status = 400, description = "Dados inválidos"),
        (status = 502, description = "Backend recusou a gravação")
    )
)]
pub async fn create_company(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<NewCompany>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .registry_service
        .create_company(payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::CREATED)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        build_router,
        db::testing::ProbeGateway,
        handlers::test_support::{send, state_with},
    };
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn refused_write_becomes_a_localized_alert() {
        let gateway = Arc::new(ProbeGateway::new());
        let state = state_with(gateway.clone());
        state.session_service.login("Carlos").unwrap();
        let app = build_router(state);
        gateway.fail_writes(true);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/residents",
            Some(json!({ "name": "Maria", "unit": "101", "block": "A" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "Erro ao salvar morador");
    }
}
