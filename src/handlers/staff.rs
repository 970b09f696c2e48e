// src/handlers/staff.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::{
        employee::{Employee, EmployeeForm},
        occurrence::{NewOccurrence, Occurrence},
    },
    services::{registry_service::SearchQuery, staff_service::EmployeeFilter},
};

// --- FUNCIONÁRIOS ---

// GET /api/employees
#[utoipa::path(
    get,
    path = "/api/employees",
    tag = "Funcionários",
    params(EmployeeFilter),
    responses((status = 200, description = "Funcionários", body = [Employee]))
)]
pub async fn list_employees(
    State(app_state): State<AppState>,
    Query(filter): Query<EmployeeFilter>,
) -> impl IntoResponse {
    Json(app_state.staff_service.list_employees(&filter))
}

// POST /api/employees
#[utoipa::path(
    post,
    path = "/api/employees",
    tag = "Funcionários",
    request_body = EmployeeForm,
    responses(
        (status = 201, description = "Funcionário cadastrado"),
        (status = 400, description = "Dados inválidos"),
        (status = 502, description = "Backend recusou a gravação")
    )
)]
pub async fn create_employee(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<EmployeeForm>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .staff_service
        .save_employee(None, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::CREATED)
}

// PUT /api/employees/{id}
#[utoipa::path(
    put,
    path = "/api/employees/{id}",
    tag = "Funcionários",
    params(("id" = Uuid, Path, description = "ID do funcionário")),
    request_body = EmployeeForm,
    responses(
        (status = 204, description = "Funcionário atualizado"),
        (status = 404, description = "Funcionário não encontrado")
    )
)]
pub async fn update_employee(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<EmployeeForm>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .staff_service
        .save_employee(Some(id), payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// --- OCORRÊNCIAS ---

// GET /api/occurrences
#[utoipa::path(
    get,
    path = "/api/occurrences",
    tag = "Ocorrências",
    params(SearchQuery),
    responses((status = 200, description = "Passagens de turno, da mais nova para a mais velha", body = [Occurrence]))
)]
pub async fn list_occurrences(
    State(app_state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    Json(app_state.staff_service.list_occurrences(&query.search))
}

// POST /api/occurrences
#[utoipa::path(
    post,
    path = "/api/occurrences",
    tag = "Ocorrências",
    request_body = NewOccurrence,
    responses(
        (status = 201, description = "Ocorrência registrada"),
        (status = 400, description = "Dados inválidos"),
        (status = 502, description = "Backend recusou a gravação")
    )
)]
pub async fn create_occurrence(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<NewOccurrence>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .staff_service
        .create_occurrence(payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::CREATED)
}
