// src/handlers/delivery.rs

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
    models::delivery::{DeliveryDriver, DeliveryVisit, DriverForm, VisitDaySummary, VisitForm},
    services::{
        delivery_service::{DriverSaveQuery, SummaryQuery, VisitFilter},
        registry_service::SearchQuery,
    },
};

// --- ENTREGADORES ---

// GET /api/delivery/drivers
#[utoipa::path(
    get,
    path = "/api/delivery/drivers",
    tag = "Entregadores",
    params(SearchQuery),
    responses((status = 200, description = "Entregadores", body = [DeliveryDriver]))
)]
pub async fn list_drivers(
    State(app_state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    Json(app_state.delivery_service.list_drivers(&query.search))
}

// POST /api/delivery/drivers
#[utoipa::path(
    post,
    path = "/api/delivery/drivers",
    tag = "Entregadores",
    params(DriverSaveQuery),
    request_body = DriverForm,
    responses(
        (status = 201, description = "Entregador cadastrado"),
        (status = 400, description = "Dados inválidos"),
        (status = 502, description = "Backend recusou a gravação")
    )
)]
pub async fn create_driver(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<DriverSaveQuery>,
    Json(payload): Json<DriverForm>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .delivery_service
        .save_driver(None, payload, query.from)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::CREATED)
}

// PUT /api/delivery/drivers/{id}
#[utoipa::path(
    put,
    path = "/api/delivery/drivers/{id}",
    tag = "Entregadores",
    params(("id" = Uuid, Path, description = "ID do entregador"), DriverSaveQuery),
    request_body = DriverForm,
    responses(
        (status = 204, description = "Entregador atualizado"),
        (status = 404, description = "Entregador não encontrado")
    )
)]
pub async fn update_driver(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Query(query): Query<DriverSaveQuery>,
    Json(payload): Json<DriverForm>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .delivery_service
        .save_driver(Some(id), payload, query.from)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// --- VISITAS ---

// GET /api/delivery/visits
#[utoipa::path(
    get,
    path = "/api/delivery/visits",
    tag = "Visitas de Entregadores",
    params(VisitFilter),
    responses((status = 200, description = "Visitas filtradas", body = [DeliveryVisit]))
)]
pub async fn list_visits(
    State(app_state): State<AppState>,
    Query(filter): Query<VisitFilter>,
) -> impl IntoResponse {
    Json(app_state.delivery_service.list_visits(&filter))
}

// GET /api/delivery/visits/summary
#[utoipa::path(
    get,
    path = "/api/delivery/visits/summary",
    tag = "Visitas de Entregadores",
    params(SummaryQuery),
    responses((status = 200, description = "Visitas e volumes do dia", body = VisitDaySummary))
)]
pub async fn day_summary(
    State(app_state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> impl IntoResponse {
    Json(app_state.delivery_service.day_summary(query.date))
}

// POST /api/delivery/visits
#[utoipa::path(
    post,
    path = "/api/delivery/visits",
    tag = "Visitas de Entregadores",
    request_body = VisitForm,
    responses(
        (status = 201, description = "Visita registrada"),
        (status = 400, description = "Dados inválidos"),
        (status = 502, description = "Backend recusou a gravação")
    )
)]
pub async fn create_visit(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<VisitForm>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .delivery_service
        .save_visit(None, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::CREATED)
}

// PUT /api/delivery/visits/{id}
#[utoipa::path(
    put,
    path = "/api/delivery/visits/{id}",
    tag = "Visitas de Entregadores",
    params(("id" = Uuid, Path, description = "ID da visita")),
    request_body = VisitForm,
    responses(
        (status = 204, description = "Visita atualizada"),
        (status = 404, description = "Visita não encontrada")
    )
)]
pub async fn update_visit(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<VisitForm>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .delivery_service
        .save_visit(Some(id), payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
