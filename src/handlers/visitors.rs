// src/handlers/visitors.rs

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
    models::visitor::{NewVisitor, Visitor},
    services::visitor_service::{HistoryQuery, VisitorFilter},
};

// GET /api/visitors
#[utoipa::path(
    get,
    path = "/api/visitors",
    tag = "Visitantes",
    params(VisitorFilter),
    responses((status = 200, description = "Visitantes filtrados", body = [Visitor]))
)]
pub async fn list_visitors(
    State(app_state): State<AppState>,
    Query(filter): Query<VisitorFilter>,
) -> impl IntoResponse {
    Json(app_state.visitor_service.list(&filter))
}

// GET /api/visitors/history
#[utoipa::path(
    get,
    path = "/api/visitors/history",
    tag = "Visitantes",
    params(HistoryQuery),
    responses((status = 200, description = "Visitantes já conhecidos com nome parecido", body = [Visitor]))
)]
pub async fn visitor_history(
    State(app_state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> impl IntoResponse {
    Json(app_state.visitor_service.history(&query.name))
}

// POST /api/visitors
#[utoipa::path(
    post,
    path = "/api/visitors",
    tag = "Visitantes",
    request_body = NewVisitor,
    responses(
        (status = 201, description = "Entrada registrada"),
        (status = 400, description = "Dados inválidos"),
        (status = 502, description = "Backend recusou a gravação")
    )
)]
pub async fn register_entry(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<NewVisitor>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .visitor_service
        .register_entry(payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::CREATED)
}

// POST /api/visitors/{id}/exit
#[utoipa::path(
    post,
    path = "/api/visitors/{id}/exit",
    tag = "Visitantes",
    params(("id" = Uuid, Path, description = "ID do visitante")),
    responses(
        (status = 200, description = "Saída registrada", body = Visitor),
        (status = 404, description = "Visitante não encontrado"),
        (status = 409, description = "Saída já registrada")
    )
)]
pub async fn register_exit(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let visitor = app_state
        .visitor_service
        .register_exit(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(visitor)))
}
