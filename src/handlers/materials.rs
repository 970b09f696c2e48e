// src/handlers/materials.rs

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
    models::material::{BorrowedMaterial, NewLoan},
    services::material_service::MaterialFilter,
};

// GET /api/materials
#[utoipa::path(
    get,
    path = "/api/materials",
    tag = "Materiais",
    params(MaterialFilter),
    responses((status = 200, description = "Empréstimos filtrados", body = [BorrowedMaterial]))
)]
pub async fn list_loans(
    State(app_state): State<AppState>,
    Query(filter): Query<MaterialFilter>,
) -> impl IntoResponse {
    Json(app_state.material_service.list(&filter))
}

// POST /api/materials
#[utoipa::path(
    post,
    path = "/api/materials",
    tag = "Materiais",
    request_body = NewLoan,
    responses(
        (status = 201, description = "Empréstimo registrado"),
        (status = 400, description = "Dados inválidos"),
        (status = 502, description = "Backend recusou a gravação")
    )
)]
pub async fn lend_material(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<NewLoan>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .material_service
        .lend(payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::CREATED)
}

// POST /api/materials/{id}/return
#[utoipa::path(
    post,
    path = "/api/materials/{id}/return",
    tag = "Materiais",
    params(("id" = Uuid, Path, description = "ID do empréstimo")),
    responses(
        (status = 200, description = "Devolução registrada", body = BorrowedMaterial),
        (status = 404, description = "Empréstimo não encontrado"),
        (status = 409, description = "Material já devolvido")
    )
)]
pub async fn return_material(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let loan = app_state
        .material_service
        .give_back(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(loan)))
}
