// src/handlers/time_records.rs

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::time_record::{TimeRecord, TimeRecordForm},
    services::time_record_service::{SaveOutcome, TimeRecordFilter},
};

const PDF_TITLE: &str = "Registros de ponto";

// GET /api/time-records
#[utoipa::path(
    get,
    path = "/api/time-records",
    tag = "Folha de Ponto",
    params(TimeRecordFilter),
    responses((status = 200, description = "Registros filtrados", body = [TimeRecord]))
)]
pub async fn list_records(
    State(app_state): State<AppState>,
    Query(filter): Query<TimeRecordFilter>,
) -> impl IntoResponse {
    Json(app_state.time_record_service.list(&filter))
}

// POST /api/time-records
#[utoipa::path(
    post,
    path = "/api/time-records",
    tag = "Folha de Ponto",
    request_body = TimeRecordForm,
    responses(
        (status = 201, description = "Registro gravado"),
        (status = 204, description = "Funcionário não encontrado: nada foi gravado"),
        (status = 400, description = "Dados inválidos"),
        (status = 502, description = "Backend recusou a gravação")
    )
)]
pub async fn create_record(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<TimeRecordForm>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let outcome = app_state
        .time_record_service
        .save(None, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(match outcome {
        SaveOutcome::Saved => StatusCode::CREATED,
        SaveOutcome::Skipped => StatusCode::NO_CONTENT,
    })
}

// PUT /api/time-records/{id}
#[utoipa::path(
    put,
    path = "/api/time-records/{id}",
    tag = "Folha de Ponto",
    params(("id" = Uuid, Path, description = "ID do registro")),
    request_body = TimeRecordForm,
    responses(
        (status = 204, description = "Registro atualizado (ou ignorado se o funcionário sumiu)"),
        (status = 404, description = "Registro não encontrado")
    )
)]
pub async fn update_record(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<TimeRecordForm>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .time_record_service
        .save(Some(id), payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// --- LIMPAR TUDO ---

// GET /api/time-records/clear
#[utoipa::path(
    get,
    path = "/api/time-records/clear",
    tag = "Folha de Ponto",
    responses((status = 200, description = "Se há confirmação de limpeza aberta"))
)]
pub async fn clear_state(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "requested": app_state.time_record_service.is_clear_requested() }))
}

// POST /api/time-records/clear/request
#[utoipa::path(
    post,
    path = "/api/time-records/clear/request",
    tag = "Folha de Ponto",
    responses((status = 204, description = "Confirmação aberta"))
)]
pub async fn request_clear(State(app_state): State<AppState>) -> impl IntoResponse {
    app_state.time_record_service.request_clear_all();
    StatusCode::NO_CONTENT
}

// POST /api/time-records/clear/cancel
#[utoipa::path(
    post,
    path = "/api/time-records/clear/cancel",
    tag = "Folha de Ponto",
    responses((status = 204, description = "Confirmação fechada"))
)]
pub async fn cancel_clear(State(app_state): State<AppState>) -> impl IntoResponse {
    app_state.time_record_service.cancel_clear_all();
    StatusCode::NO_CONTENT
}

// POST /api/time-records/clear/confirm
#[utoipa::path(
    post,
    path = "/api/time-records/clear/confirm",
    tag = "Folha de Ponto",
    responses(
        (status = 200, description = "Quantidade de registros removidos (0 sem pedido aberto)"),
        (status = 502, description = "Backend recusou a exclusão")
    )
)]
pub async fn confirm_clear(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let removed = app_state
        .time_record_service
        .confirm_clear_all()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(json!({ "removed": removed }))))
}

// --- EXPORTAÇÃO ---

// GET /api/time-records/export.csv
#[utoipa::path(
    get,
    path = "/api/time-records/export.csv",
    tag = "Folha de Ponto",
    params(TimeRecordFilter),
    responses((status = 200, description = "Planilha CSV (separador ';')", content_type = "text/csv"))
)]
pub async fn export_csv(
    State(app_state): State<AppState>,
    Query(filter): Query<TimeRecordFilter>,
) -> Response {
    let records = app_state.time_record_service.list(&filter);
    let csv = app_state.report_service.time_sheet_csv(&records);

    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
        (header::CONTENT_DISPOSITION, "attachment; filename=\"folha_de_ponto.csv\""),
    ];
    (headers, csv).into_response()
}

// GET /api/time-records/print.pdf
#[utoipa::path(
    get,
    path = "/api/time-records/print.pdf",
    tag = "Folha de Ponto",
    params(TimeRecordFilter),
    responses(
        (status = 200, description = "Folha de ponto para impressão", content_type = "application/pdf"),
        (status = 500, description = "Fonte do PDF não encontrada")
    )
)]
pub async fn print_pdf(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filter): Query<TimeRecordFilter>,
) -> Result<Response, ApiError> {
    let records = app_state.time_record_service.list(&filter);
    let pdf_bytes = app_state
        .report_service
        .time_sheet_pdf(&records, PDF_TITLE)
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let headers = [
        (header::CONTENT_TYPE, "application/pdf"),
        (header::CONTENT_DISPOSITION, "inline; filename=\"folha_de_ponto.pdf\""),
    ];
    Ok((headers, pdf_bytes).into_response())
}
