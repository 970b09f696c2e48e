// src/handlers/session.rs

use axum::{
    extract::{Path, State},
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
        employee::EmployeeStatus,
        occurrence::NewOccurrence,
        session::{self, LoginPayload, MenuItem, NavigatePayload, NotepadAction, ShellView, SidebarPayload},
    },
    services::staff_service::EmployeeFilter,
};

// GET /api/session
#[utoipa::path(
    get,
    path = "/api/session",
    tag = "Sessão",
    responses((status = 200, description = "Estado da casca (usuário, página, menu lateral, bloco de notas)", body = ShellView))
)]
pub async fn get_shell(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(app_state.session_service.view())
}

// GET /api/session/menu
#[utoipa::path(
    get,
    path = "/api/session/menu",
    tag = "Sessão",
    responses((status = 200, description = "Árvore do menu lateral", body = [MenuItem]))
)]
pub async fn get_menu() -> impl IntoResponse {
    Json(session::menu())
}

// GET /api/session/employees
#[utoipa::path(
    get,
    path = "/api/session/employees",
    tag = "Sessão",
    responses((status = 200, description = "Nomes dos funcionários ativos para a tela de login", body = [String]))
)]
pub async fn login_names(State(app_state): State<AppState>) -> impl IntoResponse {
    let active = EmployeeFilter {
        status: Some(EmployeeStatus::Ativo),
        ..Default::default()
    };
    let names: Vec<String> = app_state
        .staff_service
        .list_employees(&active)
        .into_iter()
        .map(|e| e.name)
        .collect();
    Json(names)
}

// POST /api/session/login
#[utoipa::path(
    post,
    path = "/api/session/login",
    tag = "Sessão",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Turno iniciado", body = ShellView),
        (status = 400, description = "Nome inválido")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let view = app_state
        .session_service
        .login(&payload.employee_name)
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(view)))
}

// POST /api/session/logout/request
#[utoipa::path(
    post,
    path = "/api/session/logout/request",
    tag = "Sessão",
    responses((status = 200, description = "Confirmação de saída aberta", body = ShellView))
)]
pub async fn request_logout(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(app_state.session_service.request_logout())
}

// POST /api/session/logout/cancel
#[utoipa::path(
    post,
    path = "/api/session/logout/cancel",
    tag = "Sessão",
    responses((status = 200, description = "Confirmação de saída fechada", body = ShellView))
)]
pub async fn cancel_logout(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(app_state.session_service.cancel_logout())
}

// POST /api/session/logout/confirm
#[utoipa::path(
    post,
    path = "/api/session/logout/confirm",
    tag = "Sessão",
    responses((status = 200, description = "Turno encerrado (ou nada, sem pedido aberto)", body = ShellView))
)]
pub async fn confirm_logout(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let view = app_state
        .session_service
        .confirm_logout()
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(view))
}

// --- CASCA (requer turno) ---

// PUT /api/session/page
#[utoipa::path(
    put,
    path = "/api/session/page",
    tag = "Sessão",
    request_body = NavigatePayload,
    responses((status = 200, description = "Página ativa alterada", body = ShellView))
)]
pub async fn navigate(
    State(app_state): State<AppState>,
    Json(payload): Json<NavigatePayload>,
) -> impl IntoResponse {
    Json(app_state.session_service.navigate(payload.page))
}

// PUT /api/session/sidebar
#[utoipa::path(
    put,
    path = "/api/session/sidebar",
    tag = "Sessão",
    request_body = SidebarPayload,
    responses((status = 200, description = "Menu lateral aberto ou fechado", body = ShellView))
)]
pub async fn set_sidebar(
    State(app_state): State<AppState>,
    Json(payload): Json<SidebarPayload>,
) -> impl IntoResponse {
    Json(app_state.session_service.set_sidebar(payload.open))
}

// POST /api/session/notepad/{action}
#[utoipa::path(
    post,
    path = "/api/session/notepad/{action}",
    tag = "Sessão",
    params(("action" = NotepadAction, Path, description = "open, close, minimize ou maximize")),
    responses((status = 200, description = "Bloco de notas atualizado", body = ShellView))
)]
pub async fn notepad_action(
    State(app_state): State<AppState>,
    Path(action): Path<NotepadAction>,
) -> impl IntoResponse {
    Json(app_state.session_service.notepad(action))
}

// POST /api/session/notepad
#[utoipa::path(
    post,
    path = "/api/session/notepad",
    tag = "Sessão",
    request_body = NewOccurrence,
    responses(
        (status = 200, description = "Ocorrência registrada; página ativa vira ocorrências", body = ShellView),
        (status = 502, description = "Backend recusou a gravação")
    )
)]
pub async fn save_notepad(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<NewOccurrence>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let view = app_state
        .session_service
        .save_notepad(payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(view)))
}
