// src/middleware/auth.rs

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
};

/// Barra as rotas de recursos enquanto ninguém fez o login de turno.
pub async fn shell_guard(
    State(app_state): State<AppState>,
    locale: Locale,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !app_state.session_service.is_authenticated() {
        tracing::debug!("Acesso negado a {}: turno não iniciado", request.uri().path());
        return Err(AppError::Unauthenticated.to_api_error(&locale, &app_state.i18n_store));
    }

    Ok(next.run(request).await)
}
