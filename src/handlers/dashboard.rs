// src/handlers/dashboard.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{config::AppState, models::dashboard::DashboardSummary};

// GET /api/dashboard/summary
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Resumo operacional do dia", body = DashboardSummary),
        (status = 401, description = "Turno não iniciado")
    )
)]
pub async fn get_summary(State(app_state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(app_state.dashboard_service.get_summary()))
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::{app, send};
    use axum::http::{Method, StatusCode};

    #[tokio::test]
    async fn resource_routes_need_a_shift_session() {
        let (app, state) = app().await;

        let (status, body) = send(&app, Method::GET, "/api/dashboard/summary", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Faça o login do turno para continuar.");

        state.session_service.login("Carlos").unwrap();
        let (status, body) = send(&app, Method::GET, "/api/dashboard/summary", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pendingPackages"], 0);
    }
}
