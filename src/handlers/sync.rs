// src/handlers/sync.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    config::AppState,
    models::collection::{Collection, Scope},
    services::refresh_service::{RefreshOutcome, SyncStatus},
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    /// `["all"]` ou nomes de coleção (`["packages", "residents"]`).
    #[schema(example = json!(["all"]))]
    pub scopes: Vec<Scope>,
    #[serde(default)]
    pub background: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshReport {
    pub committed: bool,
    pub applied: Vec<Collection>,
    pub discarded: Vec<Collection>,
    pub status: SyncStatus,
}

// GET /api/sync/status
#[utoipa::path(
    get,
    path = "/api/sync/status",
    tag = "Sincronização",
    responses((status = 200, description = "Indicador de carregamento e tamanho de cada coleção", body = SyncStatus))
)]
pub async fn get_status(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(app_state.coordinator.status())
}

// POST /api/sync/refresh
#[utoipa::path(
    post,
    path = "/api/sync/refresh",
    tag = "Sincronização",
    request_body = RefreshRequest,
    responses((status = 200, description = "Resultado da atualização; falhas de leitura mantêm o estado anterior", body = RefreshReport))
)]
pub async fn refresh(
    State(app_state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> impl IntoResponse {
    let outcome = app_state
        .coordinator
        .refresh(&payload.scopes, payload.background)
        .await;

    let (committed, applied, discarded) = match outcome {
        RefreshOutcome::Committed { applied, discarded } => (true, applied, discarded),
        RefreshOutcome::Failed => (false, Vec::new(), Vec::new()),
    };

    (
        StatusCode::OK,
        Json(RefreshReport {
            committed,
            applied,
            discarded,
            status: app_state.coordinator.status(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        build_router,
        db::{testing::ProbeGateway, Gateway},
        handlers::test_support::{send, state_with},
        models::collection::Collection,
    };
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn scoped_refresh_reports_what_was_applied() {
        let gateway = Arc::new(ProbeGateway::new());
        let app = build_router(state_with(gateway.clone()));
        gateway
            .inner
            .insert(
                Collection::Residents,
                json!({ "name": "Maria", "unit": "101", "block": "A" }).as_object().cloned().unwrap(),
            )
            .await
            .unwrap();

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/sync/refresh",
            Some(json!({ "scopes": ["residents"] })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["committed"], true);
        assert_eq!(body["applied"], json!(["residents"]));
        assert_eq!(body["status"]["isLoading"], false);
        let residents = body["status"]["collections"]
            .as_array()
            .unwrap()
            .iter()
            .find(|c| c["collection"] == "residents")
            .cloned()
            .unwrap();
        assert_eq!(residents["records"], 1);
    }

    #[tokio::test]
    async fn failed_read_is_reported_without_an_error_status() {
        let gateway = Arc::new(ProbeGateway::new());
        gateway.fail_reads_of(Collection::Packages);
        let app = build_router(state_with(gateway));

        let (status, body) = send(&app, Method::POST, "/api/sync/refresh", Some(json!({ "scopes": ["all"] }))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["committed"], false);
    }
}
