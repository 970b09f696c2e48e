// src/handlers/packages.rs

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
    models::package::{BlockGroup, BulkPickupPayload, NewPackage, Package, PickupPayload, PickupStats},
    services::{package_service::PackageFilter, registry_service::SearchQuery},
};

// GET /api/packages
#[utoipa::path(
    get,
    path = "/api/packages",
    tag = "Encomendas",
    params(PackageFilter),
    responses(
        (status = 200, description = "Encomendas filtradas", body = [Package]),
        (status = 401, description = "Turno não iniciado")
    )
)]
pub async fn list_packages(
    State(app_state): State<AppState>,
    Query(filter): Query<PackageFilter>,
) -> impl IntoResponse {
    Json(app_state.package_service.list(&filter))
}

// GET /api/packages/stats
#[utoipa::path(
    get,
    path = "/api/packages/stats",
    tag = "Encomendas",
    responses((status = 200, description = "Total, pendentes e retiradas", body = PickupStats))
)]
pub async fn get_stats(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(app_state.package_service.stats())
}

// GET /api/packages/pending-groups
#[utoipa::path(
    get,
    path = "/api/packages/pending-groups",
    tag = "Encomendas",
    params(SearchQuery),
    responses((status = 200, description = "Pendentes agrupadas por bloco e unidade", body = [BlockGroup]))
)]
pub async fn pending_groups(
    State(app_state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    Json(app_state.package_service.pending_groups(&query.search))
}

// POST /api/packages
#[utoipa::path(
    post,
    path = "/api/packages",
    tag = "Encomendas",
    request_body = NewPackage,
    responses(
        (status = 201, description = "Encomenda registrada"),
        (status = 400, description = "Dados inválidos"),
        (status = 502, description = "Backend recusou a gravação")
    )
)]
pub async fn create_package(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<NewPackage>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .package_service
        .create(payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::CREATED)
}

// POST /api/packages/{id}/pickup
#[utoipa::path(
    post,
    path = "/api/packages/{id}/pickup",
    tag = "Encomendas",
    params(("id" = Uuid, Path, description = "ID da encomenda")),
    request_body = PickupPayload,
    responses(
        (status = 200, description = "Retirada registrada", body = Package),
        (status = 404, description = "Encomenda não encontrada"),
        (status = 409, description = "Encomenda já retirada")
    )
)]
pub async fn pickup_package(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<PickupPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let package = app_state
        .package_service
        .pickup(id, &payload.picked_up_by)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(package)))
}

// POST /api/packages/bulk-pickup
#[utoipa::path(
    post,
    path = "/api/packages/bulk-pickup",
    tag = "Encomendas",
    request_body = BulkPickupPayload,
    responses(
        (status = 200, description = "Quantidade de encomendas retiradas", body = u64),
        (status = 502, description = "Backend recusou a gravação")
    )
)]
pub async fn bulk_pickup(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<BulkPickupPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let picked_up = app_state
        .package_service
        .bulk_pickup(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(picked_up)))
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::{logged_in_app, send};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn pickup_flow_over_http() {
        let app = logged_in_app().await;

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/packages",
            Some(json!({
                "unit": "101", "block": "A", "recipientName": "Maria",
                "type": "Caixa", "withdrawalCode": "4321"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (_, pending) = send(&app, Method::GET, "/api/packages?status=pendentes", None).await;
        let id = pending[0]["id"].as_str().unwrap().to_string();

        let uri = format!("/api/packages/{}/pickup", id);
        let (status, body) = send(&app, Method::POST, &uri, Some(json!({ "pickedUpBy": "João" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "Retirada");
        assert_eq!(body["pickedUpBy"], "João");

        let (status, _) = send(&app, Method::POST, &uri, Some(json!({ "pickedUpBy": "João" }))).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (_, pending) = send(&app, Method::GET, "/api/packages?status=pendentes", None).await;
        assert_eq!(pending.as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn invalid_payload_is_reported_per_field() {
        let app = logged_in_app().await;
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/packages",
            Some(json!({ "unit": "", "block": "A", "recipientName": "", "type": "Caixa", "withdrawalCode": "12" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["details"]["recipient_name"].is_array());
        assert!(body["details"]["unit"].is_array());
    }
}
