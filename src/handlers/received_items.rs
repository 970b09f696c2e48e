// src/handlers/received_items.rs

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
        package::{PickupPayload, PickupStats},
        received_item::{NewReceivedItem, ReceivedItem},
    },
    services::received_item_service::ReceivedItemFilter,
};

// GET /api/received-items
#[utoipa::path(
    get,
    path = "/api/received-items",
    tag = "Itens Recebidos",
    params(ReceivedItemFilter),
    responses((status = 200, description = "Itens filtrados", body = [ReceivedItem]))
)]
pub async fn list_items(
    State(app_state): State<AppState>,
    Query(filter): Query<ReceivedItemFilter>,
) -> impl IntoResponse {
    Json(app_state.received_item_service.list(&filter))
}

// GET /api/received-items/stats
#[utoipa::path(
    get,
    path = "/api/received-items/stats",
    tag = "Itens Recebidos",
    responses((status = 200, description = "Total, pendentes e retirados", body = PickupStats))
)]
pub async fn get_stats(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(app_state.received_item_service.stats())
}

// POST /api/received-items
#[utoipa::path(
    post,
    path = "/api/received-items",
    tag = "Itens Recebidos",
    request_body = NewReceivedItem,
    responses(
        (status = 201, description = "Item registrado"),
        (status = 400, description = "Dados inválidos"),
        (status = 502, description = "Backend recusou a gravação")
    )
)]
pub async fn create_item(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<NewReceivedItem>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .received_item_service
        .create(payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::CREATED)
}

// POST /api/received-items/{id}/pickup
#[utoipa::path(
    post,
    path = "/api/received-items/{id}/pickup",
    tag = "Itens Recebidos",
    params(("id" = Uuid, Path, description = "ID do item")),
    request_body = PickupPayload,
    responses(
        (status = 200, description = "Retirada registrada", body = ReceivedItem),
        (status = 404, description = "Item não encontrado"),
        (status = 409, description = "Item já retirado")
    )
)]
pub async fn pickup_item(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<PickupPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let item = app_state
        .received_item_service
        .pickup(id, &payload.picked_up_by)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(item)))
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::{logged_in_app, send};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn code_is_searchable_but_hidden_from_observations() {
        let app = logged_in_app().await;
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/received-items",
            Some(json!({
                "operationType": "externo_para_morador", "unit": "202", "block": "B",
                "recipientName": "Ana", "leftBy": "Pedro", "description": "Chave",
                "observations": "Deixar na portaria", "receivedCode": "4821"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (_, found) = send(&app, Method::GET, "/api/received-items?search=4821", None).await;
        assert_eq!(found.as_array().unwrap().len(), 1);
        assert_eq!(found[0]["receivedCode"], "4821");

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/received-items",
            Some(json!({
                "operationType": "externo_para_morador", "unit": "202", "recipientName": "Ana",
                "leftBy": "Pedro", "description": "Chave", "receivedCode": "48a1"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["received_code"][0], "O código deve conter apenas dígitos.");
    }
}
