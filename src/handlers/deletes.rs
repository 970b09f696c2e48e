// src/handlers/deletes.rs

// Exclusão em duas etapas, igual para todas as coleções.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::i18n::Locale,
    models::collection::Collection,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteRequest {
    pub id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PendingDelete {
    pub collection: Collection,
    /// `null` quando não há confirmação aberta.
    pub pending_id: Option<Uuid>,
}

// GET /api/deletes/{collection}
#[utoipa::path(
    get,
    path = "/api/deletes/{collection}",
    tag = "Exclusão",
    params(("collection" = Collection, Path, description = "Coleção (ex.: residents, delivery_visits)")),
    responses((status = 200, description = "Pedido de exclusão pendente", body = PendingDelete))
)]
pub async fn get_pending(
    State(app_state): State<AppState>,
    Path(collection): Path<Collection>,
) -> impl IntoResponse {
    Json(PendingDelete {
        collection,
        pending_id: app_state.delete_service.pending(collection),
    })
}

// POST /api/deletes/{collection}
#[utoipa::path(
    post,
    path = "/api/deletes/{collection}",
    tag = "Exclusão",
    params(("collection" = Collection, Path, description = "Coleção")),
    request_body = DeleteRequest,
    responses((status = 200, description = "Confirmação aberta", body = PendingDelete))
)]
pub async fn request_delete(
    State(app_state): State<AppState>,
    Path(collection): Path<Collection>,
    Json(payload): Json<DeleteRequest>,
) -> impl IntoResponse {
    app_state.delete_service.request(collection, payload.id);
    Json(PendingDelete {
        collection,
        pending_id: Some(payload.id),
    })
}

// DELETE /api/deletes/{collection}
#[utoipa::path(
    delete,
    path = "/api/deletes/{collection}",
    tag = "Exclusão",
    params(("collection" = Collection, Path, description = "Coleção")),
    responses((status = 204, description = "Confirmação fechada sem excluir"))
)]
pub async fn cancel_delete(
    State(app_state): State<AppState>,
    Path(collection): Path<Collection>,
) -> impl IntoResponse {
    app_state.delete_service.cancel(collection);
    StatusCode::NO_CONTENT
}

// POST /api/deletes/{collection}/confirm
#[utoipa::path(
    post,
    path = "/api/deletes/{collection}/confirm",
    tag = "Exclusão",
    params(("collection" = Collection, Path, description = "Coleção")),
    responses(
        (status = 200, description = "Registro excluído"),
        (status = 204, description = "Nenhum pedido aberto: nada foi excluído"),
        (status = 502, description = "Backend recusou a exclusão")
    )
)]
pub async fn confirm_delete(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(collection): Path<Collection>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = app_state
        .delete_service
        .confirm(collection)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(match deleted {
        Some(id) => (StatusCode::OK, Json(Some(id))).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::{logged_in_app, send};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn two_step_delete_of_a_visit() {
        let app = logged_in_app().await;
        send(
            &app,
            Method::POST,
            "/api/delivery/visits",
            Some(json!({
                "driverId": uuid::Uuid::new_v4(), "driverName": "Rafael",
                "companyName": "Correios", "packageCount": 2
            })),
        )
        .await;
        let (_, visits) = send(&app, Method::GET, "/api/delivery/visits", None).await;
        let id = visits[0]["id"].clone();

        let (status, pending) = send(&app, Method::POST, "/api/deletes/delivery_visits", Some(json!({ "id": id }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(pending["pendingId"], id);

        let (status, _) = send(&app, Method::POST, "/api/deletes/delivery_visits/confirm", None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, Method::POST, "/api/deletes/delivery_visits/confirm", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, visits) = send(&app, Method::GET, "/api/delivery/visits", None).await;
        assert_eq!(visits.as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn unknown_collection_is_rejected() {
        let app = logged_in_app().await;
        let (status, _) = send(&app, Method::GET, "/api/deletes/orders", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
