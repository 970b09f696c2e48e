// src/handlers/test_support.rs

// Aplicação completa sobre o gateway em memória, para testes de rota.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use crate::{
    build_router,
    common::clock::FixedClock,
    config::AppState,
    db::{local_store::MemoryStore, testing::ProbeGateway},
    models::collection::Scope,
    services::report_service::ReportService,
};

pub fn state_with(gateway: Arc<ProbeGateway>) -> AppState {
    AppState::assemble(
        gateway,
        Arc::new(MemoryStore::default()),
        Arc::new(FixedClock::at("2025-03-05 10:15")),
        ReportService::new("/caminho/que/nao/existe", "Roboto"),
    )
}

pub async fn app() -> (Router, AppState) {
    let state = state_with(Arc::new(ProbeGateway::new()));
    state.coordinator.refresh(&[Scope::ALL], false).await;
    (build_router(state.clone()), state)
}

pub async fn logged_in_app() -> Router {
    let (app, state) = app().await;
    state.session_service.login("Carlos").unwrap();
    app
}

/// Envia uma requisição JSON e devolve status e corpo (Null se vazio ou não-JSON).
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send_raw(app, method, uri, body).await;
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

pub async fn send_raw(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes().to_vec();
    (status, bytes)
}
