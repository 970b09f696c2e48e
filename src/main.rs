//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::{AppState, Config};
use crate::docs::ApiDoc;
use crate::middleware::auth::shell_guard;
use crate::models::collection::Scope;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;
    let app_state = AppState::new(&config).await?;

    // Migrações só fazem sentido no Postgres
    if let Some(pool) = &app_state.db_pool {
        sqlx::migrate!().run(pool).await?;
        tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");
    }

    // Carga inicial bloqueante de todas as coleções
    app_state.coordinator.refresh(&[Scope::ALL], false).await;
    if app_state.session_service.is_authenticated() {
        tracing::info!("🔑 Turno anterior restaurado do armazenamento local");
    }

    let app = build_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

pub fn build_router(app_state: AppState) -> Router {
    // Login de turno, menu e sincronização ficam abertos (a tela de login precisa deles)
    let session_routes = Router::new()
        .route("/page", put(handlers::session::navigate))
        .route("/sidebar", put(handlers::session::set_sidebar))
        .route("/notepad", post(handlers::session::save_notepad))
        .route("/notepad/{action}", post(handlers::session::notepad_action))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            shell_guard,
        ))
        .route("/", get(handlers::session::get_shell))
        .route("/menu", get(handlers::session::get_menu))
        .route("/employees", get(handlers::session::login_names))
        .route("/login", post(handlers::session::login))
        .route("/logout/request", post(handlers::session::request_logout))
        .route("/logout/cancel", post(handlers::session::cancel_logout))
        .route("/logout/confirm", post(handlers::session::confirm_logout));

    let sync_routes = Router::new()
        .route("/status", get(handlers::sync::get_status))
        .route("/refresh", post(handlers::sync::refresh));

    // Tudo daqui para baixo exige turno iniciado
    let resource_routes = Router::new()
        .route("/dashboard/summary", get(handlers::dashboard::get_summary))
        // Cadastro
        .route("/residents"
               ,get(handlers::registry::list_residents)
               .post(handlers::registry::create_resident)
        )
        .route("/companies"
               ,get(handlers::registry::list_companies)
               .post(handlers::registry::create_company)
        )
        .route("/employees"
               ,get(handlers::staff::list_employees)
               .post(handlers::staff::create_employee)
        )
        .route("/employees/{id}", put(handlers::staff::update_employee))
        .route("/occurrences"
               ,get(handlers::staff::list_occurrences)
               .post(handlers::staff::create_occurrence)
        )
        // Encomendas
        .route("/packages"
               ,get(handlers::packages::list_packages)
               .post(handlers::packages::create_package)
        )
        .route("/packages/stats", get(handlers::packages::get_stats))
        .route("/packages/pending-groups", get(handlers::packages::pending_groups))
        .route("/packages/bulk-pickup", post(handlers::packages::bulk_pickup))
        .route("/packages/{id}/pickup", post(handlers::packages::pickup_package))
        // Itens recebidos
        .route("/received-items"
               ,get(handlers::received_items::list_items)
               .post(handlers::received_items::create_item)
        )
        .route("/received-items/stats", get(handlers::received_items::get_stats))
        .route("/received-items/{id}/pickup", post(handlers::received_items::pickup_item))
        // Materiais
        .route("/materials"
               ,get(handlers::materials::list_loans)
               .post(handlers::materials::lend_material)
        )
        .route("/materials/{id}/return", post(handlers::materials::return_material))
        // Visitantes
        .route("/visitors"
               ,get(handlers::visitors::list_visitors)
               .post(handlers::visitors::register_entry)
        )
        .route("/visitors/history", get(handlers::visitors::visitor_history))
        .route("/visitors/{id}/exit", post(handlers::visitors::register_exit))
        // Folha de ponto
        .route("/time-records"
               ,get(handlers::time_records::list_records)
               .post(handlers::time_records::create_record)
        )
        .route("/time-records/{id}", put(handlers::time_records::update_record))
        .route("/time-records/clear", get(handlers::time_records::clear_state))
        .route("/time-records/clear/request", post(handlers::time_records::request_clear))
        .route("/time-records/clear/cancel", post(handlers::time_records::cancel_clear))
        .route("/time-records/clear/confirm", post(handlers::time_records::confirm_clear))
        .route("/time-records/export.csv", get(handlers::time_records::export_csv))
        .route("/time-records/print.pdf", get(handlers::time_records::print_pdf))
        // Entregadores e visitas
        .route("/delivery/drivers"
               ,get(handlers::delivery::list_drivers)
               .post(handlers::delivery::create_driver)
        )
        .route("/delivery/drivers/{id}", put(handlers::delivery::update_driver))
        .route("/delivery/visits"
               ,get(handlers::delivery::list_visits)
               .post(handlers::delivery::create_visit)
        )
        .route("/delivery/visits/summary", get(handlers::delivery::day_summary))
        .route("/delivery/visits/{id}", put(handlers::delivery::update_visit))
        // Exclusão em duas etapas
        .route("/deletes/{collection}"
               ,get(handlers::deletes::get_pending)
               .post(handlers::deletes::request_delete)
               .delete(handlers::deletes::cancel_delete)
        )
        .route("/deletes/{collection}/confirm", post(handlers::deletes::confirm_delete))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            shell_guard,
        ));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/session", session_routes)
        .nest("/api/sync", sync_routes)
        .nest("/api", resource_routes)
        .with_state(app_state)
}
