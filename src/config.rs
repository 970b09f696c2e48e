// src/config.rs

use std::{env, path::PathBuf, sync::Arc, time::Duration};

use anyhow::{bail, Context};
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::{
        clock::{Clock, SystemClock},
        i18n::I18nStore,
    },
    db::{local_store::MemoryStore, Gateway, JsonFileStore, KeyValueStore, MemoryGateway, PgGateway},
    services::{
        dashboard_service::DashboardService, delete_service::DeleteService,
        delivery_service::DeliveryService, material_service::MaterialService,
        package_service::PackageService, received_item_service::ReceivedItemService,
        refresh_service::RefreshCoordinator, registry_service::RegistryService,
        report_service::ReportService, session_service::SessionService,
        staff_service::StaffService, time_record_service::TimeRecordService,
        visitor_service::VisitorService,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayBackend {
    Postgres,
    // Dados só na memória do processo (demonstração local).
    Memory,
}

/// Configuração lida do ambiente (e do `.env`, se houver).
#[derive(Debug, Clone)]
pub struct Config {
    pub backend: GatewayBackend,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub bind_addr: String,
    pub identity_file: Option<PathBuf>,
    pub fonts_dir: PathBuf,
    pub font_name: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let backend = match env::var("GATEWAY_BACKEND").as_deref() {
            Ok("memory") => GatewayBackend::Memory,
            Ok("postgres") | Err(_) => GatewayBackend::Postgres,
            Ok(other) => bail!("GATEWAY_BACKEND inválido: '{}' (use 'postgres' ou 'memory')", other),
        };

        let database_url = env::var("DATABASE_URL").ok();
        if backend == GatewayBackend::Postgres && database_url.is_none() {
            bail!("DATABASE_URL deve ser definida quando GATEWAY_BACKEND=postgres");
        }

        let db_max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("DB_MAX_CONNECTIONS inválido: '{}'", raw))?,
            Err(_) => 5,
        };

        Ok(Self {
            backend,
            database_url,
            db_max_connections,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            identity_file: env::var("IDENTITY_FILE").ok().map(PathBuf::from),
            fonts_dir: env::var("FONTS_DIR").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("./fonts")),
            font_name: env::var("FONT_NAME").unwrap_or_else(|_| "Roboto".to_string()),
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: Option<PgPool>,
    pub i18n_store: Arc<I18nStore>,
    pub coordinator: Arc<RefreshCoordinator>,

    pub registry_service: RegistryService,
    pub package_service: PackageService,
    pub received_item_service: ReceivedItemService,
    pub material_service: MaterialService,
    pub visitor_service: VisitorService,
    pub staff_service: StaffService,
    pub time_record_service: TimeRecordService,
    pub delivery_service: DeliveryService,
    pub dashboard_service: DashboardService,
    pub delete_service: DeleteService,
    pub session_service: SessionService,
    pub report_service: ReportService,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let (gateway, db_pool): (Arc<dyn Gateway>, Option<PgPool>) = match config.backend {
            GatewayBackend::Postgres => {
                let database_url = config
                    .database_url
                    .as_deref()
                    .context("DATABASE_URL deve ser definida")?;
                let pool = PgPoolOptions::new()
                    .max_connections(config.db_max_connections)
                    .acquire_timeout(Duration::from_secs(3))
                    .connect(database_url)
                    .await?;
                tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
                (Arc::new(PgGateway::new(pool.clone())), Some(pool))
            }
            GatewayBackend::Memory => {
                tracing::warn!("⚠️ Backend em memória: os dados somem ao encerrar o processo");
                (Arc::new(MemoryGateway::new()), None)
            }
        };

        let store: Arc<dyn KeyValueStore> = match &config.identity_file {
            Some(path) => Arc::new(JsonFileStore::new(path)),
            None => Arc::new(MemoryStore::default()),
        };

        let mut state = Self::assemble(
            gateway,
            store,
            Arc::new(SystemClock),
            ReportService::new(&config.fonts_dir, &config.font_name),
        );
        state.db_pool = db_pool;
        Ok(state)
    }

    /// Monta o gráfico de dependências em cima de um gateway qualquer.
    pub fn assemble(
        gateway: Arc<dyn Gateway>,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        report_service: ReportService,
    ) -> Self {
        let coordinator = Arc::new(RefreshCoordinator::new(gateway));
        let staff_service = StaffService::new(coordinator.clone(), clock.clone());

        Self {
            db_pool: None,
            i18n_store: Arc::new(I18nStore::new()),
            registry_service: RegistryService::new(coordinator.clone()),
            package_service: PackageService::new(coordinator.clone(), clock.clone()),
            received_item_service: ReceivedItemService::new(coordinator.clone(), clock.clone()),
            material_service: MaterialService::new(coordinator.clone(), clock.clone()),
            visitor_service: VisitorService::new(coordinator.clone(), clock.clone()),
            time_record_service: TimeRecordService::new(coordinator.clone()),
            delivery_service: DeliveryService::new(coordinator.clone(), clock.clone()),
            dashboard_service: DashboardService::new(coordinator.clone(), clock),
            delete_service: DeleteService::new(coordinator.clone()),
            session_service: SessionService::new(coordinator.clone(), store, staff_service.clone()),
            staff_service,
            report_service,
            coordinator,
        }
    }
}
