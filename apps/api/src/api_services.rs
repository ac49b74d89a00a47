use std::sync::Arc;

use chrono::Utc;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use veritrail_application::{
    AuthorizationService, ChaincodeAuthorizer, LedgerExecutor, LedgerStore, RumorService,
    ServiceAddress, ServiceRouter,
};
use veritrail_core::{AppError, AppResult, TransactionHeader, TxId, TxTimestamp};
use veritrail_infrastructure::{InMemoryLedgerStore, PostgresLedgerStore};

use crate::api_config::{ApiConfig, LedgerBackendConfig};
use crate::state::AppState;

pub async fn run_migrations(config: &ApiConfig) -> AppResult<()> {
    let LedgerBackendConfig::Postgres { database_url } = &config.backend else {
        return Err(AppError::Argument(
            "migrations require LEDGER_BACKEND=postgres".to_owned(),
        ));
    };

    let pool = connect(database_url).await?;
    migrate(&pool).await
}

pub async fn build_state(config: &ApiConfig) -> AppResult<AppState> {
    let store: Arc<dyn LedgerStore> = match &config.backend {
        LedgerBackendConfig::Memory => {
            info!("using in-memory ledger store");
            Arc::new(InMemoryLedgerStore::new())
        }
        LedgerBackendConfig::Postgres { database_url } => {
            let pool = connect(database_url).await?;
            migrate(&pool).await?;
            info!("using postgres ledger store");
            Arc::new(PostgresLedgerStore::new(pool))
        }
    };

    let executor = install_services(store, config).await?;

    Ok(AppState {
        executor: Arc::new(executor),
    })
}

/// Registers both services on one channel and optionally runs their init
/// transactions.
pub async fn install_services(
    store: Arc<dyn LedgerStore>,
    config: &ApiConfig,
) -> AppResult<LedgerExecutor> {
    let router = Arc::new(ServiceRouter::new());
    let permission_target =
        ServiceAddress::new(config.permission_service_name.clone(), config.channel.clone())?;
    let rumor_service = RumorService::new(Arc::new(ChaincodeAuthorizer::new(
        Arc::downgrade(&router),
        permission_target,
    )));

    router
        .register(
            config.permission_service_name.as_str(),
            Arc::new(AuthorizationService::new()),
        )
        .await?;
    router
        .register(config.rumor_service_name.as_str(), Arc::new(rumor_service))
        .await?;

    info!(
        channel = %config.channel,
        services = ?router.service_names().await,
        "ledger services installed"
    );

    let executor = LedgerExecutor::new(store, router, config.channel.clone());

    if config.init_on_start {
        for service in [&config.permission_service_name, &config.rumor_service_name] {
            executor.init(service, &[], fresh_header()).await?;
        }
    }

    Ok(executor)
}

/// Stamps a request with a new transaction id and the current time.
pub fn fresh_header() -> TransactionHeader {
    TransactionHeader::new(TxId::new(), TxTimestamp::from_datetime(Utc::now()))
}

async fn connect(database_url: &str) -> AppResult<PgPool> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))
}

async fn migrate(pool: &PgPool) -> AppResult<()> {
    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))
}
