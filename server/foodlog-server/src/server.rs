use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use auth_identity::{
    repository::{postgres::PostgresAccountRepository, AccountRepository, InMemoryAccountRepository},
    IdentityConfig, IdentityService,
};
use config_engine::{AppConfig, StoreBackend};
use database_layer::{
    DatabasePool, HierarchyStore, InMemoryHierarchyStore, PoolSettings, PostgresHierarchyStore,
};
use logger_redacted::{PiiRedactor, RedactionConfig};
use records_engine::RecordService;
use tracing::info;

/// Shared application state handed to every handler
#[derive(Clone)]
pub struct FoodLogServer {
    pub identity: Arc<IdentityService>,
    pub records: Arc<RecordService>,
    pub store: Arc<dyn HierarchyStore>,
    pub redactor: PiiRedactor,
    pub backend: StoreBackend,
    pub started_at: Instant,
}

impl FoodLogServer {
    /// Build the server for the configured store backend.
    ///
    /// The PostgreSQL backend connects the pool and applies migrations
    /// when `database.run_migrations` is set.
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let identity_config = identity_config(config);
        let redactor = redactor(config);

        match config.database.backend {
            StoreBackend::Memory => {
                info!("Using in-memory store");
                Ok(Self::in_memory(identity_config, redactor))
            }
            StoreBackend::Postgres => {
                let url = config
                    .database
                    .url
                    .as_deref()
                    .context("database.url is required for the postgres backend")?;
                let settings = PoolSettings {
                    max_connections: config.database.max_connections,
                    min_connections: config.database.min_connections,
                    acquire_timeout: Duration::from_secs(config.database.acquire_timeout_secs),
                };
                let pool = DatabasePool::connect(url, &settings)
                    .await
                    .context("failed to connect to PostgreSQL")?;
                if config.database.run_migrations {
                    pool.migrate().await.context("failed to apply migrations")?;
                }

                let accounts: Arc<dyn AccountRepository> =
                    Arc::new(PostgresAccountRepository::new(pool.pool().clone()));
                let store: Arc<dyn HierarchyStore> = Arc::new(PostgresHierarchyStore::new(pool));
                info!("Using PostgreSQL store");
                Ok(Self::assemble(
                    store,
                    accounts,
                    identity_config,
                    redactor,
                    StoreBackend::Postgres,
                ))
            }
        }
    }

    /// Build a server over fresh in-memory stores
    pub fn in_memory(identity_config: IdentityConfig, redactor: PiiRedactor) -> Self {
        Self::assemble(
            Arc::new(InMemoryHierarchyStore::new()),
            Arc::new(InMemoryAccountRepository::new()),
            identity_config,
            redactor,
            StoreBackend::Memory,
        )
    }

    pub fn assemble(
        store: Arc<dyn HierarchyStore>,
        accounts: Arc<dyn AccountRepository>,
        identity_config: IdentityConfig,
        redactor: PiiRedactor,
        backend: StoreBackend,
    ) -> Self {
        let identity = IdentityService::new(accounts, identity_config).with_redactor(redactor.clone());
        Self {
            identity: Arc::new(identity),
            records: Arc::new(RecordService::new(Arc::clone(&store))),
            store,
            redactor,
            backend,
            started_at: Instant::now(),
        }
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Release the store handle
    pub async fn shutdown(&self) {
        self.store.close().await;
        info!("FoodLog server stopped");
    }
}

fn identity_config(config: &AppConfig) -> IdentityConfig {
    IdentityConfig {
        jwt_secret: config.identity.jwt_secret.clone(),
        token_ttl_hours: config.identity.token_ttl_hours,
        password_min_length: config.identity.password_min_length,
    }
}

fn redactor(config: &AppConfig) -> PiiRedactor {
    if config.logging.redaction_enabled {
        PiiRedactor::new(RedactionConfig::default())
    } else {
        PiiRedactor::new(RedactionConfig::disabled())
    }
}
