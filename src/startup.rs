//! Startup sequence: wire the pool, store, gate, sweeper, and client
//! registry into one explicitly constructed application context. No
//! process-wide singletons; tests build their own isolated instances the
//! same way.

use std::sync::Arc;

use tracing::info;

use crate::api::ApiState;
use crate::auth::ClientRegistry;
use crate::config::AppConfig;
use crate::errors::Result;
use crate::secrets::{ExpirySweeper, SecretService, SecretStore};
use crate::storage::{self, DbPool, SqlxSecretRepository};

/// Fully wired application components.
pub struct AppContext {
    pub pool: DbPool,
    pub state: ApiState,
    pub registry: Arc<ClientRegistry>,
    pub sweeper: Arc<ExpirySweeper>,
}

/// Build the application context: connect, migrate, and compose.
pub async fn build_context(config: &AppConfig) -> Result<AppContext> {
    let pool = storage::create_pool(&config.database).await?;
    storage::run_migrations(&pool).await?;
    storage::check_connection(&pool).await?;

    let repository = Arc::new(SqlxSecretRepository::new(pool.clone()));
    let store = Arc::new(SecretStore::new(repository));
    let service = Arc::new(SecretService::new(store.clone()));
    let sweeper = Arc::new(ExpirySweeper::new(store));
    let registry = Arc::new(ClientRegistry::new(&config.clients));

    if registry.is_empty() {
        tracing::warn!("Client registry is empty; every API request will be rejected with 401");
    }

    info!(
        schema_version = storage::current_version(&pool).await?,
        registered_clients = registry.len(),
        "Application context initialized"
    );

    Ok(AppContext {
        pool,
        state: ApiState { service, sweeper: sweeper.clone() },
        registry,
        sweeper,
    })
}
