mod error;
mod memory_store;
mod pg_store;
mod repositories;
mod store;
pub mod models;

use anyhow::{Context, Result};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::sync::Arc;

use crate::config::{Config, DatabaseConfig, StorageBackend};

pub use error::{DatabaseError, DatabaseResult};
pub use memory_store::InMemoryStore;
pub use models::*;
pub use pg_store::PgStore;
pub use store::SchedulingStore;

/// Initialize the database connection pool and run migrations
pub async fn init_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections.unwrap_or(10))
        .min_connections(config.min_connections.unwrap_or(1))
        .connect(&config.url)
        .await
        .context("Failed to connect to the database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    Ok(pool)
}

/// Build the store selected by `STORAGE_BACKEND`.
pub async fn init_store(config: &Config) -> Result<Arc<dyn SchedulingStore>> {
    match config.storage {
        StorageBackend::Postgres => {
            let database = config
                .database
                .as_ref()
                .context("DATABASE_URL must be set for the postgres backend")?;
            let pool = init_pool(database).await?;
            tracing::info!("Using PostgreSQL scheduling store");
            Ok(Arc::new(PgStore::new(pool)))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory scheduling store; data is lost on restart");
            Ok(Arc::new(InMemoryStore::new()))
        }
    }
}
