//! Database connection and pool management
//!
//! Pool construction, migrations, the readiness ping, and classification of
//! constraint violations raised by Postgres.

use crate::config::DatabaseConfig;
use anyhow::Result;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// Pool tuning that is not exposed through configuration
#[derive(Debug, Clone)]
struct PoolTuning {
    min_connections: u32,
    acquire_timeout: Duration,
    idle_timeout: Duration,
    max_lifetime: Duration,
}

impl Default for PoolTuning {
    fn default() -> Self {
        Self {
            min_connections: 1,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(1800),
        }
    }
}

/// Create a PostgreSQL connection pool from configuration
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    create_pool_with_tuning(config, &PoolTuning::default()).await
}

/// Create a PostgreSQL connection pool with explicit tuning
async fn create_pool_with_tuning(config: &DatabaseConfig, tuning: &PoolTuning) -> Result<PgPool> {
    let connect_options = PgConnectOptions::from_str(&config.url)?.application_name("blog-admin");

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(tuning.min_connections.min(config.max_connections))
        .acquire_timeout(tuning.acquire_timeout)
        .idle_timeout(tuning.idle_timeout)
        .max_lifetime(tuning.max_lifetime)
        .test_before_acquire(true)
        .connect_with(connect_options)
        .await?;

    info!(max = config.max_connections, "Database pool created");

    Ok(pool)
}

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations completed successfully");
    Ok(())
}

/// Check database health
pub async fn health_check(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map(|_| ())
        .map_err(|e| {
            warn!("Database health check failed: {}", e);
            e.into()
        })
}

/// True when the error is a unique constraint violation
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// True when the error is a foreign key violation
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}
