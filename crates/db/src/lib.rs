use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

pub mod error;
pub mod models;
pub mod repositories;

pub use error::DbError;

pub type DbPool = sqlx::PgPool;

/// Connection settings for the Postgres pool.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Postgres connection string (`DATABASE_URL`).
    pub url: String,
    /// Upper bound on pooled connections (default: `25`).
    pub max_connections: u32,
    /// Per-statement timeout, also used as the pool acquire timeout (default: 3s).
    pub query_timeout: Duration,
}

impl DbConfig {
    /// Load database settings from the environment.
    ///
    /// | Env Var                 | Default  |
    /// |-------------------------|----------|
    /// | `DATABASE_URL`          | required |
    /// | `DB_MAX_CONNECTIONS`    | `25`     |
    /// | `DB_QUERY_TIMEOUT_SECS` | `3`      |
    pub fn from_env() -> Self {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let max_connections: u32 = std::env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "25".into())
            .parse()
            .expect("DB_MAX_CONNECTIONS must be a valid u32");

        let query_timeout_secs: u64 = std::env::var("DB_QUERY_TIMEOUT_SECS")
            .unwrap_or_else(|_| "3".into())
            .parse()
            .expect("DB_QUERY_TIMEOUT_SECS must be a valid u64");

        Self {
            url,
            max_connections,
            query_timeout: Duration::from_secs(query_timeout_secs),
        }
    }

    fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        let statement_timeout = self.query_timeout.as_millis().to_string();
        Ok(self
            .url
            .parse::<PgConnectOptions>()?
            .options([("statement_timeout", statement_timeout)]))
    }

    fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.query_timeout)
    }
}

/// Create a connection pool. Every statement on every pooled connection is
/// bounded by `config.query_timeout`.
pub async fn create_pool(config: &DbConfig) -> Result<DbPool, sqlx::Error> {
    config
        .pool_options()
        .connect_with(config.connect_options()?)
        .await
}

/// Create a pool that connects on first use.
///
/// Lets the router be built (and exercised on paths that never reach the
/// database) without a running Postgres.
pub fn create_lazy_pool(config: &DbConfig) -> Result<DbPool, sqlx::Error> {
    let options = config.connect_options()?;
    Ok(config.pool_options().connect_lazy_with(options))
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
