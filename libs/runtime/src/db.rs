use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};
use tracing::info;

use crate::config::PostgresConfig;

const MAX_CONNS: u32 = 10;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Open a connection pool against the configured PostgreSQL instance
/// and verify it is reachable before the server starts accepting
/// traffic.
pub async fn connect(cfg: &PostgresConfig) -> Result<PgPool> {
    let options = PgConnectOptions::new()
        .host(&cfg.host)
        .port(cfg.port)
        .username(&cfg.user)
        .password(&cfg.password)
        .database(&cfg.db);

    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_with(options)
        .await
        .context("failed to connect to postgres")?;

    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .context("failed to ping postgres")?;

    info!(host = %cfg.host, db = %cfg.db, "database connection established");
    Ok(pool)
}
