//! Database connection pool management

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use startlab_core::config::{DatabaseConfig, DatabaseTarget};

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

fn connect_options(target: &DatabaseTarget) -> Result<PgConnectOptions, sqlx::Error> {
    match target {
        DatabaseTarget::Url(url) => url.parse(),
        DatabaseTarget::Parts(p) => Ok(PgConnectOptions::new()
            .host(&p.host)
            .port(p.port)
            .database(&p.database)
            .username(&p.user)
            .password(&p.password)),
    }
}

/// Create a PostgreSQL connection pool.
///
/// Connects eagerly, so a wrong address or password fails here instead of
/// on the first request.
pub async fn create_pool(
    target: &DatabaseTarget,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    tracing::debug!(db = %target.describe(), max_connections, "Connecting to database");
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_with(connect_options(target)?)
        .await
}

/// Pool that only connects when a query first needs it.
pub fn create_lazy_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let target = config
        .target()
        .map_err(|e| sqlx::Error::Configuration(e.to_string().into()))?;
    Ok(PgPoolOptions::new()
        .max_connections(config.pool_size)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_lazy_with(connect_options(&target)?))
}
