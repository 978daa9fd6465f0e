use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};

use crate::config::{DatabaseConfig, redact_credentials_in_dsn};
use crate::error::RepoResult;

/// Open the process-wide connection pool.
///
/// Called once at start-up; every repository shares the returned handle.
/// An in-memory SQLite database exists per connection, so such DSNs are
/// pinned to a single pooled connection.
///
/// # Errors
/// Returns `RepoError::Db` if the database cannot be reached.
pub async fn connect(cfg: &DatabaseConfig) -> RepoResult<DatabaseConnection> {
    let mut opts = ConnectOptions::new(cfg.dsn.clone());
    opts.acquire_timeout(cfg.acquire_timeout)
        .sqlx_logging(cfg.sqlx_logging);

    if cfg.is_memory() {
        opts.max_connections(1).min_connections(1);
    } else {
        opts.max_connections(cfg.max_conns);
        if let Some(min) = cfg.min_conns {
            opts.min_connections(min);
        }
    }

    let conn = Database::connect(opts).await?;
    tracing::info!(
        dsn = %redact_credentials_in_dsn(&cfg.dsn),
        backend = ?conn.get_database_backend(),
        "database connected"
    );
    Ok(conn)
}
