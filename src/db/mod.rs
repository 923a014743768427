//! Database layer
//!
//! This module owns access to the device management store:
//! - `Database`, the connection factory built from an explicit `DatabaseConfig`
//! - Scoped acquisition: pooled connections and transactions return to the
//!   pool when dropped, on every exit path
//! - One repository per aggregate, one method per business query

pub mod device_repository;
pub mod employee_repository;
pub mod migrations;
pub mod model_repository;
pub mod repair_repository;
pub mod report_repository;

pub use device_repository::DeviceRepository;
pub use employee_repository::EmployeeRepository;
pub use model_repository::ModelRepository;
pub use repair_repository::RepairRepository;
pub use report_repository::ReportRepository;

use std::str::FromStr;
use std::time::Duration;

use sqlx::migrate::Migrator;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
};
use sqlx::{Pool, Sqlite, Transaction};
use tracing::{debug, info};

use crate::config::DatabaseConfig;
use crate::utils::{AppError, AppResult};

/// Database connection pool type
pub type DbPool = Pool<Sqlite>;

/// Embedded schema migrations
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Connection factory for the store
#[derive(Debug, Clone)]
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Open a bounded pool using the given configuration
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let url = config.effective_url();
        let options = SqliteConnectOptions::from_str(&url)
            .map_err(|e| AppError::Config(format!("Invalid database URL {}: {}", url, e)))?
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(config.connect_timeout_secs))
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .connect_with(options)
            .await
            .map_err(|e| AppError::Unavailable(format!("Failed to open {}: {}", url, e)))?;

        info!(
            url = %url,
            max_connections = config.max_connections,
            "Database pool ready"
        );

        Ok(Self { pool })
    }

    /// Single-connection in-memory store with the schema applied
    ///
    /// Every SQLite in-memory connection is its own database, so the pool is
    /// pinned to one connection that never idles out.
    pub async fn in_memory() -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| AppError::Config(e.to_string()))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await
            .map_err(unavailable)?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Apply pending schema migrations
    pub async fn migrate(&self) -> AppResult<()> {
        MIGRATOR.run(&self.pool).await?;
        debug!("Schema migrations applied");
        Ok(())
    }

    /// Take a connection from the pool
    ///
    /// The connection goes back to the pool when the handle is dropped.
    pub async fn acquire(&self) -> AppResult<PoolConnection<Sqlite>> {
        self.pool.acquire().await.map_err(unavailable)
    }

    /// Start a write transaction; dropping it without `commit` rolls back
    ///
    /// `BEGIN IMMEDIATE` takes the write lock up front, so a concurrent writer
    /// waits out the busy timeout instead of failing on a stale snapshot.
    pub async fn begin_immediate(&self) -> AppResult<Transaction<'static, Sqlite>> {
        self.pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(unavailable)
    }

    /// Close the pool and wait for connections to be released
    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}

fn unavailable(err: sqlx::Error) -> AppError {
    AppError::Unavailable(err.to_string())
}
