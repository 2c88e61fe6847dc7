//! ModKit database handle.
//!
//! One [`DbHandle`] wraps an sqlx pool (SQLite or PostgreSQL) together with a
//! SeaORM connection built on top of the same pool. Modules only see the
//! SeaORM side; the sqlx pool is kept for engine-level setup.
//!
//! ```rust,no_run
//! # async fn demo() -> modkit_db::Result<()> {
//! use modkit_db::{ConnectOpts, DbHandle};
//!
//! let db = DbHandle::connect("sqlite::memory:", ConnectOpts::default()).await?;
//! let conn = db.sea();
//! # drop(conn);
//! db.close().await;
//! # Ok(())
//! # }
//! ```

mod pool_opts;
mod sqlite;

use pool_opts::ApplyPoolOpts;
use sea_orm::{DatabaseConnection, SqlxPostgresConnector, SqlxSqliteConnector};
use sqlx::{postgres::PgPoolOptions, sqlite::SqlitePoolOptions, PgPool, SqlitePool};
use std::time::Duration;
use thiserror::Error;

pub use sqlite::is_memory_dsn;

/// Library-local result type.
pub type Result<T> = std::result::Result<T, DbError>;

/// Typed error for the DB handle.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Unknown DSN: {0}")]
    UnknownDsn(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Sea(#[from] sea_orm::DbErr),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Supported engines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DbEngine {
    Postgres,
    Sqlite,
}

/// Connection pool options; each driver applies the subset it supports.
#[derive(Clone, Debug)]
pub struct ConnectOpts {
    /// Maximum number of connections in the pool.
    pub max_conns: Option<u32>,
    /// Minimum number of connections in the pool.
    pub min_conns: Option<u32>,
    /// Timeout to acquire a connection from the pool.
    pub acquire_timeout: Option<Duration>,
    /// Idle timeout before a connection is closed.
    pub idle_timeout: Option<Duration>,
    /// Maximum lifetime for a connection.
    pub max_lifetime: Option<Duration>,
    /// Test connection health before acquire.
    pub test_before_acquire: bool,
    /// For SQLite file DSNs, create parent directories if missing.
    pub create_sqlite_dirs: bool,
}

impl Default for ConnectOpts {
    fn default() -> Self {
        Self {
            max_conns: Some(10),
            min_conns: None,
            acquire_timeout: Some(Duration::from_secs(30)),
            idle_timeout: Some(Duration::from_secs(600)),
            max_lifetime: Some(Duration::from_secs(1800)),
            test_before_acquire: false,
            create_sqlite_dirs: true,
        }
    }
}

#[derive(Clone, Debug)]
enum DbPool {
    Postgres(PgPool),
    Sqlite(SqlitePool),
}

/// Main handle.
#[derive(Debug)]
pub struct DbHandle {
    engine: DbEngine,
    pool: DbPool,
    dsn: String,
    sea: DatabaseConnection,
}

const DEFAULT_SQLITE_BUSY_TIMEOUT_MS: i32 = 5000;

impl DbHandle {
    /// Detect engine by DSN scheme.
    pub fn detect(dsn: &str) -> Result<DbEngine> {
        let s = dsn.trim_start();
        if s.starts_with("postgres://") || s.starts_with("postgresql://") {
            Ok(DbEngine::Postgres)
        } else if s.starts_with("sqlite:") {
            Ok(DbEngine::Sqlite)
        } else {
            Err(DbError::UnknownDsn(dsn.to_string()))
        }
    }

    /// Connect and build handle.
    pub async fn connect(dsn: &str, opts: ConnectOpts) -> Result<Self> {
        let engine = Self::detect(dsn)?;
        match engine {
            DbEngine::Postgres => {
                let pool = PgPoolOptions::new().apply(&opts).connect(dsn).await?;
                tracing::info!(engine = "postgres", "database pool ready");
                let sea = SqlxPostgresConnector::from_sqlx_postgres_pool(pool.clone());
                Ok(Self {
                    engine,
                    pool: DbPool::Postgres(pool),
                    dsn: dsn.to_string(),
                    sea,
                })
            }
            DbEngine::Sqlite => {
                let dsn = sqlite::prepare_sqlite_path(dsn, opts.create_sqlite_dirs)?;
                let in_memory = is_memory_dsn(&dsn);

                let mut opts = opts;
                if in_memory {
                    // every pooled connection would otherwise see its own empty database
                    opts.max_conns = Some(1);
                    opts.min_conns = Some(1);
                    opts.idle_timeout = None;
                    opts.max_lifetime = None;
                }

                let pool = SqlitePoolOptions::new()
                    .apply(&opts)
                    .after_connect(move |conn, _meta| {
                        Box::pin(async move {
                            let journal = if in_memory { "DELETE" } else { "WAL" };
                            sqlx::query(&format!("PRAGMA journal_mode = {journal}"))
                                .execute(&mut *conn)
                                .await?;
                            sqlx::query("PRAGMA synchronous = NORMAL")
                                .execute(&mut *conn)
                                .await?;
                            if !in_memory {
                                sqlx::query("PRAGMA busy_timeout = ?")
                                    .bind(DEFAULT_SQLITE_BUSY_TIMEOUT_MS)
                                    .execute(&mut *conn)
                                    .await?;
                            }
                            Ok(())
                        })
                    })
                    .connect(&dsn)
                    .await?;
                tracing::info!(engine = "sqlite", in_memory, "database pool ready");

                let sea = SqlxSqliteConnector::from_sqlx_sqlite_pool(pool.clone());
                Ok(Self {
                    engine,
                    pool: DbPool::Sqlite(pool),
                    dsn,
                    sea,
                })
            }
        }
    }

    /// Graceful pool close.
    pub async fn close(&self) {
        match &self.pool {
            DbPool::Postgres(p) => p.close().await,
            DbPool::Sqlite(p) => p.close().await,
        }
    }

    pub fn engine(&self) -> DbEngine {
        self.engine
    }

    /// DSN used for this connection.
    pub fn dsn(&self) -> &str {
        &self.dsn
    }

    /// SeaORM connection (clone; cheap handle over the shared pool).
    pub fn sea(&self) -> DatabaseConnection {
        self.sea.clone()
    }
}
