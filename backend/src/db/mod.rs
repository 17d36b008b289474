//! # Database Module
//!
//! This module owns everything persistence-related for the Code Camp
//! backend:
//!
//! - the entities (`models`)
//! - the SQL for PostgreSQL (`queries`)
//! - the `CampRepository` seam the service layer talks to (`repository`)
//! - an in-memory store for tests and database-less runs (`memory`)
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      DATABASE LAYER                              │
//! │                                                                  │
//! │                  ┌──────────────────────────┐                    │
//! │                  │  dyn CampRepository      │                    │
//! │                  └────────────┬─────────────┘                    │
//! │                ┌──────────────┴──────────────┐                   │
//! │                ▼                             ▼                   │
//! │  ┌──────────────────────────┐   ┌──────────────────────────┐    │
//! │  │ Database                 │   │ InMemoryCampRepository   │    │
//! │  │ (deadpool-postgres)      │   │ (RwLock<BTreeMap>)       │    │
//! │  └──────────────────────────┘   └──────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod memory;
pub mod models;
pub mod queries;
pub mod repository;

use deadpool_postgres::{Config, ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime};
use thiserror::Error;
use tokio_postgres::error::SqlState;
use tokio_postgres::NoTls;
use tracing::{error, info};

/// Schema applied at startup. Every statement is idempotent.
const INITIAL_SCHEMA: &str = include_str!("../../migrations/001_initial_schema.sql");

/// Database-related errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to connect to the database
    #[error("Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryError(tokio_postgres::Error),

    /// A unique constraint was violated (e.g. duplicate moniker)
    #[error("Conflicting record: {0}")]
    Conflict(String),

    /// The store refused the record (check or not-null constraint)
    #[error("Record rejected: {0}")]
    Rejected(String),

    /// Migration failed
    #[error("Migration failed: {0}")]
    MigrationError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

impl From<tokio_postgres::Error> for DatabaseError {
    fn from(e: tokio_postgres::Error) -> Self {
        match e.code() {
            Some(code) if *code == SqlState::UNIQUE_VIOLATION => {
                DatabaseError::Conflict(constraint_detail(&e))
            }
            Some(code)
                if *code == SqlState::CHECK_VIOLATION
                    || *code == SqlState::NOT_NULL_VIOLATION
                    || *code == SqlState::STRING_DATA_RIGHT_TRUNCATION =>
            {
                DatabaseError::Rejected(constraint_detail(&e))
            }
            _ => DatabaseError::QueryError(e),
        }
    }
}

/// Best human-readable description of a constraint failure.
fn constraint_detail(e: &tokio_postgres::Error) -> String {
    e.as_db_error()
        .map(|db_err| {
            db_err
                .constraint()
                .map(|c| format!("{} ({})", db_err.message(), c))
                .unwrap_or_else(|| db_err.message().to_string())
        })
        .unwrap_or_else(|| e.to_string())
}

/// Database connection wrapper.
///
/// This struct wraps the connection pool. It implements
/// [`repository::CampRepository`] so the service layer never sees SQL.
///
/// ## Usage
///
/// ```rust,ignore
/// let db = Database::connect("postgres://...", 10).await?;
/// let camp = queries::get_camp_by_moniker(db.pool(), "atl2023", false).await?;
/// ```
#[derive(Clone)]
pub struct Database {
    /// The connection pool
    pool: Pool,
}

impl Database {
    /// Connect to the PostgreSQL database.
    ///
    /// Creates a connection pool of at most `max_size` connections and
    /// checks out one connection to make sure the server is reachable.
    pub async fn connect(database_url: &str, max_size: usize) -> Result<Self, DatabaseError> {
        info!("Connecting to database...");

        let mut config = Config::new();
        config.url = Some(database_url.to_string());
        config.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });
        config.pool = Some(PoolConfig {
            max_size,
            ..Default::default()
        });

        let pool = config
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| DatabaseError::ConfigError(e.to_string()))?;

        // Test connection
        let client = pool.get().await
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

        client.query("SELECT 1", &[]).await
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

        info!("Database connection established (pool size {})", max_size);

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// The schema lives in `migrations/001_initial_schema.sql` and is
    /// compiled into the binary, so the working directory does not matter.
    pub async fn run_migrations(&self) -> Result<(), DatabaseError> {
        info!("Running database migrations...");

        let client = self.pool.get().await
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

        match client.batch_execute(INITIAL_SCHEMA).await {
            Ok(_) => {
                info!("Migrations completed successfully");
                Ok(())
            }
            Err(e) => {
                let detail = e.as_db_error()
                    .and_then(|db_err| db_err.detail())
                    .unwrap_or("No detail available");

                error!("Migration execution error: {}", e);
                error!("  Detail: {}", detail);

                Err(DatabaseError::MigrationError(format!("{} ({})", e, detail)))
            }
        }
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool {
        &self.pool
    }
}

// Re-export commonly used items
pub use memory::InMemoryCampRepository;
pub use models::*;
pub use repository::CampRepository;
