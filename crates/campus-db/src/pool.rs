//! # Database Handle
//!
//! Connection ownership and repository access for the university store.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Handle                                    │
//! │                                                                         │
//! │  Application startup                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::from_env() / DbConfig::new(path)                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await ← Create pool + bootstrap schema          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │            SqlitePool                    │                           │
//! │  │  ┌─────┐                                 │                           │
//! │  │  │Conn1│   (max_connections, default 1)  │                           │
//! │  │  └─────┘                                 │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       │ every repository handle clones the same pool                   │
//! │       ▼                                                                 │
//! │  db.employees()  db.students()  db.marks()  ...  db.reports()          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! File databases run in WAL mode so table views can keep reading while a
//! form writes. In-memory databases keep SQLite's default journal.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::DbConfig;
use crate::error::{DbError, DbResult};
use crate::functions;
use crate::migrations;
use crate::reports::ReportRepository;
use crate::repository::{
    EmployeeRepository, EmployeeSubjectRepository, GroupRepository, LessonRepository,
    LessonTypeRepository, MarkRepository, PositionRepository, StudentRepository,
    SubjectRepository,
};

/// Main database handle providing repository access.
///
/// Owns the connection pool. Repository handles are cheap clones that share
/// it, so callers ask for one whenever they need it:
///
/// ```rust,ignore
/// let db = Database::new(DbConfig::from_env()?).await?;
///
/// let teachers = db.employees().find_by_position(1).await?;
/// let schedule = db.reports().schedule().await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    /// The SQLite connection pool.
    pool: SqlitePool,
}

impl Database {
    /// Opens the database described by `config`.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Enables foreign keys (SQLite ships with them off)
    /// 3. Makes `LIKE` case-sensitive
    /// 4. Creates the connection pool, registering SQL functions per connection
    /// 5. Creates the schema (if enabled)
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing database connection"
        );

        let connect_options = if config.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
        } else {
            SqliteConnectOptions::new()
                .filename(&config.database_path)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .create_if_missing(true)
        };
        // LIKE matches case-sensitively, as name suffix searches expect
        let connect_options = connect_options
            .foreign_keys(true)
            .pragma("case_sensitive_like", "ON");

        debug!("Connection options configured");

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(config.idle_timeout)
            .after_connect(|conn, _meta| {
                Box::pin(async move { functions::register(conn).await })
            });

        if config.is_in_memory() {
            // Recycling the connection would drop the data
            pool_options = pool_options.max_lifetime(None::<Duration>);
        }

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        let db = Database { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Creates any missing tables. Idempotent.
    pub async fn run_migrations(&self) -> DbResult<()> {
        info!("Running database migrations");
        migrations::run_migrations(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn employees(&self) -> EmployeeRepository {
        EmployeeRepository::new(self.pool.clone())
    }

    pub fn positions(&self) -> PositionRepository {
        PositionRepository::new(self.pool.clone())
    }

    pub fn subjects(&self) -> SubjectRepository {
        SubjectRepository::new(self.pool.clone())
    }

    pub fn groups(&self) -> GroupRepository {
        GroupRepository::new(self.pool.clone())
    }

    pub fn lesson_types(&self) -> LessonTypeRepository {
        LessonTypeRepository::new(self.pool.clone())
    }

    /// Returns the timetable repository.
    pub fn lessons(&self) -> LessonRepository {
        LessonRepository::new(self.pool.clone())
    }

    pub fn students(&self) -> StudentRepository {
        StudentRepository::new(self.pool.clone())
    }

    pub fn marks(&self) -> MarkRepository {
        MarkRepository::new(self.pool.clone())
    }

    /// Returns the teacher ↔ subject link repository.
    pub fn employee_subjects(&self) -> EmployeeSubjectRepository {
        EmployeeSubjectRepository::new(self.pool.clone())
    }

    /// Returns the read-only reporting catalog.
    pub fn reports(&self) -> ReportRepository {
        ReportRepository::new(self.pool.clone())
    }

    /// Closes the connection pool.
    ///
    /// ## Note
    /// After calling close, all repository operations fail with
    /// [`DbError::Driver`]. An in-memory database is gone for good.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Checks if the database can execute queries.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use campus_core::Position;

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert!(db.health_check().await);
    }

    #[tokio::test]
    async fn test_in_memory_databases_are_isolated() {
        let first = Database::new(DbConfig::in_memory()).await.unwrap();
        let second = Database::new(DbConfig::in_memory()).await.unwrap();

        first.positions().create(&Position::new("Лаборант")).await.unwrap();

        assert_eq!(first.positions().find_all().await.unwrap().len(), 1);
        assert!(second.positions().find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        db.run_migrations().await.unwrap();
        db.run_migrations().await.unwrap();

        let (total, applied) = migrations::migration_status(db.pool()).await.unwrap();
        assert_eq!(total, applied);
    }

    #[tokio::test]
    async fn test_closed_database_is_unhealthy() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;

        assert!(!db.health_check().await);
        let err = db.positions().find_all().await.unwrap_err();
        assert!(matches!(err, DbError::Driver(_)));
    }

    #[tokio::test]
    async fn test_file_database_persists_between_handles() {
        let path = std::env::temp_dir().join(format!("campus-test-{}.db", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        db.positions().create(&Position::new("Лаборант")).await.unwrap();
        db.close().await;

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        assert_eq!(db.positions().find_all().await.unwrap().len(), 1);
        db.close().await;

        let _ = std::fs::remove_file(&path);
    }
}
