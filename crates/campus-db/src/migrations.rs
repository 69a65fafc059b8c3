//! # Schema Bootstrap
//!
//! Embedded SQL that creates the university schema.
//!
//! ## How It Works
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Bootstrap Process                                  │
//! │                                                                         │
//! │  Database::new                                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Check _sqlx_migrations table                                          │
//! │       │                                                                 │
//! │       ├── Table doesn't exist? Create it                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  001_initial_schema.sql ✓ already applied? skip : run                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  positions, employees, subjects, employees_subjects, groups,           │
//! │  lesson_types, lessons, students, marks                                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The schema is fixed. New files in `migrations/sqlite/` are only for
//! constraints or indexes the store is missing; existing files are never
//! edited.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::{DbResult, ResultExt};

/// Embedded migrations from the `migrations/sqlite` directory.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Runs all pending migrations. Idempotent.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    info!("Checking for pending migrations");

    MIGRATOR.run(pool).await?;

    info!("All migrations applied successfully");
    Ok(())
}

/// Returns `(total_migrations, applied_migrations)`.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await
        .at("migrations.status")?;

    Ok((total, usize::try_from(applied).unwrap_or(0)))
}
