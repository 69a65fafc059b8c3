//! # campus-db: Database Layer for the University Administration Tool
//!
//! Data access for staff, students, groups, the timetable and marks.
//! It uses SQLite with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Campus Admin Data Flow                           │
//! │                                                                         │
//! │  Form / table (filter selector, "special queries" menu)                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     campus-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │   Reports    │  │   │
//! │  │   │   (pool.rs)   │    │  + filter()   │    │ (reports.rs) │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ EmployeeRepo  │    │ schedule     │  │   │
//! │  │   │ schema        │    │ StudentRepo   │    │ outer joins  │  │   │
//! │  │   │ bootstrap     │    │ MarkRepo ...  │    │ is_teacher   │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────┬───────┘  │   │
//! │  │                                │ .at("x.y")        │          │   │
//! │  │                                ▼                   ▼          │   │
//! │  │                        error.rs normalizer → DbError          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (campus.db)                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - Connection settings, `CAMPUS_DB_*` environment variables
//! - [`pool`] - The `Database` handle that owns the connections
//! - [`migrations`] - Embedded schema
//! - [`error`] - `DbError`, `QueryError` and the normalizer
//! - [`repository`] - One repository per entity
//! - [`reports`] - Read-only cross-entity queries
//! - `filter` - `filter(field, raw)` on every repository
//! - `functions` - SQL functions installed on each connection
//!
//! ## Usage
//!
//! ```rust,ignore
//! use campus_core::{Student, StudentField};
//! use campus_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::from_env()?).await?;
//!
//! let student = db
//!     .students()
//!     .create(&Student::new("Петрова Анна Сергеевна", "123456789", None, 1))
//!     .await?;
//!
//! // What the table view does when the user picks "Passport" and types a value
//! let rows = db.students().filter(StudentField::Passport, "123456789").await?;
//! assert_eq!(rows, vec![student]);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
mod filter;
mod functions;
pub mod migrations;
pub mod pool;
pub mod reports;
pub mod repository;

#[cfg(test)]
mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ConfigError, DbConfig};
pub use error::{DbError, DbResult, QueryError, ResultExt};
pub use pool::Database;
pub use reports::ReportRepository;

// Repository re-exports for convenience
pub use repository::{
    EmployeeRepository, EmployeeSubjectRepository, GroupRepository, LessonRepository,
    LessonTypeRepository, MarkRepository, PositionRepository, StudentRepository,
    SubjectRepository,
};
