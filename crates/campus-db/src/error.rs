//! # Database Error Types
//!
//! Error types for database operations and the normalizer that produces them.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  .at("students.create") ← Normalizer, applied at every repository      │
//! │       │                    and report boundary                          │
//! │       ├── RowNotFound            → DbError::NotFound                   │
//! │       ├── constraint violation   → DbError::Constraint(QueryError)     │
//! │       ├── any other store error  → DbError::Query(QueryError)          │
//! │       └── driver / pool failure  → DbError::Driver (passed through)    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Caller (forms, tables) shows the formatted message                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Formatted Store Errors
//! Every error the store itself reports is rendered the same way:
//!
//! ```text
//! SQL Error: UNIQUE constraint failed: students.passport, Detail: students.passport,
//! Where: students.create, Code: 2067, SQLState: 23505
//! ```

use campus_core::ValidationError;
use sqlx::error::ErrorKind;
use thiserror::Error;
use tracing::warn;

// =============================================================================
// Query Error
// =============================================================================

/// A store-reported failure with every structured field the backend exposes.
///
/// ## Fields
/// - `message` - the backend's own message
/// - `detail` - the constraint target (`table.column`) when the backend names one
/// - `location` - the operation that failed, e.g. `marks.update`
/// - `code` - SQLite extended result code
/// - `state` - SQLSTATE class derived from the violation kind
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("SQL Error: {message}, Detail: {detail}, Where: {location}, Code: {code}, SQLState: {state}")]
pub struct QueryError {
    pub message: String,
    pub detail: String,
    pub location: String,
    pub code: String,
    pub state: String,
}

// =============================================================================
// Database Error
// =============================================================================

/// Database operation errors.
///
/// Nothing in this crate retries: every variant is returned to the caller
/// as soon as it happens.
#[derive(Debug, Error)]
pub enum DbError {
    /// Record not found.
    ///
    /// ## When This Occurs
    /// - `find_one` / unique lookup matches zero rows
    /// - `update` / `delete` affects zero rows
    #[error("{entity} not found: {key}")]
    NotFound { entity: String, key: String },

    /// The store rejected a write because of a declared constraint.
    ///
    /// ## When This Occurs
    /// - Duplicate passport, group number, subject or lesson type name
    /// - Referencing a position, group, student... that doesn't exist
    /// - Deleting a row that is still referenced
    #[error("{0}")]
    Constraint(QueryError),

    /// Any other failure reported by the store.
    #[error("{0}")]
    Query(QueryError),

    /// Input rejected before it reached the store.
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// A mark or subject link names an employee who is not a teacher.
    #[error("Employee {employee_id} does not hold the teacher position")]
    NotTeacher { employee_id: u64 },

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created or opened
    /// - File permissions issue
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Schema bootstrap failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Driver failure that carries no store fields (pool closed, timeouts,
    /// decode errors). Passed through unchanged.
    #[error(transparent)]
    Driver(sqlx::Error),
}

impl DbError {
    /// Creates a NotFound error for a given entity and lookup key.
    pub fn not_found(entity: impl Into<String>, key: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            key: key.to_string(),
        }
    }

    /// Returns the formatted store error, if this is one.
    pub fn query_error(&self) -> Option<&QueryError> {
        match self {
            DbError::Constraint(err) | DbError::Query(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound { .. })
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Normalizer
// =============================================================================

/// Attaches an operation name to a raw driver result and normalizes its error.
///
/// ## Usage
/// ```rust,ignore
/// sqlx::query("DELETE FROM marks WHERE id = ?1")
///     .bind(id)
///     .execute(&self.pool)
///     .await
///     .at("marks.delete")?;
/// ```
pub trait ResultExt<T> {
    fn at(self, location: &str) -> DbResult<T>;
}

impl<T> ResultExt<T> for Result<T, sqlx::Error> {
    fn at(self, location: &str) -> DbResult<T> {
        self.map_err(|err| normalize(err, location))
    }
}

/// Converts a driver error into a [`DbError`].
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound          → DbError::NotFound
/// sqlx::Error::Database (UNIQUE,
///   FOREIGN KEY, NOT NULL, CHECK)   → DbError::Constraint
/// sqlx::Error::Database (other)     → DbError::Query
/// anything else                     → DbError::Driver
/// ```
pub fn normalize(err: sqlx::Error, location: &str) -> DbError {
    match err {
        sqlx::Error::RowNotFound => {
            let entity = location.split('.').next().unwrap_or(location);
            DbError::not_found(entity, "no rows")
        }

        sqlx::Error::Database(db_err) => {
            let kind = db_err.kind();
            let message = db_err.message().to_string();

            let query = QueryError {
                detail: constraint_target(&message),
                location: location.to_string(),
                code: db_err.code().map(|code| code.into_owned()).unwrap_or_default(),
                state: sql_state(&kind).to_string(),
                message,
            };

            warn!(error = %query, "Store rejected operation");

            match kind {
                ErrorKind::UniqueViolation
                | ErrorKind::ForeignKeyViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation => DbError::Constraint(query),
                _ => DbError::Query(query),
            }
        }

        other => {
            warn!(location, error = %other, "Driver failure");
            DbError::Driver(other)
        }
    }
}

/// Extracts `table.column` from messages like
/// `UNIQUE constraint failed: students.passport`.
fn constraint_target(message: &str) -> String {
    message
        .split_once("constraint failed: ")
        .map(|(_, target)| target.trim().to_string())
        .unwrap_or_default()
}

fn sql_state(kind: &ErrorKind) -> &'static str {
    match kind {
        ErrorKind::UniqueViolation => "23505",
        ErrorKind::ForeignKeyViolation => "23503",
        ErrorKind::NotNullViolation => "23502",
        ErrorKind::CheckViolation => "23514",
        _ => "HY000",
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
