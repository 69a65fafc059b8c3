//! # Repository Module
//!
//! One repository per entity, all with the same shape.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Entity Repository Contract                           │
//! │                                                                         │
//! │  db.students()                                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StudentRepository                                                     │
//! │  ├── create(&student)          → Student (with store-assigned id)      │
//! │  ├── find_one(id)              → Student | NotFound                    │
//! │  ├── find_all()                → Vec<Student> (empty is fine)          │
//! │  ├── find_by_passport(p)       → Student | NotFound   (unique column)  │
//! │  ├── find_by_group(id)         → Vec<Student>          (other columns) │
//! │  ├── update(id, &student)      → Student | NotFound                    │
//! │  └── delete(id)                → () | NotFound                         │
//! │       │                                                                 │
//! │       │  every find_by_* goes through one private `lookup(column, v)`  │
//! │       │  where `column` is a per-entity enum, never user text          │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`EmployeeRepository`], [`PositionRepository`], [`SubjectRepository`]
//! - [`GroupRepository`], [`LessonTypeRepository`], [`LessonRepository`]
//! - [`StudentRepository`], [`MarkRepository`]
//! - [`EmployeeSubjectRepository`] - keyed on `(employee_id, subject_id)`

use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, SqlitePool};

use crate::error::{DbError, DbResult, ResultExt};

pub mod employee;
pub mod employee_subject;
pub mod group;
pub mod lesson;
pub mod lesson_type;
pub mod mark;
pub mod position;
pub mod student;
pub mod subject;

pub use employee::EmployeeRepository;
pub use employee_subject::EmployeeSubjectRepository;
pub use group::GroupRepository;
pub use lesson::LessonRepository;
pub use lesson_type::LessonTypeRepository;
pub use mark::MarkRepository;
pub use position::PositionRepository;
pub use student::StudentRepository;
pub use subject::SubjectRepository;

// =============================================================================
// Lookup Values
// =============================================================================

/// A value compared against a lookup column.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Param {
    Int(i64),
    Text(String),
    Date(NaiveDate),
}

impl Param {
    /// An id parameter, or `None` when no stored row can carry it.
    pub(crate) fn id(id: u64) -> Option<Param> {
        i64::try_from(id).ok().map(Param::Int)
    }

    pub(crate) fn text(value: &str) -> Param {
        Param::Text(value.to_string())
    }
}

impl From<u16> for Param {
    fn from(value: u16) -> Self {
        Param::Int(i64::from(value))
    }
}

// =============================================================================
// Shared Helpers
// =============================================================================

/// Converts a primary key for binding; ids beyond the INTEGER range can't
/// exist, so they are reported as not found.
pub(crate) fn key(entity: &str, id: u64) -> DbResult<i64> {
    i64::try_from(id).map_err(|_| DbError::not_found(entity, id))
}

/// Converts an id that already passed `validate()` (which bounds it by
/// `MAX_ID`) for binding.
pub(crate) fn sql_id(id: u64) -> i64 {
    i64::try_from(id).unwrap_or(i64::MAX)
}

/// Runs a single-parameter SELECT and returns every row.
pub(crate) async fn fetch_by<T>(
    pool: &SqlitePool,
    sql: &str,
    param: Param,
    location: &str,
) -> DbResult<Vec<T>>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let query = sqlx::query_as::<_, T>(sql);
    let query = match param {
        Param::Int(value) => query.bind(value),
        Param::Text(value) => query.bind(value),
        Param::Date(value) => query.bind(value),
    };

    query.fetch_all(pool).await.at(location)
}

/// Keeps the first row of a unique lookup, or reports `NotFound`.
pub(crate) fn first_or_not_found<T>(
    rows: Vec<T>,
    entity: &str,
    key: impl ToString,
) -> DbResult<T> {
    rows.into_iter()
        .next()
        .ok_or_else(|| DbError::not_found(entity, key))
}

/// Maps "zero rows touched" to `NotFound`.
pub(crate) fn ensure_affected(rows: u64, entity: &str, key: impl ToString) -> DbResult<()> {
    if rows == 0 {
        return Err(DbError::not_found(entity, key));
    }
    Ok(())
}

// =============================================================================
// Teacher Check
// =============================================================================

/// Whether `employee_id` holds the position named
/// [`TEACHER_POSITION_NAME`](campus_core::TEACHER_POSITION_NAME).
pub(crate) async fn is_teacher(pool: &SqlitePool, employee_id: u64) -> DbResult<bool> {
    let Ok(id) = i64::try_from(employee_id) else {
        return Ok(false);
    };

    let exists: i64 = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1
            FROM employees e
            INNER JOIN positions p ON p.id = e.position_id
            WHERE e.id = ?1 AND p.name = ?2
        )
        "#,
    )
    .bind(id)
    .bind(campus_core::TEACHER_POSITION_NAME)
    .fetch_one(pool)
    .await
    .at("reports.is_teacher")?;

    Ok(exists != 0)
}

/// Rejects writes that name a non-teacher, before anything is persisted.
pub(crate) async fn ensure_teacher(pool: &SqlitePool, employee_id: u64) -> DbResult<()> {
    if is_teacher(pool, employee_id).await? {
        Ok(())
    } else {
        Err(DbError::NotTeacher { employee_id })
    }
}
