//! # Domain Types
//!
//! Entity records stored in the university database.
//!
//! ## Entity Relationships
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Position ◄──── Employee ◄────┬──── EmployeeSubject ────► Subject      │
//! │                    ▲          │                            ▲  ▲         │
//! │                    │ curator  │ grader                     │  │         │
//! │                    │ (opt.)   │                            │  │         │
//! │  Group ◄──────── Student ◄── Mark ─────────────────────────┘  │         │
//! │    ▲                                                          │         │
//! │    └──────────── Lesson ──────────────────────────────────────┘         │
//! │                    │                                                    │
//! │                    └──────► LessonType                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every entity except [`EmployeeSubject`] carries a store-assigned `id`.
//! Records built with `new` have `id == 0` until they are persisted; the
//! repositories return a copy with the assigned id filled in.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::validation::{
    validate_exact_chars, validate_min_chars, validate_positive, validate_reference,
    ValidationResult,
};

// =============================================================================
// Employee
// =============================================================================

/// A member of staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Employee {
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "i64"))]
    pub id: u64,

    /// Full name, at least 5 characters.
    pub name: String,

    /// Passport number, exactly 9 characters.
    pub passport: String,

    /// Position held (FK → positions).
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "i64"))]
    pub position_id: u64,
}

impl Employee {
    pub fn new(name: impl Into<String>, passport: impl Into<String>, position_id: u64) -> Self {
        Employee {
            id: 0,
            name: name.into(),
            passport: passport.into(),
            position_id,
        }
    }

    pub fn validate(&self) -> ValidationResult<()> {
        validate_min_chars("name", &self.name, 5)?;
        validate_exact_chars("passport", &self.passport, 9)?;
        validate_reference("position_id", self.position_id)
    }
}

// =============================================================================
// Position
// =============================================================================

/// A staff position ("Преподаватель", "Лаборант", ...).
///
/// Names are unique by convention only; the store does not enforce it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Position {
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "i64"))]
    pub id: u64,
    pub name: String,
}

impl Position {
    pub fn new(name: impl Into<String>) -> Self {
        Position {
            id: 0,
            name: name.into(),
        }
    }

    pub fn validate(&self) -> ValidationResult<()> {
        validate_min_chars("name", &self.name, 1)
    }
}

// =============================================================================
// Subject
// =============================================================================

/// A taught subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Subject {
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "i64"))]
    pub id: u64,
    pub name: String,
    pub description: String,
}

impl Subject {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Subject {
            id: 0,
            name: name.into(),
            description: description.into(),
        }
    }

    pub fn validate(&self) -> ValidationResult<()> {
        validate_min_chars("name", &self.name, 1)?;
        validate_min_chars("description", &self.description, 1)
    }
}

// =============================================================================
// Employee ↔ Subject
// =============================================================================

/// Link between a teacher and a subject they teach.
///
/// Keyed by the `(employee_id, subject_id)` pair; there is no surrogate id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct EmployeeSubject {
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "i64"))]
    pub employee_id: u64,
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "i64"))]
    pub subject_id: u64,
}

impl EmployeeSubject {
    pub fn new(employee_id: u64, subject_id: u64) -> Self {
        EmployeeSubject {
            employee_id,
            subject_id,
        }
    }

    pub fn validate(&self) -> ValidationResult<()> {
        validate_reference("employee_id", self.employee_id)?;
        validate_reference("subject_id", self.subject_id)
    }
}

// =============================================================================
// Group
// =============================================================================

/// A student group, identified to humans by its number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Group {
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "i64"))]
    pub id: u64,
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "i64"))]
    pub number: u64,
}

impl Group {
    pub fn new(number: u64) -> Self {
        Group { id: 0, number }
    }

    pub fn validate(&self) -> ValidationResult<()> {
        validate_reference("number", self.number)
    }
}

// =============================================================================
// Lesson Type
// =============================================================================

/// Kind of lesson, a two-letter code ("ЛК" lecture, "ПЗ" practice, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct LessonType {
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "i64"))]
    pub id: u64,
    pub name: String,
}

impl LessonType {
    pub fn new(name: impl Into<String>) -> Self {
        LessonType {
            id: 0,
            name: name.into(),
        }
    }

    pub fn validate(&self) -> ValidationResult<()> {
        validate_exact_chars("name", &self.name, 2)
    }
}

// =============================================================================
// Lesson
// =============================================================================

/// One slot in the timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Lesson {
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "i64"))]
    pub id: u64,
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "i64"))]
    pub group_id: u64,
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "i64"))]
    pub subject_id: u64,
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "i64"))]
    pub lesson_type_id: u64,
    pub week: u16,
    pub weekday: u16,
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "i64"))]
    pub room: u64,
}

impl Lesson {
    pub fn new(
        group_id: u64,
        subject_id: u64,
        lesson_type_id: u64,
        week: u16,
        weekday: u16,
        room: u64,
    ) -> Self {
        Lesson {
            id: 0,
            group_id,
            subject_id,
            lesson_type_id,
            week,
            weekday,
            room,
        }
    }

    pub fn validate(&self) -> ValidationResult<()> {
        validate_reference("group_id", self.group_id)?;
        validate_reference("subject_id", self.subject_id)?;
        validate_reference("lesson_type_id", self.lesson_type_id)?;
        validate_positive("week", u64::from(self.week))?;
        validate_positive("weekday", u64::from(self.weekday))?;
        validate_reference("room", self.room)
    }
}

// =============================================================================
// Student
// =============================================================================

/// A student, optionally supervised by a curator.
///
/// `employee_id == None` means "no curator". Row decoding lives in
/// `row.rs` because the nullable id has no derive-friendly conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: u64,

    /// Full name, at least 5 characters.
    pub name: String,

    /// Passport number, exactly 9 characters.
    pub passport: String,

    /// Curator (FK → employees), if assigned.
    pub employee_id: Option<u64>,

    pub group_id: u64,
}

impl Student {
    pub fn new(
        name: impl Into<String>,
        passport: impl Into<String>,
        employee_id: Option<u64>,
        group_id: u64,
    ) -> Self {
        Student {
            id: 0,
            name: name.into(),
            passport: passport.into(),
            employee_id,
            group_id,
        }
    }

    pub fn validate(&self) -> ValidationResult<()> {
        validate_min_chars("name", &self.name, 5)?;
        validate_exact_chars("passport", &self.passport, 9)?;
        if let Some(curator) = self.employee_id {
            validate_reference("employee_id", curator)?;
        }
        validate_reference("group_id", self.group_id)
    }
}

// =============================================================================
// Mark
// =============================================================================

/// A grade given by a teacher to a student in a subject.
///
/// `date` serializes as `YYYY-MM-DD`, the only textual form the system
/// exchanges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Mark {
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "i64"))]
    pub id: u64,

    /// Grader (FK → employees); must hold the teacher position.
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "i64"))]
    pub employee_id: u64,
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "i64"))]
    pub student_id: u64,
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "i64"))]
    pub subject_id: u64,
    pub mark: u16,
    pub date: NaiveDate,
}

impl Mark {
    pub fn new(
        employee_id: u64,
        student_id: u64,
        subject_id: u64,
        mark: u16,
        date: NaiveDate,
    ) -> Self {
        Mark {
            id: 0,
            employee_id,
            student_id,
            subject_id,
            mark,
            date,
        }
    }

    pub fn validate(&self) -> ValidationResult<()> {
        validate_reference("employee_id", self.employee_id)?;
        validate_reference("student_id", self.student_id)?;
        validate_reference("subject_id", self.subject_id)?;
        validate_positive("mark", u64::from(self.mark))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
