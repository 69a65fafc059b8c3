//! # Report Rows
//!
//! Named row shapes for the fixed reporting queries.
//!
//! Each query in `campus_db::reports` returns a list of one of these types,
//! so presentation code gets named fields instead of positional strings.
//! Columns that come from the optional side of an outer join are `Option`s.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Employee name and passport (all employees, or one by id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct EmployeeInfo {
    pub name: String,
    pub passport: String,
}

/// Employee name only (employees holding either of two positions).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct EmployeeName {
    pub name: String,
}

/// A student with no curator assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StudentWithoutCurator {
    pub name: String,
    pub passport: String,
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "i64"))]
    pub group_id: u64,
}

/// Student name and passport (middle-name suffix search).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StudentByName {
    pub name: String,
    pub passport: String,
}

/// A mark as seen from the student's side: who, what, when.
///
/// Shared by the "marks above threshold" and "sorted marks" reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StudentMark {
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "i64"))]
    pub student_id: u64,
    pub mark: u16,
    pub date: NaiveDate,
}

/// Subject name (alphabetical subject list).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SubjectName {
    pub name: String,
}

/// One cell of the students × groups cartesian product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StudentGroupPair {
    pub student_name: String,
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "i64"))]
    pub group_number: u64,
}

/// One timetable line with every foreign key resolved to its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ScheduleEntry {
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "i64"))]
    pub group_number: u64,
    pub subject_name: String,
    pub lesson_type_name: String,
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "i64"))]
    pub room: u64,
    pub week: u16,
    pub weekday: u16,
}

/// A student/curator pairing from one of the outer joins.
///
/// Student columns are `None` for curators without students (right and full
/// join); curator columns are `None` for students without a curator (left
/// and full join).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StudentCurator {
    pub student_name: Option<String>,
    pub student_passport: Option<String>,
    pub curator_name: Option<String>,
    pub curator_passport: Option<String>,
}

/// Student name transformed by the store: uppercased, with its length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StudentNameStat {
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "i64"))]
    pub id: u64,
    pub uppercase_name: String,
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "i64"))]
    pub name_length: u64,
}
