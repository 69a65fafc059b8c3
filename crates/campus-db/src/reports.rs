//! # Reporting Catalog
//!
//! Fixed, read-only questions that cross entity boundaries.
//!
//! ## Catalog
//! ```text
//! ┌───────────────────────────────┬──────────────────────────┬─────────────────────────┐
//! │ method                        │ SQL shape                │ row                     │
//! ├───────────────────────────────┼──────────────────────────┼─────────────────────────┤
//! │ employees / employee_by_id    │ projection               │ EmployeeInfo            │
//! │ students_without_curator      │ employee_id IS NULL      │ StudentWithoutCurator   │
//! │ employees_in_positions        │ position = a OR b        │ EmployeeName            │
//! │ marks_above                   │ subject = s AND mark > t │ StudentMark             │
//! │ students_by_name_suffix       │ LIKE '%' || fragment     │ StudentByName           │
//! │ subjects_by_name              │ ORDER BY name ASC        │ SubjectName             │
//! │ marks_by_date                 │ date ASC, mark DESC      │ StudentMark             │
//! │ students_with_groups          │ CROSS JOIN               │ StudentGroupPair        │
//! │ schedule                      │ INNER JOIN ×3            │ ScheduleEntry           │
//! │ students_with_curators        │ LEFT OUTER JOIN          │ StudentCurator          │
//! │ curators_with_students        │ RIGHT OUTER JOIN         │ StudentCurator          │
//! │ all_student_curators          │ FULL OUTER JOIN          │ StudentCurator          │
//! │ student_name_stats            │ unicode_upper, LENGTH    │ StudentNameStat         │
//! │ is_teacher                    │ EXISTS (employee ⨝ pos.) │ bool                    │
//! └───────────────────────────────┴──────────────────────────┴─────────────────────────┘
//! ```
//!
//! None of these mutate state. Unless the table says otherwise, row order is
//! whatever the store returns.
//!
//! Uppercasing goes through `unicode_upper` (see `functions.rs`), since
//! SQLite's `UPPER` skips Cyrillic. Every connection runs with
//! `case_sensitive_like`, so suffix matches respect case.

use campus_core::{
    EmployeeInfo, EmployeeName, ScheduleEntry, StudentByName, StudentCurator, StudentGroupPair,
    StudentMark, StudentNameStat, StudentWithoutCurator, SubjectName,
};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::{DbResult, ResultExt};
use crate::repository::{self, sql_id};

/// Columns shared by the three curator joins.
const CURATOR_COLUMNS: &str = r#"
    students.name      AS student_name,
    students.passport  AS student_passport,
    employees.name     AS curator_name,
    employees.passport AS curator_passport
"#;

/// Read-only reporting queries.
///
/// ## Usage
/// ```rust,ignore
/// let reports = db.reports();
///
/// for entry in reports.schedule().await? {
///     println!("{} {} {} room {}", entry.group_number, entry.subject_name,
///              entry.lesson_type_name, entry.room);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Runs a parameterless report.
    async fn fetch<T>(&self, sql: &str, location: &str) -> DbResult<Vec<T>>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let rows = sqlx::query_as::<_, T>(sql)
            .fetch_all(&self.pool)
            .await
            .at(location)?;

        debug!(report = location, count = rows.len(), "Report executed");
        Ok(rows)
    }

    // =========================================================================
    // Staff
    // =========================================================================

    /// Name and passport of every employee.
    pub async fn employees(&self) -> DbResult<Vec<EmployeeInfo>> {
        self.fetch(
            "SELECT employees.name, employees.passport FROM employees",
            "reports.employees",
        )
        .await
    }

    /// Name and passport of employee `id`; empty when there is none.
    pub async fn employee_by_id(&self, id: u64) -> DbResult<Vec<EmployeeInfo>> {
        let Ok(id) = i64::try_from(id) else {
            return Ok(Vec::new());
        };

        sqlx::query_as::<_, EmployeeInfo>(
            r#"
            SELECT employees.name, employees.passport
            FROM employees
            WHERE employees.id = ?1
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .at("reports.employee_by_id")
    }

    /// Names of employees holding position `first` or position `second`.
    pub async fn employees_in_positions(
        &self,
        first: u64,
        second: u64,
    ) -> DbResult<Vec<EmployeeName>> {
        sqlx::query_as::<_, EmployeeName>(
            r#"
            SELECT employees.name
            FROM employees
            WHERE employees.position_id = ?1 OR employees.position_id = ?2
            "#,
        )
        .bind(sql_id(first))
        .bind(sql_id(second))
        .fetch_all(&self.pool)
        .await
        .at("reports.employees_in_positions")
    }

    /// Whether `employee_id` holds the teacher position.
    pub async fn is_teacher(&self, employee_id: u64) -> DbResult<bool> {
        repository::is_teacher(&self.pool, employee_id).await
    }

    // =========================================================================
    // Students
    // =========================================================================

    pub async fn students_without_curator(&self) -> DbResult<Vec<StudentWithoutCurator>> {
        self.fetch(
            r#"
            SELECT students.name, students.passport, students.group_id
            FROM students
            WHERE students.employee_id IS NULL
            "#,
            "reports.students_without_curator",
        )
        .await
    }

    /// Students whose name ends with `fragment` (a patronymic, usually).
    ///
    /// `"вна"` finds "Анна Петровна" but not "Иванова Анна".
    pub async fn students_by_name_suffix(&self, fragment: &str) -> DbResult<Vec<StudentByName>> {
        sqlx::query_as::<_, StudentByName>(
            r#"
            SELECT students.name, students.passport
            FROM students
            WHERE students.name LIKE '%' || ?1
            "#,
        )
        .bind(fragment)
        .fetch_all(&self.pool)
        .await
        .at("reports.students_by_name_suffix")
    }

    /// Every student paired with every group, regardless of membership.
    pub async fn students_with_groups(&self) -> DbResult<Vec<StudentGroupPair>> {
        self.fetch(
            r#"
            SELECT students.name AS student_name, "groups".number AS group_number
            FROM students
            CROSS JOIN "groups"
            "#,
            "reports.students_with_groups",
        )
        .await
    }

    /// Every student, with curator columns NULL when there is no curator.
    pub async fn students_with_curators(&self) -> DbResult<Vec<StudentCurator>> {
        let sql = format!(
            "SELECT {CURATOR_COLUMNS} FROM students \
             LEFT OUTER JOIN employees ON students.employee_id = employees.id"
        );
        self.fetch(&sql, "reports.students_with_curators").await
    }

    /// Every employee, with student columns NULL for those curating no one.
    pub async fn curators_with_students(&self) -> DbResult<Vec<StudentCurator>> {
        let sql = format!(
            "SELECT {CURATOR_COLUMNS} FROM students \
             RIGHT OUTER JOIN employees ON students.employee_id = employees.id"
        );
        self.fetch(&sql, "reports.curators_with_students").await
    }

    /// Both of the above: unmatched students and unmatched employees.
    pub async fn all_student_curators(&self) -> DbResult<Vec<StudentCurator>> {
        let sql = format!(
            "SELECT {CURATOR_COLUMNS} FROM students \
             FULL OUTER JOIN employees ON students.employee_id = employees.id"
        );
        self.fetch(&sql, "reports.all_student_curators").await
    }

    /// Uppercased name and its length in characters, computed by the store.
    pub async fn student_name_stats(&self) -> DbResult<Vec<StudentNameStat>> {
        self.fetch(
            r#"
            SELECT students.id,
                   unicode_upper(students.name) AS uppercase_name,
                   LENGTH(students.name)        AS name_length
            FROM students
            "#,
            "reports.student_name_stats",
        )
        .await
    }

    // =========================================================================
    // Marks & Subjects
    // =========================================================================

    /// Marks in `subject_id` strictly greater than `threshold`.
    pub async fn marks_above(&self, subject_id: u64, threshold: u16) -> DbResult<Vec<StudentMark>> {
        sqlx::query_as::<_, StudentMark>(
            r#"
            SELECT marks.student_id, marks.mark, marks.date
            FROM marks
            WHERE marks.subject_id = ?1 AND marks.mark > ?2
            "#,
        )
        .bind(sql_id(subject_id))
        .bind(threshold)
        .fetch_all(&self.pool)
        .await
        .at("reports.marks_above")
    }

    /// Every mark, oldest first; on the same day the higher mark comes first.
    pub async fn marks_by_date(&self) -> DbResult<Vec<StudentMark>> {
        self.fetch(
            r#"
            SELECT marks.student_id, marks.mark, marks.date
            FROM marks
            ORDER BY marks.date ASC, marks.mark DESC
            "#,
            "reports.marks_by_date",
        )
        .await
    }

    pub async fn subjects_by_name(&self) -> DbResult<Vec<SubjectName>> {
        self.fetch(
            "SELECT subjects.name FROM subjects ORDER BY subjects.name ASC",
            "reports.subjects_by_name",
        )
        .await
    }

    /// The timetable with every reference resolved to its label.
    pub async fn schedule(&self) -> DbResult<Vec<ScheduleEntry>> {
        self.fetch(
            r#"
            SELECT "groups".number     AS group_number,
                   subjects.name       AS subject_name,
                   lesson_types.name   AS lesson_type_name,
                   lessons.room,
                   lessons.week,
                   lessons.weekday
            FROM lessons
            INNER JOIN "groups"     ON lessons.group_id = "groups".id
            INNER JOIN subjects     ON lessons.subject_id = subjects.id
            INNER JOIN lesson_types ON lessons.lesson_type_id = lesson_types.id
            "#,
            "reports.schedule",
        )
        .await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{campus, Campus};
    use campus_core::validation::parse_date;
    use campus_core::{Group, Lesson, Mark, Subject};

    async fn grade(campus: &Campus, student_id: u64, mark: u16, date: &str) {
        campus
            .db
            .marks()
            .create(&Mark::new(
                campus.teacher.id,
                student_id,
                campus.subject.id,
                mark,
                parse_date(date).unwrap(),
            ))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_employee_projections() {
        let campus = campus().await;
        let reports = campus.db.reports();

        assert_eq!(reports.employees().await.unwrap().len(), 2);
        assert_eq!(
            reports.employee_by_id(campus.teacher.id).await.unwrap(),
            vec![EmployeeInfo {
                name: "Smirnov Pavel".to_string(),
                passport: "100000001".to_string(),
            }]
        );
        assert!(reports.employee_by_id(9_999).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_employees_in_either_position() {
        let campus = campus().await;
        let reports = campus.db.reports();

        let mut names: Vec<String> = reports
            .employees_in_positions(campus.teacher_position.id, campus.lab_position.id)
            .await
            .unwrap()
            .into_iter()
            .map(|row| row.name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["Orlova Maria", "Smirnov Pavel"]);

        let only_teachers = reports
            .employees_in_positions(campus.teacher_position.id, 9_999)
            .await
            .unwrap();
        assert_eq!(only_teachers.len(), 1);
    }

    #[tokio::test]
    async fn test_is_teacher() {
        let campus = campus().await;
        let reports = campus.db.reports();

        assert!(reports.is_teacher(campus.teacher.id).await.unwrap());
        assert!(!reports.is_teacher(campus.assistant.id).await.unwrap());
        assert!(!reports.is_teacher(9_999).await.unwrap());
    }

    #[tokio::test]
    async fn test_students_without_curator() {
        let campus = campus().await;
        campus.student("Petrova Anna", "500000001", None).await;
        campus
            .student("Sidorov Oleg", "500000002", Some(campus.teacher.id))
            .await;

        let rows = campus.db.reports().students_without_curator().await.unwrap();
        assert_eq!(
            rows,
            vec![StudentWithoutCurator {
                name: "Petrova Anna".to_string(),
                passport: "500000001".to_string(),
                group_id: campus.group.id,
            }]
        );
    }

    #[tokio::test]
    async fn test_suffix_match_is_not_contains() {
        let campus = campus().await;
        campus.student("Анна Петровна", "500000001", None).await;
        campus.student("Иванова Анна", "500000002", None).await;
        campus.student("Вновь Прибывший", "500000003", None).await;

        let rows = campus
            .db
            .reports()
            .students_by_name_suffix("вна")
            .await
            .unwrap();

        assert_eq!(
            rows,
            vec![StudentByName {
                name: "Анна Петровна".to_string(),
                passport: "500000001".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_suffix_match_is_case_sensitive() {
        let campus = campus().await;
        campus.student("Petrova Anna", "500000001", None).await;
        let reports = campus.db.reports();

        assert!(reports.students_by_name_suffix("ANNA").await.unwrap().is_empty());
        assert!(reports.students_by_name_suffix("anna").await.unwrap().is_empty());
        assert_eq!(reports.students_by_name_suffix("Anna").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_marks_above_threshold_is_strict() {
        let campus = campus().await;
        let student = campus.student("Petrova Anna", "500000001", None).await;
        grade(&campus, student.id, 3, "2024-01-10").await;
        grade(&campus, student.id, 4, "2024-01-11").await;
        grade(&campus, student.id, 5, "2024-01-12").await;

        let rows = campus
            .db
            .reports()
            .marks_above(campus.subject.id, 4)
            .await
            .unwrap();

        assert_eq!(
            rows,
            vec![StudentMark {
                student_id: student.id,
                mark: 5,
                date: parse_date("2024-01-12").unwrap(),
            }]
        );
    }

    #[tokio::test]
    async fn test_marks_sorted_by_date_then_mark_descending() {
        let campus = campus().await;
        let student = campus.student("Petrova Anna", "500000001", None).await;
        grade(&campus, student.id, 3, "2024-01-11").await;
        grade(&campus, student.id, 2, "2024-01-10").await;
        grade(&campus, student.id, 5, "2024-01-10").await;
        grade(&campus, student.id, 4, "2024-01-10").await;

        let order: Vec<(String, u16)> = campus
            .db
            .reports()
            .marks_by_date()
            .await
            .unwrap()
            .into_iter()
            .map(|row| (row.date.to_string(), row.mark))
            .collect();

        assert_eq!(
            order,
            vec![
                ("2024-01-10".to_string(), 5),
                ("2024-01-10".to_string(), 4),
                ("2024-01-10".to_string(), 2),
                ("2024-01-11".to_string(), 3),
            ]
        );
    }

    #[tokio::test]
    async fn test_subjects_sorted_by_name() {
        let campus = campus().await;
        for name in ["Chemistry", "Algebra", "Biology"] {
            campus
                .db
                .subjects()
                .create(&Subject::new(name, "course"))
                .await
                .unwrap();
        }

        let names: Vec<String> = campus
            .db
            .reports()
            .subjects_by_name()
            .await
            .unwrap()
            .into_iter()
            .map(|row| row.name)
            .collect();

        assert_eq!(names, vec!["Algebra", "Biology", "Chemistry", "Physics"]);
    }

    #[tokio::test]
    async fn test_cartesian_product_size() {
        let campus = campus().await;
        campus.db.groups().create(&Group::new(102)).await.unwrap();
        campus.db.groups().create(&Group::new(103)).await.unwrap();
        campus.student("Petrova Anna", "500000001", None).await;
        campus.student("Sidorov Oleg", "500000002", None).await;

        let rows = campus.db.reports().students_with_groups().await.unwrap();

        assert_eq!(rows.len(), 2 * 3);
        let anna_groups = rows
            .iter()
            .filter(|row| row.student_name == "Petrova Anna")
            .count();
        assert_eq!(anna_groups, 3);
    }

    #[tokio::test]
    async fn test_schedule_resolves_labels() {
        let campus = campus().await;
        campus
            .db
            .lessons()
            .create(&Lesson::new(
                campus.group.id,
                campus.subject.id,
                campus.lesson_type.id,
                2,
                3,
                214,
            ))
            .await
            .unwrap();

        let rows = campus.db.reports().schedule().await.unwrap();
        assert_eq!(
            rows,
            vec![ScheduleEntry {
                group_number: 101,
                subject_name: "Physics".to_string(),
                lesson_type_name: "LK".to_string(),
                room: 214,
                week: 2,
                weekday: 3,
            }]
        );
    }

    #[tokio::test]
    async fn test_outer_joins_are_complete() {
        let campus = campus().await;
        campus.student("Petrova Anna", "500000001", None).await;
        campus
            .student("Sidorov Oleg", "500000002", Some(campus.teacher.id))
            .await;
        let reports = campus.db.reports();

        // Left: every student, Anna without a curator
        let left = reports.students_with_curators().await.unwrap();
        assert_eq!(left.len(), 2);
        assert!(left.iter().any(|row| {
            row.student_name.as_deref() == Some("Petrova Anna") && row.curator_name.is_none()
        }));

        // Right: every employee, the assistant curating no one
        let right = reports.curators_with_students().await.unwrap();
        assert_eq!(right.len(), 2);
        assert!(right.iter().any(|row| {
            row.curator_name.as_deref() == Some("Orlova Maria") && row.student_name.is_none()
        }));

        // Full: matched pair + unmatched student + unmatched employee
        let full = reports.all_student_curators().await.unwrap();
        assert_eq!(full.len(), 3);
        assert!(full.iter().any(|row| {
            row.student_name.as_deref() == Some("Sidorov Oleg")
                && row.curator_name.as_deref() == Some("Smirnov Pavel")
        }));
        assert!(full.iter().any(|row| row.curator_name.is_none()));
        assert!(full.iter().any(|row| row.student_name.is_none()));
    }

    #[tokio::test]
    async fn test_name_stats_are_computed_by_store() {
        let campus = campus().await;
        let latin = campus.student("Petrova Anna", "500000001", None).await;
        let cyrillic = campus.student("Анна Петровна", "500000002", None).await;

        let mut rows = campus.db.reports().student_name_stats().await.unwrap();
        rows.sort_by_key(|row| row.id);
        assert_eq!(
            rows,
            vec![
                StudentNameStat {
                    id: latin.id,
                    uppercase_name: "PETROVA ANNA".to_string(),
                    name_length: 12,
                },
                StudentNameStat {
                    id: cyrillic.id,
                    uppercase_name: "АННА ПЕТРОВНА".to_string(),
                    name_length: 13,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_reports_on_empty_tables_are_empty() {
        let campus = campus().await;
        let reports = campus.db.reports();

        assert!(reports.marks_by_date().await.unwrap().is_empty());
        assert!(reports.students_with_groups().await.unwrap().is_empty());
        assert!(reports.schedule().await.unwrap().is_empty());
        assert!(reports.students_with_curators().await.unwrap().is_empty());
    }
}
