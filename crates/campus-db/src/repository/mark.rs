//! # Mark Repository
//!
//! Grades given by teachers.
//!
//! ## Teacher Gate
//! ```text
//! create(&mark) / update(id, &mark)
//!     │
//!     ├── mark.validate()                 ─── Validation ──► rejected
//!     ├── is employee a teacher?  (no)    ─── NotTeacher ──► rejected
//!     ▼
//! INSERT / UPDATE marks
//! ```
//! Nothing is written for a rejected mark.

use campus_core::Mark;
use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::debug;

use super::{ensure_affected, ensure_teacher, fetch_by, first_or_not_found, key, sql_id, Param};
use crate::error::{DbError, DbResult, ResultExt};

const ENTITY: &str = "Mark";
const COLUMNS: &str = "id, employee_id, student_id, subject_id, mark, date";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MarkColumn {
    Id,
    Employee,
    Student,
    Subject,
    Mark,
    Date,
}

impl MarkColumn {
    fn sql(self) -> &'static str {
        match self {
            MarkColumn::Id => "id",
            MarkColumn::Employee => "employee_id",
            MarkColumn::Student => "student_id",
            MarkColumn::Subject => "subject_id",
            MarkColumn::Mark => "mark",
            MarkColumn::Date => "date",
        }
    }
}

/// Repository for mark database operations.
#[derive(Debug, Clone)]
pub struct MarkRepository {
    pool: SqlitePool,
}

impl MarkRepository {
    pub fn new(pool: SqlitePool) -> Self {
        MarkRepository { pool }
    }

    /// Records a mark.
    ///
    /// ## Errors
    /// - `Validation` - zero ids or zero mark
    /// - `NotTeacher` - the grader does not hold the teacher position
    /// - `Constraint` - unknown student or subject
    pub async fn create(&self, mark: &Mark) -> DbResult<Mark> {
        mark.validate()?;
        ensure_teacher(&self.pool, mark.employee_id).await?;

        let sql = format!(
            "INSERT INTO marks (employee_id, student_id, subject_id, mark, date) \
             VALUES (?1, ?2, ?3, ?4, ?5) RETURNING {COLUMNS}"
        );
        let created = sqlx::query_as::<_, Mark>(&sql)
            .bind(sql_id(mark.employee_id))
            .bind(sql_id(mark.student_id))
            .bind(sql_id(mark.subject_id))
            .bind(mark.mark)
            .bind(mark.date)
            .fetch_one(&self.pool)
            .await
            .at("marks.create")?;

        debug!(
            id = created.id,
            student_id = created.student_id,
            mark = created.mark,
            "Mark recorded"
        );
        Ok(created)
    }

    pub async fn find_one(&self, id: u64) -> DbResult<Mark> {
        let rows = self.lookup(MarkColumn::Id, Param::Int(key(ENTITY, id)?)).await?;
        first_or_not_found(rows, ENTITY, id)
    }

    pub async fn find_all(&self) -> DbResult<Vec<Mark>> {
        let marks = sqlx::query_as::<_, Mark>(&format!("SELECT {COLUMNS} FROM marks ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .at("marks.find_all")?;

        debug!(count = marks.len(), "Loaded marks");
        Ok(marks)
    }

    /// Marks given by `employee_id`.
    pub async fn find_by_employee(&self, employee_id: u64) -> DbResult<Vec<Mark>> {
        self.lookup_id(MarkColumn::Employee, employee_id).await
    }

    pub async fn find_by_student(&self, student_id: u64) -> DbResult<Vec<Mark>> {
        self.lookup_id(MarkColumn::Student, student_id).await
    }

    pub async fn find_by_subject(&self, subject_id: u64) -> DbResult<Vec<Mark>> {
        self.lookup_id(MarkColumn::Subject, subject_id).await
    }

    pub async fn find_by_mark(&self, mark: u16) -> DbResult<Vec<Mark>> {
        self.lookup(MarkColumn::Mark, Param::from(mark)).await
    }

    pub async fn find_by_date(&self, date: NaiveDate) -> DbResult<Vec<Mark>> {
        self.lookup(MarkColumn::Date, Param::Date(date)).await
    }

    /// Replaces mark `id`. The grader is checked again.
    pub async fn update(&self, id: u64, mark: &Mark) -> DbResult<Mark> {
        mark.validate()?;
        let key = key(ENTITY, id)?;
        // A missing mark reports NotFound before the grader is checked
        self.find_one(id).await?;
        ensure_teacher(&self.pool, mark.employee_id).await?;

        let sql = format!(
            "UPDATE marks \
             SET employee_id = ?1, student_id = ?2, subject_id = ?3, mark = ?4, date = ?5 \
             WHERE id = ?6 RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Mark>(&sql)
            .bind(sql_id(mark.employee_id))
            .bind(sql_id(mark.student_id))
            .bind(sql_id(mark.subject_id))
            .bind(mark.mark)
            .bind(mark.date)
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .at("marks.update")?
            .ok_or_else(|| DbError::not_found(ENTITY, id))?;

        debug!(id, "Mark updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: u64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM marks WHERE id = ?1")
            .bind(key(ENTITY, id)?)
            .execute(&self.pool)
            .await
            .at("marks.delete")?;

        ensure_affected(result.rows_affected(), ENTITY, id)
    }

    async fn lookup_id(&self, column: MarkColumn, id: u64) -> DbResult<Vec<Mark>> {
        match Param::id(id) {
            Some(value) => self.lookup(column, value).await,
            None => Ok(Vec::new()),
        }
    }

    async fn lookup(&self, column: MarkColumn, value: Param) -> DbResult<Vec<Mark>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM marks WHERE {} = ?1 ORDER BY id",
            column.sql()
        );
        let marks: Vec<Mark> = fetch_by(&self.pool, &sql, value, "marks.find_by").await?;

        debug!(column = column.sql(), count = marks.len(), "Mark lookup");
        Ok(marks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::campus;
    use campus_core::validation::parse_date;

    fn day(raw: &str) -> NaiveDate {
        parse_date(raw).unwrap()
    }

    #[tokio::test]
    async fn test_teacher_can_grade() {
        let campus = campus().await;
        let student = campus.student("Petrova Anna", "500000001", None).await;

        let mark = Mark::new(campus.teacher.id, student.id, campus.subject.id, 5, day("2024-01-15"));
        let created = campus.db.marks().create(&mark).await.unwrap();

        assert!(created.id > 0);
        assert_eq!(created.date, day("2024-01-15"));
        assert_eq!(campus.db.marks().find_one(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_non_teacher_is_rejected_before_persistence() {
        let campus = campus().await;
        let student = campus.student("Petrova Anna", "500000001", None).await;
        let repo = campus.db.marks();

        let mark = Mark::new(campus.assistant.id, student.id, campus.subject.id, 4, day("2024-01-15"));
        let err = repo.create(&mark).await.unwrap_err();

        assert!(matches!(
            err,
            DbError::NotTeacher { employee_id } if employee_id == campus.assistant.id
        ));
        assert!(repo.find_all().await.unwrap().is_empty());

        // Unknown employees are not teachers either
        let mark = Mark::new(9_999, student.id, campus.subject.id, 4, day("2024-01-15"));
        assert!(matches!(
            repo.create(&mark).await.unwrap_err(),
            DbError::NotTeacher { .. }
        ));
    }

    #[tokio::test]
    async fn test_update_rechecks_grader() {
        let campus = campus().await;
        let student = campus.student("Petrova Anna", "500000001", None).await;
        let repo = campus.db.marks();

        let created = repo
            .create(&Mark::new(campus.teacher.id, student.id, campus.subject.id, 3, day("2024-02-01")))
            .await
            .unwrap();

        let mut regraded = created.clone();
        regraded.employee_id = campus.assistant.id;
        regraded.mark = 5;
        let err = repo.update(created.id, &regraded).await.unwrap_err();
        assert!(matches!(err, DbError::NotTeacher { .. }));
        assert_eq!(repo.find_one(created.id).await.unwrap().mark, 3);

        regraded.employee_id = campus.teacher.id;
        assert_eq!(repo.update(created.id, &regraded).await.unwrap().mark, 5);
    }

    #[tokio::test]
    async fn test_lookups() {
        let campus = campus().await;
        let anna = campus.student("Petrova Anna", "500000001", None).await;
        let oleg = campus.student("Sidorov Oleg", "500000002", None).await;
        let repo = campus.db.marks();
        let (t, s) = (campus.teacher.id, campus.subject.id);

        let first = repo.create(&Mark::new(t, anna.id, s, 5, day("2024-01-10"))).await.unwrap();
        let second = repo.create(&Mark::new(t, oleg.id, s, 4, day("2024-01-11"))).await.unwrap();

        assert_eq!(repo.find_by_employee(t).await.unwrap().len(), 2);
        assert_eq!(repo.find_by_student(oleg.id).await.unwrap(), vec![second.clone()]);
        assert_eq!(repo.find_by_subject(s).await.unwrap().len(), 2);
        assert_eq!(repo.find_by_mark(5).await.unwrap(), vec![first.clone()]);
        assert_eq!(repo.find_by_date(day("2024-01-10")).await.unwrap(), vec![first]);
        assert!(repo.find_by_date(day("2023-12-31")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_not_found_boundary() {
        let campus = campus().await;
        let student = campus.student("Petrova Anna", "500000001", None).await;
        let repo = campus.db.marks();
        let mark = Mark::new(campus.teacher.id, student.id, campus.subject.id, 5, day("2024-01-10"));

        assert!(repo.find_one(1).await.unwrap_err().is_not_found());
        assert!(repo.update(1, &mark).await.unwrap_err().is_not_found());
        assert!(repo.delete(1).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_update_of_missing_mark_is_not_found_for_any_grader() {
        let campus = campus().await;
        let student = campus.student("Petrova Anna", "500000001", None).await;
        let mark = Mark::new(campus.assistant.id, student.id, campus.subject.id, 4, day("2024-01-10"));

        let err = campus.db.marks().update(42, &mark).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
