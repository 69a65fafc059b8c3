//! # Student Repository
//!
//! Students belong to a group and may have a curator (an employee).
//! A `None` curator is stored as NULL.

use campus_core::Student;
use sqlx::SqlitePool;
use tracing::debug;

use super::{ensure_affected, fetch_by, first_or_not_found, key, sql_id, Param};
use crate::error::{DbError, DbResult, ResultExt};

const ENTITY: &str = "Student";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StudentColumn {
    Id,
    Name,
    Passport,
    Curator,
    Group,
}

impl StudentColumn {
    fn sql(self) -> &'static str {
        match self {
            StudentColumn::Id => "id",
            StudentColumn::Name => "name",
            StudentColumn::Passport => "passport",
            StudentColumn::Curator => "employee_id",
            StudentColumn::Group => "group_id",
        }
    }
}

/// Repository for student database operations.
///
/// ## Usage
/// ```rust,ignore
/// let student = db
///     .students()
///     .create(&Student::new("Петрова Анна Сергеевна", "123456789", None, group.id))
///     .await?;
/// let in_group = db.students().find_by_group(group.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct StudentRepository {
    pool: SqlitePool,
}

impl StudentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        StudentRepository { pool }
    }

    /// Inserts a student.
    ///
    /// ## Errors
    /// - `Validation` - name/passport/id rules
    /// - `Constraint` - duplicate passport, unknown curator or group
    pub async fn create(&self, student: &Student) -> DbResult<Student> {
        student.validate()?;

        let created = sqlx::query_as::<_, Student>(
            r#"
            INSERT INTO students (name, passport, employee_id, group_id)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id, name, passport, employee_id, group_id
            "#,
        )
        .bind(&student.name)
        .bind(&student.passport)
        .bind(student.employee_id.map(sql_id))
        .bind(sql_id(student.group_id))
        .fetch_one(&self.pool)
        .await
        .at("students.create")?;

        debug!(id = created.id, group_id = created.group_id, "Student created");
        Ok(created)
    }

    pub async fn find_one(&self, id: u64) -> DbResult<Student> {
        let rows = self.lookup(StudentColumn::Id, Param::Int(key(ENTITY, id)?)).await?;
        first_or_not_found(rows, ENTITY, id)
    }

    pub async fn find_all(&self) -> DbResult<Vec<Student>> {
        let students = sqlx::query_as::<_, Student>(
            "SELECT id, name, passport, employee_id, group_id FROM students ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .at("students.find_all")?;

        debug!(count = students.len(), "Loaded students");
        Ok(students)
    }

    pub async fn find_by_name(&self, name: &str) -> DbResult<Vec<Student>> {
        self.lookup(StudentColumn::Name, Param::text(name)).await
    }

    pub async fn find_by_passport(&self, passport: &str) -> DbResult<Student> {
        let rows = self
            .lookup(StudentColumn::Passport, Param::text(passport))
            .await?;
        first_or_not_found(rows, ENTITY, passport)
    }

    /// Students curated by `employee_id`. Students without a curator are
    /// never returned here; see the reports for those.
    pub async fn find_by_curator(&self, employee_id: u64) -> DbResult<Vec<Student>> {
        match Param::id(employee_id) {
            Some(value) => self.lookup(StudentColumn::Curator, value).await,
            None => Ok(Vec::new()),
        }
    }

    pub async fn find_by_group(&self, group_id: u64) -> DbResult<Vec<Student>> {
        match Param::id(group_id) {
            Some(value) => self.lookup(StudentColumn::Group, value).await,
            None => Ok(Vec::new()),
        }
    }

    pub async fn update(&self, id: u64, student: &Student) -> DbResult<Student> {
        student.validate()?;
        let key = key(ENTITY, id)?;

        let updated = sqlx::query_as::<_, Student>(
            r#"
            UPDATE students
            SET name = ?1, passport = ?2, employee_id = ?3, group_id = ?4
            WHERE id = ?5
            RETURNING id, name, passport, employee_id, group_id
            "#,
        )
        .bind(&student.name)
        .bind(&student.passport)
        .bind(student.employee_id.map(sql_id))
        .bind(sql_id(student.group_id))
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .at("students.update")?
        .ok_or_else(|| DbError::not_found(ENTITY, id))?;

        debug!(id, "Student updated");
        Ok(updated)
    }

    /// Deletes student `id`. Fails with `Constraint` while marks reference it.
    pub async fn delete(&self, id: u64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM students WHERE id = ?1")
            .bind(key(ENTITY, id)?)
            .execute(&self.pool)
            .await
            .at("students.delete")?;

        ensure_affected(result.rows_affected(), ENTITY, id)?;
        debug!(id, "Student deleted");
        Ok(())
    }

    async fn lookup(&self, column: StudentColumn, value: Param) -> DbResult<Vec<Student>> {
        let sql = format!(
            "SELECT id, name, passport, employee_id, group_id FROM students WHERE {} = ?1 ORDER BY id",
            column.sql()
        );
        let students: Vec<Student> =
            fetch_by(&self.pool, &sql, value, "students.find_by").await?;

        debug!(column = column.sql(), count = students.len(), "Student lookup");
        Ok(students)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::campus;

    #[tokio::test]
    async fn test_curator_is_optional() {
        let campus = campus().await;

        let without = campus.student("Petrova Anna", "500000001", None).await;
        let with = campus
            .student("Sidorov Oleg", "500000002", Some(campus.teacher.id))
            .await;

        let repo = campus.db.students();
        assert_eq!(repo.find_one(without.id).await.unwrap().employee_id, None);
        assert_eq!(
            repo.find_one(with.id).await.unwrap().employee_id,
            Some(campus.teacher.id)
        );
        assert_eq!(
            repo.find_by_curator(campus.teacher.id).await.unwrap(),
            vec![with]
        );
    }

    #[tokio::test]
    async fn test_lookups() {
        let campus = campus().await;
        let anna = campus.student("Petrova Anna", "500000001", None).await;
        let oleg = campus.student("Sidorov Oleg", "500000002", None).await;
        let repo = campus.db.students();

        assert_eq!(repo.find_by_passport("500000002").await.unwrap(), oleg);
        assert_eq!(repo.find_by_name("Petrova Anna").await.unwrap(), vec![anna.clone()]);
        assert_eq!(
            repo.find_by_group(campus.group.id).await.unwrap(),
            vec![anna, oleg]
        );
        assert!(repo
            .find_by_passport("000000000")
            .await
            .unwrap_err()
            .is_not_found());
    }

    #[tokio::test]
    async fn test_duplicate_passport_reports_target() {
        let campus = campus().await;
        campus.student("Petrova Anna", "500000001", None).await;

        let err = campus
            .db
            .students()
            .create(&Student::new("Petrova Anna II", "500000001", None, campus.group.id))
            .await
            .unwrap_err();

        let query = err.query_error().unwrap();
        assert_eq!(query.detail, "students.passport");
        assert_eq!(query.location, "students.create");
        assert_eq!(query.state, "23505");
    }

    #[tokio::test]
    async fn test_update_can_clear_curator() {
        let campus = campus().await;
        let student = campus
            .student("Sidorov Oleg", "500000002", Some(campus.teacher.id))
            .await;

        let mut changed = student.clone();
        changed.employee_id = None;
        let updated = campus.db.students().update(student.id, &changed).await.unwrap();

        assert_eq!(updated, changed);
        assert!(campus
            .db
            .students()
            .find_by_curator(campus.teacher.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_not_found_boundary() {
        let campus = campus().await;
        let repo = campus.db.students();
        let draft = Student::new("Ghost Student", "500000009", None, campus.group.id);

        assert!(repo.find_one(42).await.unwrap_err().is_not_found());
        assert!(repo.update(42, &draft).await.unwrap_err().is_not_found());
        assert!(repo.delete(42).await.unwrap_err().is_not_found());
        assert!(repo.find_all().await.unwrap().is_empty());
    }
}
