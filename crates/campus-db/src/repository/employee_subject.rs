//! # Employee ↔ Subject Repository
//!
//! Which teacher teaches which subject. Rows have no surrogate id; the
//! `(employee_id, subject_id)` pair is the primary key, so `find_one`,
//! `update` and `delete` take the pair.
//!
//! Only teachers can be linked. The check runs on create and on update,
//! before anything is written.

use campus_core::EmployeeSubject;
use sqlx::SqlitePool;
use tracing::debug;

use super::{ensure_affected, ensure_teacher, fetch_by, sql_id, Param};
use crate::error::{DbError, DbResult, ResultExt};

const ENTITY: &str = "EmployeeSubject";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkColumn {
    Employee,
    Subject,
}

impl LinkColumn {
    fn sql(self) -> &'static str {
        match self {
            LinkColumn::Employee => "employee_id",
            LinkColumn::Subject => "subject_id",
        }
    }
}

fn pair_key(employee_id: u64, subject_id: u64) -> String {
    format!("({employee_id}, {subject_id})")
}

/// Converts a composite key for binding.
fn pair(employee_id: u64, subject_id: u64) -> DbResult<(i64, i64)> {
    match (i64::try_from(employee_id), i64::try_from(subject_id)) {
        (Ok(e), Ok(s)) => Ok((e, s)),
        _ => Err(DbError::not_found(ENTITY, pair_key(employee_id, subject_id))),
    }
}

#[derive(Debug, Clone)]
pub struct EmployeeSubjectRepository {
    pool: SqlitePool,
}

impl EmployeeSubjectRepository {
    pub fn new(pool: SqlitePool) -> Self {
        EmployeeSubjectRepository { pool }
    }

    /// Links a teacher to a subject.
    ///
    /// ## Errors
    /// - `NotTeacher` - the employee does not hold the teacher position
    /// - `Constraint` - the link already exists, or the subject is unknown
    pub async fn create(&self, link: &EmployeeSubject) -> DbResult<EmployeeSubject> {
        link.validate()?;
        ensure_teacher(&self.pool, link.employee_id).await?;

        let created = sqlx::query_as::<_, EmployeeSubject>(
            r#"
            INSERT INTO employees_subjects (employee_id, subject_id)
            VALUES (?1, ?2)
            RETURNING employee_id, subject_id
            "#,
        )
        .bind(sql_id(link.employee_id))
        .bind(sql_id(link.subject_id))
        .fetch_one(&self.pool)
        .await
        .at("employees_subjects.create")?;

        debug!(
            employee_id = created.employee_id,
            subject_id = created.subject_id,
            "Subject link created"
        );
        Ok(created)
    }

    pub async fn find_one(&self, employee_id: u64, subject_id: u64) -> DbResult<EmployeeSubject> {
        let (e, s) = pair(employee_id, subject_id)?;

        sqlx::query_as::<_, EmployeeSubject>(
            r#"
            SELECT employee_id, subject_id
            FROM employees_subjects
            WHERE employee_id = ?1 AND subject_id = ?2
            "#,
        )
        .bind(e)
        .bind(s)
        .fetch_optional(&self.pool)
        .await
        .at("employees_subjects.find_one")?
        .ok_or_else(|| DbError::not_found(ENTITY, pair_key(employee_id, subject_id)))
    }

    pub async fn find_all(&self) -> DbResult<Vec<EmployeeSubject>> {
        let links = sqlx::query_as::<_, EmployeeSubject>(
            "SELECT employee_id, subject_id FROM employees_subjects ORDER BY employee_id, subject_id",
        )
        .fetch_all(&self.pool)
        .await
        .at("employees_subjects.find_all")?;

        debug!(count = links.len(), "Loaded subject links");
        Ok(links)
    }

    /// Subjects taught by `employee_id`.
    pub async fn find_by_employee(&self, employee_id: u64) -> DbResult<Vec<EmployeeSubject>> {
        self.lookup(LinkColumn::Employee, employee_id).await
    }

    /// Teachers of `subject_id`.
    pub async fn find_by_subject(&self, subject_id: u64) -> DbResult<Vec<EmployeeSubject>> {
        self.lookup(LinkColumn::Subject, subject_id).await
    }

    /// Replaces the link keyed by `(employee_id, subject_id)` with `link`.
    pub async fn update(
        &self,
        (employee_id, subject_id): (u64, u64),
        link: &EmployeeSubject,
    ) -> DbResult<EmployeeSubject> {
        link.validate()?;
        let (e, s) = pair(employee_id, subject_id)?;
        self.find_one(employee_id, subject_id).await?;
        ensure_teacher(&self.pool, link.employee_id).await?;

        let updated = sqlx::query_as::<_, EmployeeSubject>(
            r#"
            UPDATE employees_subjects
            SET employee_id = ?1, subject_id = ?2
            WHERE employee_id = ?3 AND subject_id = ?4
            RETURNING employee_id, subject_id
            "#,
        )
        .bind(sql_id(link.employee_id))
        .bind(sql_id(link.subject_id))
        .bind(e)
        .bind(s)
        .fetch_optional(&self.pool)
        .await
        .at("employees_subjects.update")?
        .ok_or_else(|| DbError::not_found(ENTITY, pair_key(employee_id, subject_id)))?;

        debug!(employee_id, subject_id, "Subject link updated");
        Ok(updated)
    }

    pub async fn delete(&self, employee_id: u64, subject_id: u64) -> DbResult<()> {
        let (e, s) = pair(employee_id, subject_id)?;

        let result = sqlx::query(
            "DELETE FROM employees_subjects WHERE employee_id = ?1 AND subject_id = ?2",
        )
        .bind(e)
        .bind(s)
        .execute(&self.pool)
        .await
        .at("employees_subjects.delete")?;

        ensure_affected(
            result.rows_affected(),
            ENTITY,
            pair_key(employee_id, subject_id),
        )
    }

    async fn lookup(&self, column: LinkColumn, id: u64) -> DbResult<Vec<EmployeeSubject>> {
        let Some(value) = Param::id(id) else {
            return Ok(Vec::new());
        };
        let sql = format!(
            "SELECT employee_id, subject_id FROM employees_subjects WHERE {} = ?1 \
             ORDER BY employee_id, subject_id",
            column.sql()
        );
        fetch_by(&self.pool, &sql, value, "employees_subjects.find_by").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::campus;
    use campus_core::Subject;

    #[tokio::test]
    async fn test_teacher_link_round_trip() {
        let campus = campus().await;
        let repo = campus.db.employee_subjects();

        let link = EmployeeSubject::new(campus.teacher.id, campus.subject.id);
        assert_eq!(repo.create(&link).await.unwrap(), link);

        assert_eq!(repo.find_one(campus.teacher.id, campus.subject.id).await.unwrap(), link);
        assert_eq!(repo.find_by_employee(campus.teacher.id).await.unwrap(), vec![link]);
        assert_eq!(repo.find_by_subject(campus.subject.id).await.unwrap(), vec![link]);
        assert_eq!(repo.find_all().await.unwrap(), vec![link]);
    }

    #[tokio::test]
    async fn test_non_teacher_link_is_rejected() {
        let campus = campus().await;
        let repo = campus.db.employee_subjects();

        let err = repo
            .create(&EmployeeSubject::new(campus.assistant.id, campus.subject.id))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::NotTeacher { .. }));
        assert!(repo.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_link_is_constraint() {
        let campus = campus().await;
        let repo = campus.db.employee_subjects();
        let link = EmployeeSubject::new(campus.teacher.id, campus.subject.id);

        repo.create(&link).await.unwrap();
        let err = repo.create(&link).await.unwrap_err();

        assert!(matches!(err, DbError::Constraint(_)));
    }

    #[tokio::test]
    async fn test_update_rekeys_link() {
        let campus = campus().await;
        let repo = campus.db.employee_subjects();
        let maths = campus
            .db
            .subjects()
            .create(&Subject::new("Mathematics", "Calculus"))
            .await
            .unwrap();

        let link = repo
            .create(&EmployeeSubject::new(campus.teacher.id, campus.subject.id))
            .await
            .unwrap();
        let moved = repo
            .update(
                (link.employee_id, link.subject_id),
                &EmployeeSubject::new(campus.teacher.id, maths.id),
            )
            .await
            .unwrap();

        assert_eq!(moved.subject_id, maths.id);
        assert!(repo
            .find_one(campus.teacher.id, campus.subject.id)
            .await
            .unwrap_err()
            .is_not_found());

        let err = repo
            .update(
                (moved.employee_id, moved.subject_id),
                &EmployeeSubject::new(campus.assistant.id, maths.id),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotTeacher { .. }));
    }

    #[tokio::test]
    async fn test_delete_missing_link_is_not_found() {
        let campus = campus().await;
        let repo = campus.db.employee_subjects();

        repo.create(&EmployeeSubject::new(campus.teacher.id, campus.subject.id))
            .await
            .unwrap();
        repo.delete(campus.teacher.id, campus.subject.id).await.unwrap();

        let err = repo
            .delete(campus.teacher.id, campus.subject.id)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_of_missing_link_is_not_found_for_any_employee() {
        let campus = campus().await;
        let link = EmployeeSubject::new(campus.assistant.id, campus.subject.id);

        let err = campus
            .db
            .employee_subjects()
            .update((campus.teacher.id, campus.subject.id), &link)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
