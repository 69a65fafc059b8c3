//! # Subject Repository
//!
//! Taught subjects. Names are unique in the store.

use campus_core::Subject;
use sqlx::SqlitePool;
use tracing::debug;

use super::{ensure_affected, fetch_by, first_or_not_found, key, Param};
use crate::error::{DbError, DbResult, ResultExt};

const ENTITY: &str = "Subject";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubjectColumn {
    Id,
    Name,
}

impl SubjectColumn {
    fn sql(self) -> &'static str {
        match self {
            SubjectColumn::Id => "id",
            SubjectColumn::Name => "name",
        }
    }
}

/// Repository for subject database operations.
#[derive(Debug, Clone)]
pub struct SubjectRepository {
    pool: SqlitePool,
}

impl SubjectRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SubjectRepository { pool }
    }

    pub async fn create(&self, subject: &Subject) -> DbResult<Subject> {
        subject.validate()?;

        let created = sqlx::query_as::<_, Subject>(
            r#"
            INSERT INTO subjects (name, description)
            VALUES (?1, ?2)
            RETURNING id, name, description
            "#,
        )
        .bind(&subject.name)
        .bind(&subject.description)
        .fetch_one(&self.pool)
        .await
        .at("subjects.create")?;

        debug!(id = created.id, "Subject created");
        Ok(created)
    }

    pub async fn find_one(&self, id: u64) -> DbResult<Subject> {
        let rows = self.lookup(SubjectColumn::Id, Param::Int(key(ENTITY, id)?)).await?;
        first_or_not_found(rows, ENTITY, id)
    }

    pub async fn find_all(&self) -> DbResult<Vec<Subject>> {
        let subjects = sqlx::query_as::<_, Subject>(
            "SELECT id, name, description FROM subjects ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .at("subjects.find_all")?;

        debug!(count = subjects.len(), "Loaded subjects");
        Ok(subjects)
    }

    pub async fn find_by_name(&self, name: &str) -> DbResult<Subject> {
        let rows = self.lookup(SubjectColumn::Name, Param::text(name)).await?;
        first_or_not_found(rows, ENTITY, name)
    }

    pub async fn update(&self, id: u64, subject: &Subject) -> DbResult<Subject> {
        subject.validate()?;
        let key = key(ENTITY, id)?;

        let updated = sqlx::query_as::<_, Subject>(
            r#"
            UPDATE subjects
            SET name = ?1, description = ?2
            WHERE id = ?3
            RETURNING id, name, description
            "#,
        )
        .bind(&subject.name)
        .bind(&subject.description)
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .at("subjects.update")?
        .ok_or_else(|| DbError::not_found(ENTITY, id))?;

        debug!(id, "Subject updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: u64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM subjects WHERE id = ?1")
            .bind(key(ENTITY, id)?)
            .execute(&self.pool)
            .await
            .at("subjects.delete")?;

        ensure_affected(result.rows_affected(), ENTITY, id)
    }

    async fn lookup(&self, column: SubjectColumn, value: Param) -> DbResult<Vec<Subject>> {
        let sql = format!(
            "SELECT id, name, description FROM subjects WHERE {} = ?1 ORDER BY id",
            column.sql()
        );
        fetch_by(&self.pool, &sql, value, "subjects.find_by").await
    }
}
