//! # Lesson Type Repository
//!
//! Two-letter lesson kinds ("ЛК", "ПЗ", "ЛР"). Names are unique.

use campus_core::LessonType;
use sqlx::SqlitePool;
use tracing::debug;

use super::{ensure_affected, fetch_by, first_or_not_found, key, Param};
use crate::error::{DbError, DbResult, ResultExt};

const ENTITY: &str = "LessonType";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LessonTypeColumn {
    Id,
    Name,
}

impl LessonTypeColumn {
    fn sql(self) -> &'static str {
        match self {
            LessonTypeColumn::Id => "id",
            LessonTypeColumn::Name => "name",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LessonTypeRepository {
    pool: SqlitePool,
}

impl LessonTypeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        LessonTypeRepository { pool }
    }

    pub async fn create(&self, lesson_type: &LessonType) -> DbResult<LessonType> {
        lesson_type.validate()?;

        let created = sqlx::query_as::<_, LessonType>(
            "INSERT INTO lesson_types (name) VALUES (?1) RETURNING id, name",
        )
        .bind(&lesson_type.name)
        .fetch_one(&self.pool)
        .await
        .at("lesson_types.create")?;

        debug!(id = created.id, "Lesson type created");
        Ok(created)
    }

    pub async fn find_one(&self, id: u64) -> DbResult<LessonType> {
        let rows = self
            .lookup(LessonTypeColumn::Id, Param::Int(key(ENTITY, id)?))
            .await?;
        first_or_not_found(rows, ENTITY, id)
    }

    pub async fn find_all(&self) -> DbResult<Vec<LessonType>> {
        sqlx::query_as::<_, LessonType>("SELECT id, name FROM lesson_types ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .at("lesson_types.find_all")
    }

    pub async fn find_by_name(&self, name: &str) -> DbResult<LessonType> {
        let rows = self.lookup(LessonTypeColumn::Name, Param::text(name)).await?;
        first_or_not_found(rows, ENTITY, name)
    }

    pub async fn update(&self, id: u64, lesson_type: &LessonType) -> DbResult<LessonType> {
        lesson_type.validate()?;
        let key = key(ENTITY, id)?;

        sqlx::query_as::<_, LessonType>(
            "UPDATE lesson_types SET name = ?1 WHERE id = ?2 RETURNING id, name",
        )
        .bind(&lesson_type.name)
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .at("lesson_types.update")?
        .ok_or_else(|| DbError::not_found(ENTITY, id))
    }

    pub async fn delete(&self, id: u64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM lesson_types WHERE id = ?1")
            .bind(key(ENTITY, id)?)
            .execute(&self.pool)
            .await
            .at("lesson_types.delete")?;

        ensure_affected(result.rows_affected(), ENTITY, id)
    }

    async fn lookup(&self, column: LessonTypeColumn, value: Param) -> DbResult<Vec<LessonType>> {
        let sql = format!(
            "SELECT id, name FROM lesson_types WHERE {} = ?1 ORDER BY id",
            column.sql()
        );
        fetch_by(&self.pool, &sql, value, "lesson_types.find_by").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::memory_db;

    #[tokio::test]
    async fn test_two_letter_codes() {
        let db = memory_db().await;
        let repo = db.lesson_types();

        let lecture = repo.create(&LessonType::new("ЛК")).await.unwrap();
        assert_eq!(repo.find_by_name("ЛК").await.unwrap(), lecture);

        let err = repo.create(&LessonType::new("ЛКЦ")).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));

        let err = repo.create(&LessonType::new("ЛК")).await.unwrap_err();
        assert!(matches!(err, DbError::Constraint(_)));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = memory_db().await;
        let repo = db.lesson_types();

        let created = repo.create(&LessonType::new("ПЗ")).await.unwrap();
        let updated = repo.update(created.id, &LessonType::new("ЛР")).await.unwrap();
        assert_eq!(repo.find_one(created.id).await.unwrap(), updated);

        repo.delete(created.id).await.unwrap();
        assert!(repo.delete(created.id).await.unwrap_err().is_not_found());
    }
}
