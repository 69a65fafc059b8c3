//! # Lesson Repository
//!
//! The timetable: which group has which subject, of which kind, when and
//! where. Every lookup except `find_one` returns a list.

use campus_core::Lesson;
use sqlx::SqlitePool;
use tracing::debug;

use super::{ensure_affected, fetch_by, first_or_not_found, key, sql_id, Param};
use crate::error::{DbError, DbResult, ResultExt};

const ENTITY: &str = "Lesson";
const COLUMNS: &str = "id, group_id, subject_id, lesson_type_id, week, weekday, room";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LessonColumn {
    Id,
    Group,
    Subject,
    LessonType,
    Week,
    Weekday,
    Room,
}

impl LessonColumn {
    fn sql(self) -> &'static str {
        match self {
            LessonColumn::Id => "id",
            LessonColumn::Group => "group_id",
            LessonColumn::Subject => "subject_id",
            LessonColumn::LessonType => "lesson_type_id",
            LessonColumn::Week => "week",
            LessonColumn::Weekday => "weekday",
            LessonColumn::Room => "room",
        }
    }
}

/// Repository for timetable entries.
#[derive(Debug, Clone)]
pub struct LessonRepository {
    pool: SqlitePool,
}

impl LessonRepository {
    pub fn new(pool: SqlitePool) -> Self {
        LessonRepository { pool }
    }

    /// Inserts a lesson. Unknown group, subject or lesson type ids fail with
    /// `Constraint`.
    pub async fn create(&self, lesson: &Lesson) -> DbResult<Lesson> {
        lesson.validate()?;

        let sql = format!(
            "INSERT INTO lessons (group_id, subject_id, lesson_type_id, week, weekday, room) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6) RETURNING {COLUMNS}"
        );
        let created = sqlx::query_as::<_, Lesson>(&sql)
            .bind(sql_id(lesson.group_id))
            .bind(sql_id(lesson.subject_id))
            .bind(sql_id(lesson.lesson_type_id))
            .bind(lesson.week)
            .bind(lesson.weekday)
            .bind(sql_id(lesson.room))
            .fetch_one(&self.pool)
            .await
            .at("lessons.create")?;

        debug!(id = created.id, group_id = created.group_id, "Lesson created");
        Ok(created)
    }

    pub async fn find_one(&self, id: u64) -> DbResult<Lesson> {
        let rows = self.lookup(LessonColumn::Id, Param::Int(key(ENTITY, id)?)).await?;
        first_or_not_found(rows, ENTITY, id)
    }

    pub async fn find_all(&self) -> DbResult<Vec<Lesson>> {
        let lessons = sqlx::query_as::<_, Lesson>(&format!(
            "SELECT {COLUMNS} FROM lessons ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .at("lessons.find_all")?;

        debug!(count = lessons.len(), "Loaded lessons");
        Ok(lessons)
    }

    pub async fn find_by_group(&self, group_id: u64) -> DbResult<Vec<Lesson>> {
        self.lookup_id(LessonColumn::Group, group_id).await
    }

    pub async fn find_by_subject(&self, subject_id: u64) -> DbResult<Vec<Lesson>> {
        self.lookup_id(LessonColumn::Subject, subject_id).await
    }

    pub async fn find_by_lesson_type(&self, lesson_type_id: u64) -> DbResult<Vec<Lesson>> {
        self.lookup_id(LessonColumn::LessonType, lesson_type_id).await
    }

    pub async fn find_by_week(&self, week: u16) -> DbResult<Vec<Lesson>> {
        self.lookup(LessonColumn::Week, Param::from(week)).await
    }

    pub async fn find_by_weekday(&self, weekday: u16) -> DbResult<Vec<Lesson>> {
        self.lookup(LessonColumn::Weekday, Param::from(weekday)).await
    }

    pub async fn find_by_room(&self, room: u64) -> DbResult<Vec<Lesson>> {
        self.lookup_id(LessonColumn::Room, room).await
    }

    pub async fn update(&self, id: u64, lesson: &Lesson) -> DbResult<Lesson> {
        lesson.validate()?;
        let key = key(ENTITY, id)?;

        let sql = format!(
            "UPDATE lessons \
             SET group_id = ?1, subject_id = ?2, lesson_type_id = ?3, week = ?4, weekday = ?5, room = ?6 \
             WHERE id = ?7 RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Lesson>(&sql)
            .bind(sql_id(lesson.group_id))
            .bind(sql_id(lesson.subject_id))
            .bind(sql_id(lesson.lesson_type_id))
            .bind(lesson.week)
            .bind(lesson.weekday)
            .bind(sql_id(lesson.room))
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .at("lessons.update")?
            .ok_or_else(|| DbError::not_found(ENTITY, id))?;

        debug!(id, "Lesson updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: u64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM lessons WHERE id = ?1")
            .bind(key(ENTITY, id)?)
            .execute(&self.pool)
            .await
            .at("lessons.delete")?;

        ensure_affected(result.rows_affected(), ENTITY, id)
    }

    async fn lookup_id(&self, column: LessonColumn, id: u64) -> DbResult<Vec<Lesson>> {
        match Param::id(id) {
            Some(value) => self.lookup(column, value).await,
            None => Ok(Vec::new()),
        }
    }

    async fn lookup(&self, column: LessonColumn, value: Param) -> DbResult<Vec<Lesson>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM lessons WHERE {} = ?1 ORDER BY id",
            column.sql()
        );
        let lessons: Vec<Lesson> = fetch_by(&self.pool, &sql, value, "lessons.find_by").await?;

        debug!(column = column.sql(), count = lessons.len(), "Lesson lookup");
        Ok(lessons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::campus;
    use campus_core::{Group, LessonType};

    #[tokio::test]
    async fn test_lookups_by_every_column() {
        let campus = campus().await;
        let repo = campus.db.lessons();
        let (g, s, t) = (campus.group.id, campus.subject.id, campus.lesson_type.id);

        let monday = repo.create(&Lesson::new(g, s, t, 1, 1, 214)).await.unwrap();
        let friday = repo.create(&Lesson::new(g, s, t, 2, 5, 301)).await.unwrap();

        assert_eq!(repo.find_one(monday.id).await.unwrap(), monday);
        assert_eq!(repo.find_by_group(g).await.unwrap(), vec![monday.clone(), friday.clone()]);
        assert_eq!(repo.find_by_subject(s).await.unwrap().len(), 2);
        assert_eq!(repo.find_by_lesson_type(t).await.unwrap().len(), 2);
        assert_eq!(repo.find_by_week(2).await.unwrap(), vec![friday.clone()]);
        assert_eq!(repo.find_by_weekday(1).await.unwrap(), vec![monday.clone()]);
        assert_eq!(repo.find_by_room(301).await.unwrap(), vec![friday]);
        assert!(repo.find_by_room(999).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_references_are_constraint_errors() {
        let campus = campus().await;

        let lesson = Lesson::new(campus.group.id, 9_999, campus.lesson_type.id, 1, 1, 214);
        let err = campus.db.lessons().create(&lesson).await.unwrap_err();

        assert!(matches!(err, DbError::Constraint(_)));
        assert!(campus.db.lessons().find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_moves_lesson() {
        let campus = campus().await;
        let repo = campus.db.lessons();
        let other_group = campus.db.groups().create(&Group::new(202)).await.unwrap();
        let practice = campus
            .db
            .lesson_types()
            .create(&LessonType::new("PZ"))
            .await
            .unwrap();

        let lesson = repo
            .create(&Lesson::new(campus.group.id, campus.subject.id, campus.lesson_type.id, 1, 1, 214))
            .await
            .unwrap();
        let moved = repo
            .update(
                lesson.id,
                &Lesson::new(other_group.id, campus.subject.id, practice.id, 3, 4, 105),
            )
            .await
            .unwrap();

        assert_eq!(moved.id, lesson.id);
        assert_eq!(moved.group_id, other_group.id);
        assert!(repo.find_by_group(campus.group.id).await.unwrap().is_empty());

        repo.delete(lesson.id).await.unwrap();
        assert!(repo.find_one(lesson.id).await.unwrap_err().is_not_found());
    }
}
