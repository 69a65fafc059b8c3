//! # Group Repository
//!
//! Student groups. `number` is what people call a group by, and is unique.
//!
//! The table is named `groups`, which is also an SQL keyword, so it is
//! always quoted.

use campus_core::Group;
use sqlx::SqlitePool;
use tracing::debug;

use super::{ensure_affected, fetch_by, first_or_not_found, key, sql_id, Param};
use crate::error::{DbError, DbResult, ResultExt};

const ENTITY: &str = "Group";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupColumn {
    Id,
    Number,
}

impl GroupColumn {
    fn sql(self) -> &'static str {
        match self {
            GroupColumn::Id => "id",
            GroupColumn::Number => "number",
        }
    }
}

/// Repository for group database operations.
#[derive(Debug, Clone)]
pub struct GroupRepository {
    pool: SqlitePool,
}

impl GroupRepository {
    pub fn new(pool: SqlitePool) -> Self {
        GroupRepository { pool }
    }

    pub async fn create(&self, group: &Group) -> DbResult<Group> {
        group.validate()?;

        let created = sqlx::query_as::<_, Group>(
            r#"INSERT INTO "groups" (number) VALUES (?1) RETURNING id, number"#,
        )
        .bind(sql_id(group.number))
        .fetch_one(&self.pool)
        .await
        .at("groups.create")?;

        debug!(id = created.id, number = created.number, "Group created");
        Ok(created)
    }

    pub async fn find_one(&self, id: u64) -> DbResult<Group> {
        let rows = self.lookup(GroupColumn::Id, Param::Int(key(ENTITY, id)?)).await?;
        first_or_not_found(rows, ENTITY, id)
    }

    pub async fn find_all(&self) -> DbResult<Vec<Group>> {
        let groups = sqlx::query_as::<_, Group>(r#"SELECT id, number FROM "groups" ORDER BY id"#)
            .fetch_all(&self.pool)
            .await
            .at("groups.find_all")?;

        debug!(count = groups.len(), "Loaded groups");
        Ok(groups)
    }

    pub async fn find_by_number(&self, number: u64) -> DbResult<Group> {
        let value = Param::id(number).ok_or_else(|| DbError::not_found(ENTITY, number))?;
        let rows = self.lookup(GroupColumn::Number, value).await?;
        first_or_not_found(rows, ENTITY, number)
    }

    pub async fn update(&self, id: u64, group: &Group) -> DbResult<Group> {
        group.validate()?;
        let key = key(ENTITY, id)?;

        let updated = sqlx::query_as::<_, Group>(
            r#"UPDATE "groups" SET number = ?1 WHERE id = ?2 RETURNING id, number"#,
        )
        .bind(sql_id(group.number))
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .at("groups.update")?
        .ok_or_else(|| DbError::not_found(ENTITY, id))?;

        debug!(id, "Group updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: u64) -> DbResult<()> {
        let result = sqlx::query(r#"DELETE FROM "groups" WHERE id = ?1"#)
            .bind(key(ENTITY, id)?)
            .execute(&self.pool)
            .await
            .at("groups.delete")?;

        ensure_affected(result.rows_affected(), ENTITY, id)
    }

    async fn lookup(&self, column: GroupColumn, value: Param) -> DbResult<Vec<Group>> {
        let sql = format!(
            r#"SELECT id, number FROM "groups" WHERE {} = ?1 ORDER BY id"#,
            column.sql()
        );
        fetch_by(&self.pool, &sql, value, "groups.find_by").await
    }
}
