//! # Position Repository
//!
//! Staff positions. `find_by_name` is how the teacher position is resolved
//! when seeding; names are unique only by convention, so the lowest id wins.

use campus_core::Position;
use sqlx::SqlitePool;
use tracing::debug;

use super::{ensure_affected, fetch_by, first_or_not_found, key, Param};
use crate::error::{DbError, DbResult, ResultExt};

const ENTITY: &str = "Position";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PositionColumn {
    Id,
    Name,
}

impl PositionColumn {
    fn sql(self) -> &'static str {
        match self {
            PositionColumn::Id => "id",
            PositionColumn::Name => "name",
        }
    }
}

/// Repository for position database operations.
#[derive(Debug, Clone)]
pub struct PositionRepository {
    pool: SqlitePool,
}

impl PositionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        PositionRepository { pool }
    }

    pub async fn create(&self, position: &Position) -> DbResult<Position> {
        position.validate()?;

        let created = sqlx::query_as::<_, Position>(
            "INSERT INTO positions (name) VALUES (?1) RETURNING id, name",
        )
        .bind(&position.name)
        .fetch_one(&self.pool)
        .await
        .at("positions.create")?;

        debug!(id = created.id, "Position created");
        Ok(created)
    }

    pub async fn find_one(&self, id: u64) -> DbResult<Position> {
        let rows = self.lookup(PositionColumn::Id, Param::Int(key(ENTITY, id)?)).await?;
        first_or_not_found(rows, ENTITY, id)
    }

    pub async fn find_all(&self) -> DbResult<Vec<Position>> {
        let positions =
            sqlx::query_as::<_, Position>("SELECT id, name FROM positions ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .at("positions.find_all")?;

        debug!(count = positions.len(), "Loaded positions");
        Ok(positions)
    }

    /// Returns the position called `name`; the first by id if several are.
    pub async fn find_by_name(&self, name: &str) -> DbResult<Position> {
        let rows = self.lookup(PositionColumn::Name, Param::text(name)).await?;
        first_or_not_found(rows, ENTITY, name)
    }

    pub async fn update(&self, id: u64, position: &Position) -> DbResult<Position> {
        position.validate()?;
        let key = key(ENTITY, id)?;

        let updated = sqlx::query_as::<_, Position>(
            "UPDATE positions SET name = ?1 WHERE id = ?2 RETURNING id, name",
        )
        .bind(&position.name)
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .at("positions.update")?
        .ok_or_else(|| DbError::not_found(ENTITY, id))?;

        debug!(id, "Position updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: u64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM positions WHERE id = ?1")
            .bind(key(ENTITY, id)?)
            .execute(&self.pool)
            .await
            .at("positions.delete")?;

        ensure_affected(result.rows_affected(), ENTITY, id)
    }

    async fn lookup(&self, column: PositionColumn, value: Param) -> DbResult<Vec<Position>> {
        let sql = format!(
            "SELECT id, name FROM positions WHERE {} = ?1 ORDER BY id",
            column.sql()
        );
        fetch_by(&self.pool, &sql, value, "positions.find_by").await
    }
}
