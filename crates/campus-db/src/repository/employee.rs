//! # Employee Repository
//!
//! Database operations for staff records.
//!
//! ## Lookups
//! ```text
//! ┌──────────────┬──────────┬──────────────────────────────┐
//! │ column       │ unique   │ method                       │
//! ├──────────────┼──────────┼──────────────────────────────┤
//! │ id           │ yes      │ find_one                     │
//! │ name         │ no       │ find_by_name                 │
//! │ passport     │ yes      │ find_by_passport             │
//! │ position_id  │ no       │ find_by_position             │
//! └──────────────┴──────────┴──────────────────────────────┘
//! ```

use campus_core::Employee;
use sqlx::SqlitePool;
use tracing::debug;

use super::{ensure_affected, fetch_by, first_or_not_found, key, sql_id, Param};
use crate::error::{DbError, DbResult, ResultExt};

const ENTITY: &str = "Employee";

/// Columns an employee can be looked up by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EmployeeColumn {
    Id,
    Name,
    Passport,
    Position,
}

impl EmployeeColumn {
    fn sql(self) -> &'static str {
        match self {
            EmployeeColumn::Id => "id",
            EmployeeColumn::Name => "name",
            EmployeeColumn::Passport => "passport",
            EmployeeColumn::Position => "position_id",
        }
    }
}

/// Repository for employee database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.employees();
///
/// let created = repo.create(&Employee::new("Иванов Иван", "123456789", 1)).await?;
/// let same = repo.find_by_passport("123456789").await?;
/// assert_eq!(created, same);
/// ```
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    pool: SqlitePool,
}

impl EmployeeRepository {
    /// Creates a new EmployeeRepository.
    pub fn new(pool: SqlitePool) -> Self {
        EmployeeRepository { pool }
    }

    /// Inserts an employee and returns it with the store-assigned id.
    ///
    /// ## Errors
    /// - `Validation` - name/passport/position rules
    /// - `Constraint` - duplicate passport or unknown position
    pub async fn create(&self, employee: &Employee) -> DbResult<Employee> {
        employee.validate()?;

        let created = sqlx::query_as::<_, Employee>(
            r#"
            INSERT INTO employees (name, passport, position_id)
            VALUES (?1, ?2, ?3)
            RETURNING id, name, passport, position_id
            "#,
        )
        .bind(&employee.name)
        .bind(&employee.passport)
        .bind(sql_id(employee.position_id))
        .fetch_one(&self.pool)
        .await
        .at("employees.create")?;

        debug!(id = created.id, "Employee created");
        Ok(created)
    }

    pub async fn find_one(&self, id: u64) -> DbResult<Employee> {
        let rows = self.lookup(EmployeeColumn::Id, Param::Int(key(ENTITY, id)?)).await?;
        first_or_not_found(rows, ENTITY, id)
    }

    /// Returns every employee ordered by id.
    pub async fn find_all(&self) -> DbResult<Vec<Employee>> {
        let employees = sqlx::query_as::<_, Employee>(
            "SELECT id, name, passport, position_id FROM employees ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .at("employees.find_all")?;

        debug!(count = employees.len(), "Loaded employees");
        Ok(employees)
    }

    /// Exact-match name lookup; names are not unique.
    pub async fn find_by_name(&self, name: &str) -> DbResult<Vec<Employee>> {
        self.lookup(EmployeeColumn::Name, Param::text(name)).await
    }

    pub async fn find_by_passport(&self, passport: &str) -> DbResult<Employee> {
        let rows = self
            .lookup(EmployeeColumn::Passport, Param::text(passport))
            .await?;
        first_or_not_found(rows, ENTITY, passport)
    }

    pub async fn find_by_position(&self, position_id: u64) -> DbResult<Vec<Employee>> {
        match Param::id(position_id) {
            Some(value) => self.lookup(EmployeeColumn::Position, value).await,
            None => Ok(Vec::new()),
        }
    }

    /// Replaces every non-id column of employee `id`.
    pub async fn update(&self, id: u64, employee: &Employee) -> DbResult<Employee> {
        employee.validate()?;
        let key = key(ENTITY, id)?;

        let updated = sqlx::query_as::<_, Employee>(
            r#"
            UPDATE employees
            SET name = ?1, passport = ?2, position_id = ?3
            WHERE id = ?4
            RETURNING id, name, passport, position_id
            "#,
        )
        .bind(&employee.name)
        .bind(&employee.passport)
        .bind(sql_id(employee.position_id))
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .at("employees.update")?
        .ok_or_else(|| DbError::not_found(ENTITY, id))?;

        debug!(id, "Employee updated");
        Ok(updated)
    }

    /// Deletes employee `id`. Fails with `Constraint` while students, marks
    /// or subject links still reference it.
    pub async fn delete(&self, id: u64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM employees WHERE id = ?1")
            .bind(key(ENTITY, id)?)
            .execute(&self.pool)
            .await
            .at("employees.delete")?;

        ensure_affected(result.rows_affected(), ENTITY, id)?;
        debug!(id, "Employee deleted");
        Ok(())
    }

    /// Shared routine behind every `find_by_*`.
    async fn lookup(&self, column: EmployeeColumn, value: Param) -> DbResult<Vec<Employee>> {
        let sql = format!(
            "SELECT id, name, passport, position_id FROM employees WHERE {} = ?1 ORDER BY id",
            column.sql()
        );
        let employees: Vec<Employee> =
            fetch_by(&self.pool, &sql, value, "employees.find_by").await?;

        debug!(column = column.sql(), count = employees.len(), "Employee lookup");
        Ok(employees)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
