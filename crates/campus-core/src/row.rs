//! Hand-written row decoding for records the `FromRow` derive can't express.

use sqlx::{ColumnIndex, Decode, FromRow, Row, Type};

use crate::types::Student;

/// Converts a stored INTEGER id into the unsigned domain id.
fn decode_id(value: i64, column: &str) -> Result<u64, sqlx::Error> {
    u64::try_from(value).map_err(|err| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(err),
    })
}

// `employee_id` is nullable: NULL means the student has no curator.
impl<'r, R> FromRow<'r, R> for Student
where
    R: Row,
    &'r str: ColumnIndex<R>,
    i64: Decode<'r, R::Database> + Type<R::Database>,
    String: Decode<'r, R::Database> + Type<R::Database>,
{
    fn from_row(row: &'r R) -> Result<Self, sqlx::Error> {
        let curator: Option<i64> = row.try_get("employee_id")?;

        Ok(Student {
            id: decode_id(row.try_get("id")?, "id")?,
            name: row.try_get("name")?,
            passport: row.try_get("passport")?,
            employee_id: curator
                .map(|id| decode_id(id, "employee_id"))
                .transpose()?,
            group_id: decode_id(row.try_get("group_id")?, "group_id")?,
        })
    }
}
