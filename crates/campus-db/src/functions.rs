//! # SQL Functions
//!
//! Scalar functions registered on every pooled connection.
//!
//! SQLite's built-in `UPPER` only folds ASCII, which leaves Cyrillic names
//! untouched. `unicode_upper(text)` folds with Rust's full Unicode case
//! mapping instead, so reports can still uppercase inside the query.
//!
//! ```sql
//! SELECT unicode_upper('Анна Петровна');  -- 'АННА ПЕТРОВНА'
//! SELECT unicode_upper(NULL);             -- NULL
//! ```

use libsqlite3_sys as ffi;
use sqlx::SqliteConnection;
use std::ffi::{c_char, c_int};
use std::ptr;
use tracing::debug;

const UNICODE_UPPER: &[u8] = b"unicode_upper\0";

/// Registers the crate's SQL functions on `conn`.
///
/// Installed through `SqlitePoolOptions::after_connect`, so every connection
/// the pool opens has them before its first query.
pub(crate) async fn register(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    let mut handle = conn.lock_handle().await?;
    let db = handle.as_raw_handle().as_ptr();

    // SAFETY: `db` is a live handle held exclusively by the lock above; the
    // name is NUL-terminated and static; the callback has the signature
    // SQLite expects and keeps no state, so no user data or destructor.
    let rc = unsafe {
        ffi::sqlite3_create_function_v2(
            db,
            UNICODE_UPPER.as_ptr().cast::<c_char>(),
            1,
            ffi::SQLITE_UTF8 | ffi::SQLITE_DETERMINISTIC,
            ptr::null_mut(),
            Some(unicode_upper),
            None,
            None,
            None,
        )
    };

    if rc != ffi::SQLITE_OK {
        return Err(sqlx::Error::Protocol(format!(
            "failed to register unicode_upper (SQLite code {rc})"
        )));
    }

    debug!("SQL functions registered");
    Ok(())
}

unsafe extern "C" fn unicode_upper(
    ctx: *mut ffi::sqlite3_context,
    argc: c_int,
    argv: *mut *mut ffi::sqlite3_value,
) {
    if argc != 1 {
        ffi::sqlite3_result_null(ctx);
        return;
    }

    let value = *argv;
    if ffi::sqlite3_value_type(value) == ffi::SQLITE_NULL {
        ffi::sqlite3_result_null(ctx);
        return;
    }

    // Text pointer first, then byte count: SQLite documents this order
    let text = ffi::sqlite3_value_text(value);
    let len = usize::try_from(ffi::sqlite3_value_bytes(value)).unwrap_or(0);
    if text.is_null() {
        ffi::sqlite3_result_null(ctx);
        return;
    }

    let bytes = std::slice::from_raw_parts(text, len);
    let upper = String::from_utf8_lossy(bytes).to_uppercase();

    match c_int::try_from(upper.len()) {
        Ok(upper_len) => ffi::sqlite3_result_text(
            ctx,
            upper.as_ptr().cast::<c_char>(),
            upper_len,
            ffi::SQLITE_TRANSIENT(),
        ),
        Err(_) => ffi::sqlite3_result_error_toobig(ctx),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
