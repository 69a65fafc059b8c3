//! # Validation Module
//!
//! Input validation utilities for the data-access core.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation                                                  │
//! │  └── Raw text from form entries                                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Raw filter values → typed values (parse_id, parse_date, ...)      │
//! │  └── Record rules (length, positivity) via `Entity::validate()`        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  ├── UNIQUE constraints                                                │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lengths are counted in characters, not bytes: names and passports are
//! routinely Cyrillic.
//!
//! ## Usage
//! ```rust
//! use campus_core::validation::{parse_date, parse_id, validate_exact_chars};
//!
//! assert_eq!(parse_id("id", "42").unwrap(), 42);
//! assert!(parse_date("2024-01-31").is_ok());
//! assert!(validate_exact_chars("passport", "123456789", 9).is_ok());
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::{DATE_FORMAT, MAX_ID};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates that a string has at least `min` characters after trimming.
///
/// ## Example
/// ```rust
/// use campus_core::validation::validate_min_chars;
///
/// assert!(validate_min_chars("name", "Анна Петровна", 5).is_ok());
/// assert!(validate_min_chars("name", "Анна", 5).is_err());
/// assert!(validate_min_chars("name", "   ", 1).is_err());
/// ```
pub fn validate_min_chars(field: &str, value: &str, min: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() < min {
        return Err(ValidationError::TooShort {
            field: field.to_string(),
            min,
        });
    }

    Ok(())
}

/// Validates that a string has exactly `len` characters.
///
/// Used for passports (9) and lesson type codes (2).
pub fn validate_exact_chars(field: &str, value: &str, len: usize) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() != len {
        return Err(ValidationError::WrongLength {
            field: field.to_string(),
            len,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a positive numeric field (mark, room, weekday, group number).
pub fn validate_positive(field: &str, value: u64) -> ValidationResult<()> {
    if value == 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a reference to another row.
///
/// ## Rules
/// - Must be positive (ids are assigned from 1)
/// - Must fit the store's signed 64-bit INTEGER column
pub fn validate_reference(field: &str, id: u64) -> ValidationResult<()> {
    validate_positive(field, id)?;

    if id > MAX_ID {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: MAX_ID,
        });
    }

    Ok(())
}

// =============================================================================
// Raw Value Parsers
// =============================================================================

/// Parses a raw identifier typed into a filter entry.
pub fn parse_id(field: &str, raw: &str) -> ValidationResult<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a non-negative integer".to_string(),
        })
}

/// Parses a raw small number (week, weekday, mark).
pub fn parse_small(field: &str, raw: &str) -> ValidationResult<u16> {
    raw.trim()
        .parse::<u16>()
        .map_err(|_| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("must be an integer between 0 and {}", u16::MAX),
        })
}

/// Parses a mark date in the fixed `YYYY-MM-DD` format.
///
/// Only the canonical zero-padded form is accepted: `2024-1-5` is rejected
/// even though it names a valid day.
///
/// ## Example
/// ```rust
/// use campus_core::validation::parse_date;
///
/// assert!(parse_date("2024-01-05").is_ok());
/// assert!(parse_date("2024-1-5").is_err());
/// assert!(parse_date("05.01.2024").is_err());
/// ```
pub fn parse_date(raw: &str) -> ValidationResult<NaiveDate> {
    let raw = raw.trim();
    let invalid = || ValidationError::InvalidFormat {
        field: "date".to_string(),
        reason: "must be YYYY-MM-DD".to_string(),
    };

    let date = NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| invalid())?;

    if date.format(DATE_FORMAT).to_string() != raw {
        return Err(invalid());
    }

    Ok(date)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_min_chars_counts_characters() {
        // 5 Cyrillic letters are 10 bytes
        assert!(validate_min_chars("name", "Петров", 5).is_ok());
        assert!(validate_min_chars("name", "Петя", 5).is_err());
        assert!(validate_min_chars("name", "", 1).is_err());
    }

    #[test]
    fn test_validate_exact_chars() {
        assert!(validate_exact_chars("passport", "123456789", 9).is_ok());
        assert!(validate_exact_chars("passport", "12345678", 9).is_err());
        assert!(validate_exact_chars("passport", "1234567890", 9).is_err());
        assert!(validate_exact_chars("name", "ЛК", 2).is_ok());
        assert_eq!(
            validate_exact_chars("name", "", 2),
            Err(ValidationError::Required {
                field: "name".to_string()
            })
        );
    }

    #[test]
    fn test_validate_reference() {
        assert!(validate_reference("group_id", 1).is_ok());
        assert!(validate_reference("group_id", MAX_ID).is_ok());
        assert!(validate_reference("group_id", 0).is_err());
        assert!(validate_reference("group_id", u64::MAX).is_err());
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("id", " 17 ").unwrap(), 17);
        assert!(parse_id("id", "-1").is_err());
        assert!(parse_id("id", "abc").is_err());
        assert!(parse_id("id", "").is_err());
    }

    #[test]
    fn test_parse_small() {
        assert_eq!(parse_small("week", "2").unwrap(), 2);
        assert!(parse_small("week", "70000").is_err());
    }

    #[test]
    fn test_parse_date() {
        let date = parse_date("2024-02-29").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        assert!(parse_date("2023-02-29").is_err());
        assert!(parse_date("2024-2-9").is_err());
        assert!(parse_date("29.02.2024").is_err());
        assert!(parse_date("").is_err());
    }
}
