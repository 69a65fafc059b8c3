//! # campus-core: Domain Types for the University Administration Tool
//!
//! This crate holds the entity records, report row shapes, search-field
//! enumerations and validation rules. It performs no I/O; the database
//! layer (`campus-db`) depends on it, never the other way round.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Campus Admin Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Presentation (forms, tables)                    │   │
//! │  │   entity forms ──► filter selector ──► special queries          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ campus-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  report   │  │  fields   │  │ validation│  │   │
//! │  │   │ Employee  │  │ Schedule  │  │ Employee- │  │   rules   │  │   │
//! │  │   │ Student…  │  │ Curator…  │  │ Field…    │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    campus-db (Database Layer)                   │   │
//! │  │        repositories, reports, filter dispatch, errors           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entity records (Employee, Student, Mark, etc.)
//! - [`report`] - Row shapes returned by the reporting queries
//! - [`fields`] - Search-field enumerations used by filter dispatch
//! - [`error`] - Validation error type
//! - [`validation`] - Field rules applied before anything reaches the store
//!
//! ## Example Usage
//!
//! ```rust
//! use campus_core::{Employee, EmployeeField};
//!
//! let employee = Employee::new("Иванов Иван", "123456789", 1);
//! assert!(employee.validate().is_ok());
//!
//! // The presentation layer sends numeric selector codes
//! assert_eq!(EmployeeField::try_from(3).unwrap(), EmployeeField::Passport);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod fields;
pub mod report;
pub mod types;
pub mod validation;

#[cfg(feature = "sqlx")]
mod row;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use fields::*;
pub use report::*;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Position name that marks an employee as a teacher.
///
/// Compared verbatim against `positions.name`. Only teachers may grade
/// students or be linked to subjects.
pub const TEACHER_POSITION_NAME: &str = "Преподаватель";

/// Textual format of mark dates at every boundary of the system.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Largest identifier the store can hold (SQLite INTEGER is signed).
pub const MAX_ID: u64 = i64::MAX as u64;
