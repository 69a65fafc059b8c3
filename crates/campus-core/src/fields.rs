//! # Search Fields
//!
//! The lookup field a user picks in an entity's filter selector.
//!
//! ## Wire Codes
//! The presentation layer sends the selector position as a small integer.
//! Position 0 is always "all records"; the remaining codes follow the order
//! of the entity's columns in the filter dropdown:
//!
//! ```text
//! EmployeeField:  0 All │ 1 Id │ 2 Name │ 3 Passport │ 4 Position
//! StudentField:   0 All │ 1 Id │ 2 Name │ 3 Passport │ 4 Curator │ 5 Group
//! MarkField:      0 All │ 1 Id │ 2 Employee │ 3 Student │ 4 Subject │ 5 Mark │ 6 Date
//! ...
//! ```
//!
//! Every enum is closed: `campus_db` matches on it exhaustively, so adding a
//! variant without routing it is a compile error, not a runtime surprise.

use crate::error::ValidationError;

macro_rules! search_fields {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident = $code:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub enum $name {
            #[default]
            $($variant = $code),+
        }

        impl $name {
            /// Every selector, in dropdown order.
            pub const VARIANTS: &'static [$name] = &[$($name::$variant),+];

            /// Numeric code sent by the presentation layer.
            pub const fn code(self) -> u8 {
                self as u8
            }

            /// Whether the selector needs a typed value (everything but `All`).
            pub fn requires_value(self) -> bool {
                self.code() != 0
            }
        }

        impl TryFrom<u8> for $name {
            type Error = ValidationError;

            fn try_from(code: u8) -> Result<Self, Self::Error> {
                $name::VARIANTS
                    .iter()
                    .copied()
                    .find(|field| field.code() == code)
                    .ok_or_else(|| ValidationError::OutOfRange {
                        field: stringify!($name).to_string(),
                        min: 0,
                        max: ($name::VARIANTS.len() - 1) as u64,
                    })
            }
        }
    };
}

search_fields! {
    /// Employee lookups.
    EmployeeField { All = 0, Id = 1, Name = 2, Passport = 3, Position = 4 }
}

search_fields! {
    /// Position lookups.
    PositionField { All = 0, Id = 1, Name = 2 }
}

search_fields! {
    /// Subject lookups.
    SubjectField { All = 0, Id = 1, Name = 2 }
}

search_fields! {
    /// Group lookups.
    GroupField { All = 0, Id = 1, Number = 2 }
}

search_fields! {
    /// Lesson type lookups.
    LessonTypeField { All = 0, Id = 1, Name = 2 }
}

search_fields! {
    /// Timetable lookups.
    LessonField {
        All = 0,
        Id = 1,
        Group = 2,
        Subject = 3,
        LessonType = 4,
        Week = 5,
        Weekday = 6,
        Room = 7,
    }
}

search_fields! {
    /// Student lookups. `Curator` filters by the curating employee's id.
    StudentField { All = 0, Id = 1, Name = 2, Passport = 3, Curator = 4, Group = 5 }
}

search_fields! {
    /// Mark lookups. `Employee` is the grading teacher.
    MarkField {
        All = 0,
        Id = 1,
        Employee = 2,
        Student = 3,
        Subject = 4,
        Mark = 5,
        Date = 6,
    }
}

search_fields! {
    /// Teacher ↔ subject link lookups.
    EmployeeSubjectField { All = 0, Employee = 1, Subject = 2 }
}

// =============================================================================
// Unit Tests
// =============================================================================
