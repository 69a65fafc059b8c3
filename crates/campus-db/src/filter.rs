//! # Filter Dispatch
//!
//! Turns a table's filter selector plus the text typed next to it into
//! exactly one repository call.
//!
//! ## Routing
//! ```text
//! (StudentField::Passport, "500000001")
//!        │
//!        ├── All            → find_all()            raw value ignored
//!        ├── unique column  → find_by_passport(..)  wrapped in a 1-element Vec
//!        └── other column   → find_by_group(..)     list as-is
//!        │
//!        ▼
//! DbResult<Vec<Student>>
//! ```
//!
//! Every `match` below is exhaustive over its field enum, so a selector
//! without a route does not compile. Raw values that don't parse as the
//! column's type fail with [`DbError::Validation`](crate::DbError::Validation)
//! before the store is touched.

use campus_core::validation::{parse_date, parse_id, parse_small};
use campus_core::{
    Employee, EmployeeField, EmployeeSubject, EmployeeSubjectField, Group, GroupField, Lesson,
    LessonField, LessonType, LessonTypeField, Mark, MarkField, Position, PositionField, Student,
    StudentField, Subject, SubjectField,
};

use crate::error::DbResult;
use crate::repository::{
    EmployeeRepository, EmployeeSubjectRepository, GroupRepository, LessonRepository,
    LessonTypeRepository, MarkRepository, PositionRepository, StudentRepository,
    SubjectRepository,
};

impl EmployeeRepository {
    pub async fn filter(&self, field: EmployeeField, raw: &str) -> DbResult<Vec<Employee>> {
        match field {
            EmployeeField::All => self.find_all().await,
            EmployeeField::Id => Ok(vec![self.find_one(parse_id("id", raw)?).await?]),
            EmployeeField::Name => self.find_by_name(raw.trim()).await,
            EmployeeField::Passport => Ok(vec![self.find_by_passport(raw.trim()).await?]),
            EmployeeField::Position => {
                self.find_by_position(parse_id("position_id", raw)?).await
            }
        }
    }
}

impl PositionRepository {
    pub async fn filter(&self, field: PositionField, raw: &str) -> DbResult<Vec<Position>> {
        match field {
            PositionField::All => self.find_all().await,
            PositionField::Id => Ok(vec![self.find_one(parse_id("id", raw)?).await?]),
            PositionField::Name => Ok(vec![self.find_by_name(raw.trim()).await?]),
        }
    }
}

impl SubjectRepository {
    pub async fn filter(&self, field: SubjectField, raw: &str) -> DbResult<Vec<Subject>> {
        match field {
            SubjectField::All => self.find_all().await,
            SubjectField::Id => Ok(vec![self.find_one(parse_id("id", raw)?).await?]),
            SubjectField::Name => Ok(vec![self.find_by_name(raw.trim()).await?]),
        }
    }
}

impl GroupRepository {
    pub async fn filter(&self, field: GroupField, raw: &str) -> DbResult<Vec<Group>> {
        match field {
            GroupField::All => self.find_all().await,
            GroupField::Id => Ok(vec![self.find_one(parse_id("id", raw)?).await?]),
            GroupField::Number => Ok(vec![self.find_by_number(parse_id("number", raw)?).await?]),
        }
    }
}

impl LessonTypeRepository {
    pub async fn filter(&self, field: LessonTypeField, raw: &str) -> DbResult<Vec<LessonType>> {
        match field {
            LessonTypeField::All => self.find_all().await,
            LessonTypeField::Id => Ok(vec![self.find_one(parse_id("id", raw)?).await?]),
            LessonTypeField::Name => Ok(vec![self.find_by_name(raw.trim()).await?]),
        }
    }
}

impl LessonRepository {
    pub async fn filter(&self, field: LessonField, raw: &str) -> DbResult<Vec<Lesson>> {
        match field {
            LessonField::All => self.find_all().await,
            LessonField::Id => Ok(vec![self.find_one(parse_id("id", raw)?).await?]),
            LessonField::Group => self.find_by_group(parse_id("group_id", raw)?).await,
            LessonField::Subject => self.find_by_subject(parse_id("subject_id", raw)?).await,
            LessonField::LessonType => {
                self.find_by_lesson_type(parse_id("lesson_type_id", raw)?)
                    .await
            }
            LessonField::Week => self.find_by_week(parse_small("week", raw)?).await,
            LessonField::Weekday => self.find_by_weekday(parse_small("weekday", raw)?).await,
            LessonField::Room => self.find_by_room(parse_id("room", raw)?).await,
        }
    }
}

impl StudentRepository {
    pub async fn filter(&self, field: StudentField, raw: &str) -> DbResult<Vec<Student>> {
        match field {
            StudentField::All => self.find_all().await,
            StudentField::Id => Ok(vec![self.find_one(parse_id("id", raw)?).await?]),
            StudentField::Name => self.find_by_name(raw.trim()).await,
            StudentField::Passport => Ok(vec![self.find_by_passport(raw.trim()).await?]),
            StudentField::Curator => self.find_by_curator(parse_id("employee_id", raw)?).await,
            StudentField::Group => self.find_by_group(parse_id("group_id", raw)?).await,
        }
    }
}

impl MarkRepository {
    pub async fn filter(&self, field: MarkField, raw: &str) -> DbResult<Vec<Mark>> {
        match field {
            MarkField::All => self.find_all().await,
            MarkField::Id => Ok(vec![self.find_one(parse_id("id", raw)?).await?]),
            MarkField::Employee => self.find_by_employee(parse_id("employee_id", raw)?).await,
            MarkField::Student => self.find_by_student(parse_id("student_id", raw)?).await,
            MarkField::Subject => self.find_by_subject(parse_id("subject_id", raw)?).await,
            MarkField::Mark => self.find_by_mark(parse_small("mark", raw)?).await,
            MarkField::Date => self.find_by_date(parse_date(raw)?).await,
        }
    }
}

impl EmployeeSubjectRepository {
    pub async fn filter(
        &self,
        field: EmployeeSubjectField,
        raw: &str,
    ) -> DbResult<Vec<EmployeeSubject>> {
        match field {
            EmployeeSubjectField::All => self.find_all().await,
            EmployeeSubjectField::Employee => {
                self.find_by_employee(parse_id("employee_id", raw)?).await
            }
            EmployeeSubjectField::Subject => {
                self.find_by_subject(parse_id("subject_id", raw)?).await
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
