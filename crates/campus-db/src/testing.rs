//! Test fixtures: a fresh in-memory database and a minimal university.

use campus_core::{Employee, Group, LessonType, Position, Student, Subject, TEACHER_POSITION_NAME};

use crate::{Database, DbConfig};

/// Opens an empty in-memory database with the schema applied.
pub(crate) async fn memory_db() -> Database {
    Database::new(DbConfig::in_memory())
        .await
        .expect("in-memory database")
}

/// The rows most tests need to reference.
pub(crate) struct Campus {
    pub db: Database,
    pub teacher_position: Position,
    pub lab_position: Position,
    /// Holds the teacher position.
    pub teacher: Employee,
    /// Holds the lab assistant position.
    pub assistant: Employee,
    pub group: Group,
    pub subject: Subject,
    pub lesson_type: LessonType,
}

/// Seeds one teacher, one lab assistant, a group, a subject and a lesson type.
pub(crate) async fn campus() -> Campus {
    let db = memory_db().await;

    let teacher_position = db
        .positions()
        .create(&Position::new(TEACHER_POSITION_NAME))
        .await
        .unwrap();
    let lab_position = db
        .positions()
        .create(&Position::new("Лаборант"))
        .await
        .unwrap();

    let teacher = db
        .employees()
        .create(&Employee::new("Smirnov Pavel", "100000001", teacher_position.id))
        .await
        .unwrap();
    let assistant = db
        .employees()
        .create(&Employee::new("Orlova Maria", "100000002", lab_position.id))
        .await
        .unwrap();

    let group = db.groups().create(&Group::new(101)).await.unwrap();
    let subject = db
        .subjects()
        .create(&Subject::new("Physics", "Mechanics and optics"))
        .await
        .unwrap();
    let lesson_type = db
        .lesson_types()
        .create(&LessonType::new("LK"))
        .await
        .unwrap();

    Campus {
        db,
        teacher_position,
        lab_position,
        teacher,
        assistant,
        group,
        subject,
        lesson_type,
    }
}

impl Campus {
    /// Adds a student to the fixture group.
    pub async fn student(&self, name: &str, passport: &str, curator: Option<u64>) -> Student {
        self.db
            .students()
            .create(&Student::new(name, passport, curator, self.group.id))
            .await
            .unwrap()
    }
}
