//! # Seed Data Generator
//!
//! Populates the database with a demo university for development.
//!
//! ## Usage
//! ```bash
//! # 60 students (default) into $CAMPUS_DB_PATH, or campus.db
//! cargo run -p campus-db --bin seed
//!
//! # Custom amount
//! cargo run -p campus-db --bin seed -- --students 300
//!
//! # Specify database path
//! cargo run -p campus-db --bin seed -- --db ./data/campus.db
//! ```
//!
//! ## Generated Data
//! - Positions: teacher, lab assistant, dean's office
//! - Employees: five teachers, two assistants
//! - Groups, subjects, lesson types and a two-week timetable
//! - Students spread over the groups; every third one without a curator
//! - A handful of marks per student, all given by teachers
//!
//! Everything goes through the public repository API, so the same
//! validation and teacher checks apply as for the admin forms.

use campus_core::{
    Employee, EmployeeSubject, Group, Lesson, LessonType, Mark, Position, Student, Subject,
    TEACHER_POSITION_NAME,
};
use campus_db::{Database, DbConfig};
use chrono::{Duration, NaiveDate};
use std::env;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const SURNAMES: &[&str] = &[
    "Иванов", "Петров", "Сидоров", "Смирнов", "Кузнецов", "Попов", "Соколов", "Лебедев",
    "Козлов", "Новиков",
];

const FIRST_NAMES: &[(&str, &str)] = &[
    ("Анна", "Сергеевна"),
    ("Мария", "Петровна"),
    ("Ольга", "Ивановна"),
    ("Илья", "Андреевич"),
    ("Олег", "Павлович"),
    ("Дмитрий", "Олегович"),
];

const TEACHERS: &[&str] = &[
    "Соколова Ирина Петровна",
    "Морозов Андрей Викторович",
    "Волкова Елена Сергеевна",
    "Зайцев Павел Ильич",
    "Орлов Виктор Андреевич",
];

const SUBJECTS: &[(&str, &str)] = &[
    ("Математический анализ", "Пределы, производные, интегралы"),
    ("Физика", "Механика и оптика"),
    ("Программирование", "Алгоритмы и структуры данных"),
    ("Базы данных", "Реляционная модель и SQL"),
    ("История", "История науки и техники"),
];

const LESSON_TYPES: &[&str] = &["ЛК", "ПЗ", "ЛР"];

const GROUP_NUMBERS: &[u64] = &[4381, 4382, 4383];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut students: usize = 60;
    let mut config = DbConfig::from_env()?;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--students" | "-s" => {
                if i + 1 < args.len() {
                    students = args[i + 1].parse().unwrap_or(60);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config.database_path = args[i + 1].clone().into();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Campus Admin Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -s, --students <N>  Number of students to generate (default: 60)");
                println!("  -d, --db <PATH>     Database file path (default: $CAMPUS_DB_PATH or campus.db)");
                println!("  -h, --help          Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Campus Admin Seed Data Generator");
    println!("===================================");
    println!("Database: {}", config.database_path.display());
    println!("Students: {}", students);
    println!();

    let db = Database::new(config).await?;
    println!("✓ Connected to database");
    println!("✓ Schema ready");

    let existing = db.students().find_all().await?.len();
    if existing > 0 {
        println!("⚠ Database already has {} students", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let start = std::time::Instant::now();

    // Staff
    let teacher_position = db.positions().create(&Position::new(TEACHER_POSITION_NAME)).await?;
    let lab_position = db.positions().create(&Position::new("Лаборант")).await?;
    db.positions().create(&Position::new("Методист")).await?;

    let mut teachers = Vec::new();
    for (idx, name) in TEACHERS.iter().enumerate() {
        let passport = format!("40{:07}", idx + 1);
        teachers.push(
            db.employees()
                .create(&Employee::new(*name, passport, teacher_position.id))
                .await?,
        );
    }
    for (idx, name) in ["Белова Дарья Игоревна", "Фролов Игорь Денисович"].iter().enumerate() {
        let passport = format!("41{:07}", idx + 1);
        db.employees()
            .create(&Employee::new(*name, passport, lab_position.id))
            .await?;
    }
    println!("✓ {} teachers", teachers.len());

    // Curriculum
    let mut subjects = Vec::new();
    for (name, description) in SUBJECTS {
        subjects.push(db.subjects().create(&Subject::new(*name, *description)).await?);
    }
    let mut lesson_types = Vec::new();
    for name in LESSON_TYPES {
        lesson_types.push(db.lesson_types().create(&LessonType::new(*name)).await?);
    }
    let mut groups = Vec::new();
    for number in GROUP_NUMBERS {
        groups.push(db.groups().create(&Group::new(*number)).await?);
    }

    for (idx, subject) in subjects.iter().enumerate() {
        let teacher = &teachers[idx % teachers.len()];
        db.employee_subjects()
            .create(&EmployeeSubject::new(teacher.id, subject.id))
            .await?;
    }

    let mut lessons = 0;
    for week in 1..=2u16 {
        for (g_idx, group) in groups.iter().enumerate() {
            for weekday in 1..=5u16 {
                let s_idx = (g_idx + usize::from(weekday) + usize::from(week)) % subjects.len();
                let t_idx = usize::from(weekday) % lesson_types.len();
                let room = 100 + (g_idx as u64) * 10 + u64::from(weekday);
                db.lessons()
                    .create(&Lesson::new(
                        group.id,
                        subjects[s_idx].id,
                        lesson_types[t_idx].id,
                        week,
                        weekday,
                        room,
                    ))
                    .await?;
                lessons += 1;
            }
        }
    }
    println!("✓ {} subjects, {} groups, {} lessons", subjects.len(), groups.len(), lessons);

    // Students and marks
    let first_day = NaiveDate::from_ymd_opt(2024, 9, 2).ok_or("invalid start date")?;
    let mut marks = 0;

    for n in 0..students {
        let surname = SURNAMES[n % SURNAMES.len()];
        let (first, patronymic) = FIRST_NAMES[(n / SURNAMES.len()) % FIRST_NAMES.len()];
        let feminine = patronymic.ends_with("вна");
        let name = if feminine {
            format!("{}а {} {}", surname, first, patronymic)
        } else {
            format!("{} {} {}", surname, first, patronymic)
        };

        let curator = (n % 3 != 0).then(|| teachers[n % teachers.len()].id);
        let group = &groups[n % groups.len()];

        let student = match db
            .students()
            .create(&Student::new(name, format!("5{:08}", n + 1), curator, group.id))
            .await
        {
            Ok(student) => student,
            Err(e) => {
                warn!(error = %e, n, "Failed to insert student");
                continue;
            }
        };

        for k in 0..3 {
            let s_idx = (n + k) % subjects.len();
            let grade = 2 + ((n * 7 + k * 3) % 4) as u16;
            let date = first_day + Duration::days(((n + k * 5) % 30) as i64);
            db.marks()
                .create(&Mark::new(
                    teachers[s_idx % teachers.len()].id,
                    student.id,
                    subjects[s_idx].id,
                    grade,
                    date,
                ))
                .await?;
            marks += 1;
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} students and {} marks in {:?}", students, marks, elapsed);

    // Sanity check through the reports
    let reports = db.reports();
    println!();
    println!("Verifying reports...");
    println!("  Timetable rows: {}", reports.schedule().await?.len());
    println!(
        "  Students without curator: {}",
        reports.students_without_curator().await?.len()
    );
    println!(
        "  Patronymic '…вна': {} students",
        reports.students_by_name_suffix("вна").await?.len()
    );

    info!("Seed complete");
    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}

/// Initializes the tracing subscriber for logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Verbose debugging
/// - `RUST_LOG=info` - Normal operation (default)
/// - `RUST_LOG=campus=trace` - Trace campus crates only
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,campus=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
