// 🗄️ Store - SQLite export of the registries
//
// The registries live in memory; this module persists them to a SQLite file
// (WAL mode) and rebuilds them later. Saving replaces the stored contents in a
// single transaction. Transcripts are also exported as JSON next to the
// database so a backup of the export directory is human-readable.
//
// Each enrollment row carries the course exactly as the student enrolled in
// it. The catalogue may have replaced that code since, and a reload must not
// pick up the new credits.

use crate::entities::{
    Course, CourseRegistry, CourseSpec, Enrollment, Semester, Student, StudentRegistry,
    StudentStatus, Transcript,
};
use crate::error::{StoreError, StoreResult};
use crate::grade::{Grade, Letter};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Directory under the data dir that holds the latest export
pub const EXPORT_DIR_NAME: &str = "export";
pub const DATABASE_FILE_NAME: &str = "ccrm.db";
pub const TRANSCRIPTS_FILE_NAME: &str = "transcripts.json";

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn setup_database(conn: &Connection) -> StoreResult<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS courses (
            code TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            credits INTEGER NOT NULL,
            semester TEXT NOT NULL,
            department TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS students (
            id TEXT PRIMARY KEY,
            registration_number TEXT UNIQUE NOT NULL,
            full_name TEXT NOT NULL,
            email TEXT NOT NULL,
            status TEXT NOT NULL,
            created_on TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS enrollments (
            student_id TEXT NOT NULL REFERENCES students(id),
            course_code TEXT NOT NULL,
            course_title TEXT NOT NULL,
            course_credits INTEGER NOT NULL,
            course_semester TEXT NOT NULL,
            course_department TEXT NOT NULL,
            grade TEXT,
            enrolled_at TEXT NOT NULL,
            PRIMARY KEY (student_id, course_code)
        );

        CREATE INDEX IF NOT EXISTS idx_enrollments_course ON enrollments(course_code);",
    )?;

    Ok(())
}

/// Replace the stored registries with the current in-memory state
///
/// Returns the number of enrollments written.
pub fn save_registries(
    conn: &mut Connection,
    students: &StudentRegistry,
    courses: &CourseRegistry,
) -> StoreResult<usize> {
    let tx = conn.transaction()?;
    tx.execute_batch("DELETE FROM enrollments; DELETE FROM students; DELETE FROM courses;")?;

    for course in courses.list_all() {
        tx.execute(
            "INSERT INTO courses (code, title, credits, semester, department)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                course.code(),
                course.title(),
                course.credits(),
                course.semester().as_str(),
                course.department(),
            ],
        )?;
    }

    let mut enrollment_count = 0;
    for student in students.list_all() {
        tx.execute(
            "INSERT INTO students (id, registration_number, full_name, email, status, created_on)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                student.id(),
                student.registration_number(),
                student.full_name(),
                student.email(),
                student.status().as_str(),
                student.created_on().format(DATE_FORMAT).to_string(),
            ],
        )?;

        for enrollment in student.enrollments() {
            let course = enrollment.course();
            tx.execute(
                "INSERT INTO enrollments (student_id, course_code, course_title, course_credits,
                                          course_semester, course_department, grade, enrolled_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    student.id(),
                    course.code(),
                    course.title(),
                    course.credits(),
                    course.semester().as_str(),
                    course.department(),
                    enrollment.grade().map(|g| g.letter.as_str()),
                    enrollment.enrolled_at().to_rfc3339(),
                ],
            )?;
            enrollment_count += 1;
        }
    }

    tx.commit()?;
    tracing::info!(
        students = students.count(),
        courses = courses.count(),
        enrollments = enrollment_count,
        "registries saved"
    );
    Ok(enrollment_count)
}

/// Rebuild both registries from the database
pub fn load_registries(conn: &Connection) -> StoreResult<(StudentRegistry, CourseRegistry)> {
    let courses = CourseRegistry::new();
    let mut stmt =
        conn.prepare("SELECT code, title, credits, semester, department FROM courses")?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, u32>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
        ))
    })?;
    for row in rows {
        let (code, title, credits, semester, department) = row?;
        courses.add(course_from_columns(
            code,
            title,
            credits,
            semester,
            department,
            "courses.semester",
        )?);
    }

    let students = StudentRegistry::new();
    let mut by_id: HashMap<String, Arc<Student>> = HashMap::new();
    let mut stmt = conn.prepare(
        "SELECT id, registration_number, full_name, email, status, created_on FROM students",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, String>(5)?,
        ))
    })?;
    for row in rows {
        let (id, registration_number, full_name, email, status, created_on) = row?;
        let status = StudentStatus::parse(&status).ok_or(StoreError::CorruptValue {
            column: "students.status",
            value: status,
        })?;
        let created_on = NaiveDate::parse_from_str(&created_on, DATE_FORMAT).map_err(|_| {
            StoreError::CorruptValue {
                column: "students.created_on",
                value: created_on.clone(),
            }
        })?;

        let student = Arc::new(Student::restore(
            &id,
            &registration_number,
            &full_name,
            &email,
            status,
            created_on,
        ));
        students.register(Arc::clone(&student));
        by_id.insert(id, student);
    }

    let mut stmt = conn.prepare(
        "SELECT student_id, course_code, course_title, course_credits, course_semester,
                course_department, grade, enrolled_at
         FROM enrollments",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            (
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, u32>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
            ),
            row.get::<_, Option<String>>(6)?,
            row.get::<_, String>(7)?,
        ))
    })?;
    for row in rows {
        let (student_id, (code, title, credits, semester, department), grade, enrolled_at) = row?;
        let Some(student) = by_id.get(&student_id) else {
            return Err(StoreError::CorruptValue {
                column: "enrollments.student_id",
                value: student_id,
            });
        };
        let enrolled_course = course_from_columns(
            code,
            title,
            credits,
            semester,
            department,
            "enrollments.course_semester",
        )?;
        // Share the catalogue Arc only while it still matches what was enrolled
        let course = match courses.find_by_code(enrolled_course.code()) {
            Some(current) if *current == enrolled_course => current,
            _ => Arc::new(enrolled_course),
        };
        let grade = match grade {
            Some(letter) => Some(
                Letter::parse(&letter)
                    .map(Grade::from_letter)
                    .ok_or(StoreError::CorruptValue {
                        column: "enrollments.grade",
                        value: letter,
                    })?,
            ),
            None => None,
        };
        let enrolled_at = DateTime::parse_from_rfc3339(&enrolled_at)
            .map_err(|_| StoreError::CorruptValue {
                column: "enrollments.enrolled_at",
                value: enrolled_at.clone(),
            })?
            .with_timezone(&Utc);

        student.enroll(Enrollment::restore(student.id(), course, grade, enrolled_at));
    }

    tracing::info!(
        students = students.count(),
        courses = courses.count(),
        "registries loaded"
    );
    Ok((students, courses))
}

fn course_from_columns(
    code: String,
    title: String,
    credits: u32,
    semester: String,
    department: String,
    semester_column: &'static str,
) -> StoreResult<Course> {
    let semester = Semester::parse(&semester).ok_or(StoreError::CorruptValue {
        column: semester_column,
        value: semester,
    })?;
    Ok(Course::new(CourseSpec {
        code,
        title,
        credits,
        semester,
        department,
    })?)
}

/// Write every student's transcript to `<dir>/transcripts.json`
pub fn write_transcripts_json(dir: &Path, students: &StudentRegistry) -> StoreResult<PathBuf> {
    let transcripts: Vec<Transcript> = students
        .list_all()
        .iter()
        .map(|s| s.transcript_report())
        .collect();

    let path = dir.join(TRANSCRIPTS_FILE_NAME);
    fs::write(&path, serde_json::to_string_pretty(&transcripts)?)?;
    Ok(path)
}

/// Export database + transcripts to `<data_dir>/export` and return that directory
pub fn export_snapshot(
    data_dir: &Path,
    students: &StudentRegistry,
    courses: &CourseRegistry,
) -> StoreResult<PathBuf> {
    let export_dir = data_dir.join(EXPORT_DIR_NAME);
    fs::create_dir_all(&export_dir)?;

    let mut conn = Connection::open(export_dir.join(DATABASE_FILE_NAME))?;
    setup_database(&conn)?;
    save_registries(&mut conn, students, courses)?;
    write_transcripts_json(&export_dir, students)?;

    tracing::info!(dir = %export_dir.display(), "export written");
    Ok(export_dir)
}

// ============================================================================
// TESTS
// ============================================================================
