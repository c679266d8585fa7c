// 🧑‍🎓 Student Entity - Stable identity + per-course enrollments
//
// "Registration number is how people find you, the UUID is who you are"
//
// Identity: internally generated UUID (never changes)
// Lookup key: caller-supplied registration number
// State: status + a map of course code → Enrollment, both behind locks so a
// shared Arc<Student> can be read and mutated from several threads.

use crate::entities::enrollment::Enrollment;
use crate::grade::Grade;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

// ============================================================================
// STUDENT STATUS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StudentStatus {
    #[default]
    Active,
    Inactive,
}

impl StudentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StudentStatus::Active => "ACTIVE",
            StudentStatus::Inactive => "INACTIVE",
        }
    }

    pub fn parse(s: &str) -> Option<StudentStatus> {
        match s {
            "ACTIVE" => Some(StudentStatus::Active),
            "INACTIVE" => Some(StudentStatus::Inactive),
            _ => None,
        }
    }
}

// ============================================================================
// STUDENT ENTITY
// ============================================================================

#[derive(Debug)]
pub struct Student {
    // ========================================================================
    // IDENTITY (never changes)
    // ========================================================================
    id: String,
    registration_number: String,
    created_on: NaiveDate,

    // ========================================================================
    // VALUES
    // ========================================================================
    full_name: String,
    email: String,
    status: RwLock<StudentStatus>,

    /// Course code → enrollment, at most one entry per code
    enrollments: RwLock<HashMap<String, Enrollment>>,
}

impl Student {
    /// Create a new active student with a fresh UUID
    pub(crate) fn new(registration_number: &str, full_name: &str, email: &str) -> Self {
        Student {
            id: uuid::Uuid::new_v4().to_string(),
            registration_number: registration_number.to_string(),
            created_on: Utc::now().date_naive(),
            full_name: full_name.to_string(),
            email: email.to_string(),
            status: RwLock::new(StudentStatus::Active),
            enrollments: RwLock::new(HashMap::new()),
        }
    }

    /// Rebuild a stored student, keeping its original identity
    pub(crate) fn restore(
        id: &str,
        registration_number: &str,
        full_name: &str,
        email: &str,
        status: StudentStatus,
        created_on: NaiveDate,
    ) -> Self {
        Student {
            id: id.to_string(),
            registration_number: registration_number.to_string(),
            created_on,
            full_name: full_name.to_string(),
            email: email.to_string(),
            status: RwLock::new(status),
            enrollments: RwLock::new(HashMap::new()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn registration_number(&self) -> &str {
        &self.registration_number
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn created_on(&self) -> NaiveDate {
        self.created_on
    }

    pub fn status(&self) -> StudentStatus {
        *self.status.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_active(&self) -> bool {
        self.status() == StudentStatus::Active
    }

    /// Mark the student inactive (idempotent, never deletes)
    pub fn deactivate(&self) {
        *self.status.write().unwrap_or_else(PoisonError::into_inner) = StudentStatus::Inactive;
    }

    /// "Student: <name> (<regNo>) - <STATUS>"
    pub fn profile(&self) -> String {
        format!(
            "Student: {} ({}) - {}",
            self.full_name,
            self.registration_number,
            self.status().as_str()
        )
    }

    // ========================================================================
    // ENROLLMENTS
    // ========================================================================

    /// Insert or overwrite the entry for the enrollment's course code
    ///
    /// No validation here; EnrollmentService enforces the business rules.
    pub fn enroll(&self, enrollment: Enrollment) {
        self.enrollments_mut()
            .insert(enrollment.course_code().to_string(), enrollment);
    }

    /// Drop the enrollment for a course; returns whether one existed
    pub fn unenroll(&self, course_code: &str) -> bool {
        self.enrollments_mut().remove(course_code).is_some()
    }

    pub fn is_enrolled_in(&self, course_code: &str) -> bool {
        self.enrollments
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(course_code)
    }

    /// Snapshot of one enrollment
    pub fn enrollment(&self, course_code: &str) -> Option<Enrollment> {
        self.enrollments
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(course_code)
            .cloned()
    }

    /// Snapshot of every enrollment, ordered by course code
    pub fn enrollments(&self) -> Vec<Enrollment> {
        let mut all: Vec<Enrollment> = self
            .enrollments
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        all.sort_by(|a, b| a.course_code().cmp(b.course_code()));
        all
    }

    pub fn total_credits(&self) -> u32 {
        self.enrollments
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .fold(0u32, |total, e| total.saturating_add(e.course().credits()))
    }

    pub fn gpa(&self) -> f64 {
        self.transcript_report().gpa
    }

    /// Exclusive access to the enrollment map for read-validate-write sequences
    pub(crate) fn enrollments_mut(&self) -> RwLockWriteGuard<'_, HashMap<String, Enrollment>> {
        self.enrollments.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ========================================================================
    // TRANSCRIPT
    // ========================================================================

    /// Structured transcript computed from a single snapshot of the enrollments
    pub fn transcript_report(&self) -> Transcript {
        let lines: Vec<TranscriptLine> = self
            .enrollments()
            .iter()
            .map(|e| TranscriptLine {
                course_code: e.course_code().to_string(),
                title: e.course().title().to_string(),
                credits: e.course().credits(),
                grade: e.grade(),
            })
            .collect();

        // u64 so points × credits cannot overflow for any u32 credit weight
        let (points, credits) = lines
            .iter()
            .filter_map(|line| {
                line.grade
                    .map(|g| (u64::from(g.points) * u64::from(line.credits), u64::from(line.credits)))
            })
            .fold((0u64, 0u64), |(p, c), (lp, lc)| {
                (p.saturating_add(lp), c.saturating_add(lc))
            });

        // No graded enrollment → GPA 0.00
        let gpa = if credits == 0 {
            0.0
        } else {
            points as f64 / credits as f64
        };

        Transcript {
            student_name: self.full_name.clone(),
            registration_number: self.registration_number.clone(),
            lines,
            gpa,
        }
    }

    /// Plain-text transcript: header, one line per enrollment, GPA line
    pub fn transcript(&self) -> String {
        self.transcript_report().to_string()
    }
}

// ============================================================================
// TRANSCRIPT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptLine {
    pub course_code: String,
    pub title: String,
    pub credits: u32,
    pub grade: Option<Grade>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub student_name: String,
    pub registration_number: String,
    pub lines: Vec<TranscriptLine>,
    pub gpa: f64,
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Transcript for {}", self.student_name)?;
        for line in &self.lines {
            let grade = line
                .grade
                .map(|g| g.letter.to_string())
                .unwrap_or_else(|| "N/A".to_string());
            writeln!(f, "{} {} -> {}", line.course_code, line.title, grade)?;
        }
        write!(f, "GPA: {:.2}", self.gpa)
    }
}

// ============================================================================
// STUDENT REGISTRY
// ============================================================================

/// In-memory student store keyed by registration number
///
/// The registry generates the internal id; callers only supply the
/// registration number, name and email.
#[derive(Debug, Clone, Default)]
pub struct StudentRegistry {
    students: Arc<RwLock<HashMap<String, Arc<Student>>>>,
}

impl StudentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and store a student (last write wins on a reused registration number)
    pub fn add(&self, registration_number: &str, full_name: &str, email: &str) -> Arc<Student> {
        let student = Arc::new(Student::new(registration_number, full_name, email));
        self.register(Arc::clone(&student));
        student
    }

    /// Create a student only when the registration number is free
    pub fn insert_if_absent(
        &self,
        registration_number: &str,
        full_name: &str,
        email: &str,
    ) -> Option<Arc<Student>> {
        let mut students = self.students.write().unwrap_or_else(PoisonError::into_inner);
        if students.contains_key(registration_number) {
            return None;
        }
        let student = Arc::new(Student::new(registration_number, full_name, email));
        students.insert(registration_number.to_string(), Arc::clone(&student));
        Some(student)
    }

    /// Store an already built student under its registration number
    pub(crate) fn register(&self, student: Arc<Student>) {
        let key = student.registration_number.clone();
        let previous = self
            .students
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.clone(), Arc::clone(&student));

        if let Some(previous) = previous {
            tracing::warn!(
                registration_number = %key,
                replaced_id = %previous.id,
                "replaced existing student"
            );
        } else {
            tracing::debug!(registration_number = %key, id = %student.id, "student added");
        }
    }

    pub fn find_by_registration_number(&self, registration_number: &str) -> Option<Arc<Student>> {
        self.students
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(registration_number)
            .cloned()
    }

    pub fn find_by_id(&self, id: &str) -> Option<Arc<Student>> {
        self.students
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .find(|s| s.id == id)
            .cloned()
    }

    /// Snapshot of every student, ordered by registration number
    pub fn list_all(&self) -> Vec<Arc<Student>> {
        let mut all: Vec<Arc<Student>> = self
            .students
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        all.sort_by(|a, b| a.registration_number.cmp(&b.registration_number));
        all
    }

    pub fn count(&self) -> usize {
        self.students.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn active(&self) -> Vec<Arc<Student>> {
        self.list_all().into_iter().filter(|s| s.is_active()).collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::course::{Course, CourseSpec};
    use crate::grade::Letter;

    fn course(code: &str, title: &str, credits: u32) -> Arc<Course> {
        Arc::new(
            Course::new(CourseSpec {
                title: title.to_string(),
                credits,
                ..CourseSpec::new(code)
            })
            .unwrap(),
        )
    }

    fn graded(student: &Student, course: Arc<Course>, marks: f64) {
        let mut e = Enrollment::new(student.id(), course);
        e.record_marks(marks);
        student.enroll(e);
    }

    #[test]
    fn test_student_creation() {
        let s = Student::new("R001", "Ada Lovelace", "ada@example.edu");

        assert!(!s.id().is_empty());
        assert_eq!(s.registration_number(), "R001");
        assert_eq!(s.full_name(), "Ada Lovelace");
        assert_eq!(s.status(), StudentStatus::Active);
        assert_eq!(s.created_on(), Utc::now().date_naive());
        assert!(s.enrollments().is_empty());
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Student::new("R001", "A", "a@x");
        let b = Student::new("R001", "A", "a@x");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_deactivate_is_idempotent() {
        let s = Student::new("R001", "Ada", "ada@x");
        s.deactivate();
        s.deactivate();

        assert_eq!(s.status(), StudentStatus::Inactive);
        assert_eq!(s.profile(), "Student: Ada (R001) - INACTIVE");
    }

    #[test]
    fn test_enroll_overwrites_same_course() {
        let s = Student::new("R001", "Ada", "ada@x");
        let cs = course("CS101", "Intro", 3);

        s.enroll(Enrollment::new(s.id(), Arc::clone(&cs)));
        graded(&s, cs, 92.0);

        assert_eq!(s.enrollments().len(), 1);
        assert_eq!(s.enrollment("CS101").unwrap().grade().unwrap().letter, Letter::S);
    }

    #[test]
    fn test_unenroll() {
        let s = Student::new("R001", "Ada", "ada@x");
        s.enroll(Enrollment::new(s.id(), course("CS101", "Intro", 3)));

        assert!(s.unenroll("CS101"));
        assert!(!s.unenroll("CS101")); // no-op the second time
        assert!(!s.is_enrolled_in("CS101"));
    }

    #[test]
    fn test_total_credits() {
        let s = Student::new("R001", "Ada", "ada@x");
        s.enroll(Enrollment::new(s.id(), course("CS101", "Intro", 3)));
        s.enroll(Enrollment::new(s.id(), course("MA201", "Calculus", 4)));

        assert_eq!(s.total_credits(), 7);
    }

    #[test]
    fn test_transcript_without_grades_reports_zero_gpa() {
        let s = Student::new("R001", "Ada", "ada@x");
        s.enroll(Enrollment::new(s.id(), course("CS101", "Intro", 3)));

        assert_eq!(
            s.transcript(),
            "Transcript for Ada\nCS101 Intro -> N/A\nGPA: 0.00"
        );
    }

    #[test]
    fn test_transcript_empty_student() {
        let s = Student::new("R001", "Ada", "ada@x");
        assert_eq!(s.transcript(), "Transcript for Ada\nGPA: 0.00");
    }

    #[test]
    fn test_gpa_is_credit_weighted_over_graded_courses() {
        let s = Student::new("R001", "Ada", "ada@x");
        graded(&s, course("CS101", "Intro", 3), 95.0); // S = 10
        graded(&s, course("MA201", "Calculus", 4), 72.0); // B = 8
        s.enroll(Enrollment::new(s.id(), course("PH100", "Physics", 5))); // ungraded

        // (10*3 + 8*4) / 7 = 62 / 7
        let expected = 62.0 / 7.0;
        assert!((s.gpa() - expected).abs() < 1e-9);
        assert_eq!(
            s.transcript(),
            "Transcript for Ada\nCS101 Intro -> S\nMA201 Calculus -> B\nPH100 Physics -> N/A\nGPA: 8.86"
        );
    }

    #[test]
    fn test_gpa_with_huge_credit_weights() {
        let s = Student::new("R001", "Ada", "ada@x");
        graded(&s, course("BIG1", "Huge", u32::MAX), 95.0); // S = 10
        graded(&s, course("BIG2", "Huge", u32::MAX), 85.0); // A = 9

        assert!((s.gpa() - 9.5).abs() < 1e-9);
        assert_eq!(s.total_credits(), u32::MAX);
        assert!(s.transcript().ends_with("GPA: 9.50"));
    }

    #[test]
    fn test_registry_add_generates_id() {
        let registry = StudentRegistry::new();
        let s = registry.add("R001", "Ada", "ada@x");

        let found = registry.find_by_registration_number("R001").unwrap();
        assert_eq!(found.id(), s.id());
        assert!(registry.find_by_id(s.id()).is_some());
        assert!(registry.find_by_registration_number("R999").is_none());
    }

    #[test]
    fn test_registry_reused_registration_number_overwrites() {
        let registry = StudentRegistry::new();
        let first = registry.add("R001", "Ada", "ada@x");
        let second = registry.add("R001", "Grace", "grace@x");

        assert_eq!(registry.count(), 1);
        let found = registry.find_by_registration_number("R001").unwrap();
        assert_eq!(found.id(), second.id());
        assert_ne!(found.id(), first.id());
    }

    #[test]
    fn test_registry_insert_if_absent() {
        let registry = StudentRegistry::new();
        assert!(registry.insert_if_absent("R001", "Ada", "ada@x").is_some());
        assert!(registry.insert_if_absent("R001", "Grace", "grace@x").is_none());

        assert_eq!(
            registry.find_by_registration_number("R001").unwrap().full_name(),
            "Ada"
        );
    }

    #[test]
    fn test_registry_mutations_visible_through_identity() {
        let registry = StudentRegistry::new();
        let s = registry.add("R001", "Ada", "ada@x");
        s.deactivate();

        let listed = registry.list_all();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].status(), StudentStatus::Inactive);
        assert!(registry.active().is_empty());
    }

    #[test]
    fn test_registry_list_all_sorted() {
        let registry = StudentRegistry::new();
        registry.add("R003", "C", "c@x");
        registry.add("R001", "A", "a@x");
        registry.add("R002", "B", "b@x");

        let keys: Vec<String> = registry
            .list_all()
            .iter()
            .map(|s| s.registration_number().to_string())
            .collect();
        assert_eq!(keys, vec!["R001", "R002", "R003"]);
    }
}
