// 📝 Enrollment - binds one student to one course
//
// Owned by the student's per-course map, references the course via Arc.
// Only EnrollmentService creates these.

use crate::entities::course::Course;
use crate::grade::{grade_for, Grade};
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct Enrollment {
    /// Internal id of the owning student
    student_id: String,
    course: Arc<Course>,
    grade: Option<Grade>,
    enrolled_at: DateTime<Utc>,
}

impl Enrollment {
    pub(crate) fn new(student_id: &str, course: Arc<Course>) -> Self {
        Enrollment {
            student_id: student_id.to_string(),
            course,
            grade: None,
            enrolled_at: Utc::now(),
        }
    }

    /// Rebuild a stored enrollment
    pub(crate) fn restore(
        student_id: &str,
        course: Arc<Course>,
        grade: Option<Grade>,
        enrolled_at: DateTime<Utc>,
    ) -> Self {
        Enrollment {
            student_id: student_id.to_string(),
            course,
            grade,
            enrolled_at,
        }
    }

    pub fn student_id(&self) -> &str {
        &self.student_id
    }

    pub fn course(&self) -> &Arc<Course> {
        &self.course
    }

    pub fn course_code(&self) -> &str {
        self.course.code()
    }

    pub fn grade(&self) -> Option<Grade> {
        self.grade
    }

    pub fn enrolled_at(&self) -> DateTime<Utc> {
        self.enrolled_at
    }

    /// Overwrite the grade from a fresh marks value
    pub(crate) fn record_marks(&mut self, marks: f64) {
        self.grade = Some(grade_for(marks));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::course::CourseSpec;
    use crate::grade::Letter;

    #[test]
    fn test_new_enrollment_has_no_grade() {
        let course = Arc::new(Course::new(CourseSpec::new("CS101")).unwrap());
        let e = Enrollment::new("student-1", course);

        assert_eq!(e.student_id(), "student-1");
        assert_eq!(e.course_code(), "CS101");
        assert!(e.grade().is_none());
    }

    #[test]
    fn test_resubmitted_marks_overwrite() {
        let course = Arc::new(Course::new(CourseSpec::new("CS101")).unwrap());
        let mut e = Enrollment::new("student-1", course);

        e.record_marks(95.0);
        assert_eq!(e.grade().unwrap().letter, Letter::S);

        e.record_marks(55.0);
        assert_eq!(e.grade().unwrap().letter, Letter::D);
    }
}
