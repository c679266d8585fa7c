// 🧾 Enrollment Service - business rules across students and courses
//
// Rules enforced on enroll:
// 1. No duplicate enrollment in the same course code
// 2. Total enrolled credits never exceed the configured ceiling
//
// Both checks and the insertion run while holding the student's enrollment
// map exclusively, so concurrent enrolls for one student are serialized.

use crate::entities::{Course, Enrollment, Student};
use crate::error::EnrollmentError;
use std::sync::Arc;

/// Default ceiling on the credits a student may hold at once
pub const DEFAULT_MAX_CREDITS: u32 = 18;

#[derive(Debug, Clone)]
pub struct EnrollmentService {
    max_credits: u32,
}

impl EnrollmentService {
    pub fn new(max_credits: u32) -> Self {
        EnrollmentService { max_credits }
    }

    pub fn max_credits(&self) -> u32 {
        self.max_credits
    }

    /// Enroll a student in a course, returning a snapshot of the new enrollment
    pub fn enroll(
        &self,
        student: &Student,
        course: &Arc<Course>,
    ) -> Result<Enrollment, EnrollmentError> {
        let mut enrollments = student.enrollments_mut();

        if enrollments.contains_key(course.code()) {
            tracing::warn!(
                registration_number = student.registration_number(),
                course = course.code(),
                "duplicate enrollment rejected"
            );
            return Err(EnrollmentError::DuplicateEnrollment {
                registration_number: student.registration_number().to_string(),
                course_code: course.code().to_string(),
            });
        }

        let current_credits = enrollments
            .values()
            .fold(0u32, |total, e| total.saturating_add(e.course().credits()));
        // An overflowing total is over any ceiling
        let exceeds = current_credits
            .checked_add(course.credits())
            .map_or(true, |total| total > self.max_credits);
        if exceeds {
            tracing::warn!(
                registration_number = student.registration_number(),
                course = course.code(),
                current_credits,
                requested = course.credits(),
                max = self.max_credits,
                "credit limit exceeded"
            );
            return Err(EnrollmentError::CreditLimitExceeded {
                registration_number: student.registration_number().to_string(),
                course_code: course.code().to_string(),
                current_credits,
                requested_credits: course.credits(),
                max_credits: self.max_credits,
            });
        }

        let enrollment = Enrollment::new(student.id(), Arc::clone(course));
        enrollments.insert(course.code().to_string(), enrollment.clone());

        tracing::debug!(
            registration_number = student.registration_number(),
            course = course.code(),
            total_credits = current_credits.saturating_add(course.credits()),
            "enrolled"
        );
        Ok(enrollment)
    }

    /// Grade an existing enrollment; silently ignored when there is none
    pub fn record_marks(&self, student: &Student, course: &Course, marks: f64) {
        let mut enrollments = student.enrollments_mut();
        match enrollments.get_mut(course.code()) {
            Some(enrollment) => {
                enrollment.record_marks(marks);
                tracing::debug!(
                    registration_number = student.registration_number(),
                    course = course.code(),
                    marks,
                    grade = ?enrollment.grade(),
                    "marks recorded"
                );
            }
            None => {
                tracing::debug!(
                    registration_number = student.registration_number(),
                    course = course.code(),
                    "marks ignored: not enrolled"
                );
            }
        }
    }

    /// Drop a student's enrollment in a course; false when there was none
    pub fn unenroll(&self, student: &Student, course: &Course) -> bool {
        let removed = student.unenroll(course.code());
        tracing::debug!(
            registration_number = student.registration_number(),
            course = course.code(),
            removed,
            "unenroll"
        );
        removed
    }
}

impl Default for EnrollmentService {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CREDITS)
    }
}

// ============================================================================
// TESTS
// ============================================================================
