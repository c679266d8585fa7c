// Entity Models
// "Identity persists, values change"
//
// - Student: UUID identity, registration number lookup key, owns its enrollments
// - Course: immutable value keyed by course code
// - Enrollment: one student in one course, optional grade
//
// Each keyed entity comes with a registry for lookups.

pub mod course;
pub mod enrollment;
pub mod student;

pub use course::{Course, CourseRegistry, CourseSpec, Semester};
pub use enrollment::Enrollment;
pub use student::{Student, StudentRegistry, StudentStatus, Transcript, TranscriptLine};
