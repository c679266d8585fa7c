// Course Registry - Core Library
// Students, courses, enrollments, grading and directory backups.
// Exposes all modules for use in the CLI and in tests.

pub mod backup;
pub mod config;
pub mod enrollment_service;
pub mod entities;
pub mod error;
pub mod grade;
pub mod logging;
pub mod store;

// Re-export commonly used types
pub use backup::BackupService;
pub use config::{snapshot_timestamp, AppConfig};
pub use enrollment_service::{EnrollmentService, DEFAULT_MAX_CREDITS};
pub use entities::{
    Course, CourseRegistry, CourseSpec, Enrollment, Semester, Student, StudentRegistry,
    StudentStatus, Transcript, TranscriptLine,
};
pub use error::{BackupError, CourseError, EnrollmentError, StoreError};
pub use grade::{grade_for, Grade, Letter};
pub use store::{export_snapshot, load_registries, save_registries, setup_database};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
