// ⚠️ Error taxonomy
// Business-rule violations, course validation, backup I/O and store failures.
//
// Lookups never fail: "no such student/course" is an Option, not an error.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// ENROLLMENT ERRORS
// ============================================================================

/// Rejections raised by `EnrollmentService::enroll`
///
/// Both are recoverable: the caller picks another course or drops one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnrollmentError {
    #[error("student {registration_number} is already enrolled in {course_code}")]
    DuplicateEnrollment {
        registration_number: String,
        course_code: String,
    },

    #[error(
        "enrolling {registration_number} in {course_code} exceeds the credit limit \
         ({current_credits} held + {requested_credits} requested > {max_credits})"
    )]
    CreditLimitExceeded {
        registration_number: String,
        course_code: String,
        current_credits: u32,
        requested_credits: u32,
        max_credits: u32,
    },
}

// ============================================================================
// COURSE ERRORS
// ============================================================================

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CourseError {
    #[error("course code must not be empty")]
    MissingCode,

    #[error("course {code} must carry at least one credit")]
    ZeroCredits { code: String },
}

// ============================================================================
// BACKUP ERRORS
// ============================================================================

/// I/O failures while snapshotting a directory tree
///
/// Every variant names the path(s) involved. A failure aborts the walk and
/// leaves whatever was already copied in place.
#[derive(Error, Debug)]
pub enum BackupError {
    #[error("backup source {} is not a directory", .path.display())]
    SourceNotDirectory { path: PathBuf },

    #[error("failed to create backup directory {}: {source}", .path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk {}: {source}", .root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to copy {} to {}: {source}", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ============================================================================
// STORE ERRORS
// ============================================================================

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt stored value in {column}: {value}")]
    CorruptValue { column: &'static str, value: String },

    #[error(transparent)]
    InvalidCourse(#[from] CourseError),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
