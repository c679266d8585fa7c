// 📚 Course Entity - Immutable value keyed by course code
//
// "The code is IDENTITY (never changes), everything else is a value fixed at construction"
//
// Courses are built once from a CourseSpec and shared as Arc<Course> between
// the registry and every enrollment that references them.

use crate::error::CourseError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

// ============================================================================
// SEMESTER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Semester {
    Spring,
    Summer,
    #[default]
    Fall,
}

impl Semester {
    pub fn as_str(&self) -> &'static str {
        match self {
            Semester::Spring => "SPRING",
            Semester::Summer => "SUMMER",
            Semester::Fall => "FALL",
        }
    }

    pub fn parse(s: &str) -> Option<Semester> {
        match s.to_uppercase().as_str() {
            "SPRING" => Some(Semester::Spring),
            "SUMMER" => Some(Semester::Summer),
            "FALL" => Some(Semester::Fall),
            _ => None,
        }
    }
}

// ============================================================================
// COURSE SPEC
// ============================================================================

/// Construction parameters for a Course
///
/// Start from `CourseSpec::new(code)` and override fields with struct update
/// syntax; everything except the code has a default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseSpec {
    pub code: String,
    pub title: String,
    pub credits: u32,
    pub semester: Semester,
    pub department: String,
}

impl CourseSpec {
    pub fn new(code: impl Into<String>) -> Self {
        CourseSpec {
            code: code.into(),
            title: String::new(),
            credits: 3,
            semester: Semester::default(),
            department: String::new(),
        }
    }
}

// ============================================================================
// COURSE ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    code: String,
    title: String,
    credits: u32,
    semester: Semester,
    department: String,
}

impl Course {
    /// Validate the construction parameters and freeze them into a Course
    pub fn new(spec: CourseSpec) -> Result<Course, CourseError> {
        let code = spec.code.trim().to_string();
        if code.is_empty() {
            return Err(CourseError::MissingCode);
        }
        if spec.credits == 0 {
            return Err(CourseError::ZeroCredits { code });
        }

        Ok(Course {
            code,
            title: spec.title,
            credits: spec.credits,
            semester: spec.semester,
            department: spec.department,
        })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn credits(&self) -> u32 {
        self.credits
    }

    pub fn semester(&self) -> Semester {
        self.semester
    }

    pub fn department(&self) -> &str {
        &self.department
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} ({}cr)", self.code, self.title, self.credits)
    }
}

// ============================================================================
// COURSE REGISTRY
// ============================================================================

/// In-memory course catalogue keyed by course code
///
/// Cloning the registry clones the handle, not the catalogue.
#[derive(Debug, Clone, Default)]
pub struct CourseRegistry {
    courses: Arc<RwLock<HashMap<String, Arc<Course>>>>,
}

impl CourseRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace (last write wins)
    pub fn add(&self, course: Course) -> Arc<Course> {
        let course = Arc::new(course);
        let previous = self
            .courses
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(course.code.clone(), Arc::clone(&course));

        if previous.is_some() {
            tracing::warn!(code = %course.code, "replaced existing course");
        } else {
            tracing::debug!(code = %course.code, credits = course.credits, "course added");
        }
        course
    }

    /// Insert only when the code is free; `None` leaves the registry untouched
    pub fn insert_if_absent(&self, course: Course) -> Option<Arc<Course>> {
        let mut courses = self.courses.write().unwrap_or_else(PoisonError::into_inner);
        if courses.contains_key(&course.code) {
            return None;
        }
        let course = Arc::new(course);
        courses.insert(course.code.clone(), Arc::clone(&course));
        Some(course)
    }

    pub fn find_by_code(&self, code: &str) -> Option<Arc<Course>> {
        self.courses
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(code)
            .cloned()
    }

    /// Snapshot of every course, ordered by code
    pub fn list_all(&self) -> Vec<Arc<Course>> {
        let mut all: Vec<Arc<Course>> = self
            .courses
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        all.sort_by(|a, b| a.code.cmp(&b.code));
        all
    }

    pub fn count(&self) -> usize {
        self.courses.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn by_department(&self, department: &str) -> Vec<Arc<Course>> {
        self.list_all()
            .into_iter()
            .filter(|c| c.department == department)
            .collect()
    }

    pub fn by_semester(&self, semester: Semester) -> Vec<Arc<Course>> {
        self.list_all()
            .into_iter()
            .filter(|c| c.semester == semester)
            .collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn course(code: &str, credits: u32) -> Course {
        Course::new(CourseSpec {
            title: format!("{} title", code),
            credits,
            ..CourseSpec::new(code)
        })
        .unwrap()
    }

    #[test]
    fn test_spec_defaults() {
        let c = Course::new(CourseSpec::new("CS101")).unwrap();

        assert_eq!(c.code(), "CS101");
        assert_eq!(c.title(), "");
        assert_eq!(c.credits(), 3);
        assert_eq!(c.semester(), Semester::Fall);
        assert_eq!(c.department(), "");
    }

    #[test]
    fn test_missing_code_rejected() {
        assert_eq!(Course::new(CourseSpec::new("")), Err(CourseError::MissingCode));
        assert_eq!(Course::new(CourseSpec::new("   ")), Err(CourseError::MissingCode));
    }

    #[test]
    fn test_zero_credits_rejected() {
        let result = Course::new(CourseSpec {
            credits: 0,
            ..CourseSpec::new("CS101")
        });
        assert_eq!(
            result,
            Err(CourseError::ZeroCredits {
                code: "CS101".to_string()
            })
        );
    }

    #[test]
    fn test_display() {
        let c = course("MA201", 4);
        assert_eq!(c.to_string(), "MA201 - MA201 title (4cr)");
    }

    #[test]
    fn test_semester_parse() {
        assert_eq!(Semester::parse("spring"), Some(Semester::Spring));
        assert_eq!(Semester::parse("FALL"), Some(Semester::Fall));
        assert_eq!(Semester::parse("winter"), None);
    }

    #[test]
    fn test_registry_add_and_find() {
        let registry = CourseRegistry::new();
        registry.add(course("CS101", 3));

        let found = registry.find_by_code("CS101");
        assert!(found.is_some());
        assert_eq!(found.unwrap().credits(), 3);

        assert!(registry.find_by_code("CS999").is_none());
    }

    #[test]
    fn test_registry_add_overwrites_same_code() {
        let registry = CourseRegistry::new();
        registry.add(course("CS101", 3));
        registry.add(course("CS101", 5));

        assert_eq!(registry.count(), 1);
        assert_eq!(registry.find_by_code("CS101").unwrap().credits(), 5);
    }

    #[test]
    fn test_registry_insert_if_absent_keeps_original() {
        let registry = CourseRegistry::new();
        assert!(registry.insert_if_absent(course("CS101", 3)).is_some());
        assert!(registry.insert_if_absent(course("CS101", 5)).is_none());

        assert_eq!(registry.find_by_code("CS101").unwrap().credits(), 3);
    }

    #[test]
    fn test_registry_list_all_sorted() {
        let registry = CourseRegistry::new();
        registry.add(course("PH100", 3));
        registry.add(course("CS101", 3));
        registry.add(course("MA201", 4));

        let codes: Vec<String> = registry
            .list_all()
            .iter()
            .map(|c| c.code().to_string())
            .collect();
        assert_eq!(codes, vec!["CS101", "MA201", "PH100"]);
    }

    #[test]
    fn test_registry_filters() {
        let registry = CourseRegistry::new();
        registry.add(
            Course::new(CourseSpec {
                department: "CSE".to_string(),
                semester: Semester::Spring,
                ..CourseSpec::new("CS101")
            })
            .unwrap(),
        );
        registry.add(
            Course::new(CourseSpec {
                department: "MATH".to_string(),
                ..CourseSpec::new("MA201")
            })
            .unwrap(),
        );

        assert_eq!(registry.by_department("CSE").len(), 1);
        assert_eq!(registry.by_semester(Semester::Fall).len(), 1);
        assert_eq!(registry.by_semester(Semester::Summer).len(), 0);
    }

    #[test]
    fn test_registry_clone_shares_state() {
        let registry = CourseRegistry::new();
        let handle = registry.clone();
        handle.add(course("CS101", 3));

        assert_eq!(registry.count(), 1);
    }
}
