//! The `CatalogStore` trait consumed by the dispatch loop.

use async_trait::async_trait;

use campus_core::types::{Course, Level, PastQuestion, StudyMaterial};

/// Read-only academic catalog.
///
/// Queries never fail: no match is an empty list, and an unrecognized level
/// still gets generic advice.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Courses filtered by department (case-insensitive substring) and level
    /// (exact). A `None` filter matches everything.
    async fn courses_by(&self, department: Option<&str>, level: Option<&Level>) -> Vec<Course>;

    /// Study materials for a course code.
    async fn materials_for(&self, course_code: &str) -> Vec<StudyMaterial>;

    /// Past examination papers for a course code.
    async fn past_questions_for(&self, course_code: &str) -> Vec<PastQuestion>;

    /// Study advice for a level.
    async fn advice_for(&self, level: &Level) -> String;
}

/// Whether a department name matches a query fragment.
pub(crate) fn department_matches(department: &str, query: &str) -> bool {
    department
        .to_lowercase()
        .contains(&query.trim().to_lowercase())
}

/// Whether two course codes are the same, ignoring ASCII case and padding.
pub(crate) fn course_code_matches(code: &str, query: &str) -> bool {
    code.trim().eq_ignore_ascii_case(query.trim())
}
