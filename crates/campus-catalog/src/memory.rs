//! In-memory catalog backed by a `CatalogData` record set.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use campus_core::config::CatalogConfig;
use campus_core::error::Result;
use campus_core::types::{Course, Level, PastQuestion, StudyMaterial};

use crate::advice;
use crate::dataset::CatalogData;
use crate::store::{course_code_matches, department_matches, CatalogStore};

/// Read-only catalog held entirely in memory.
pub struct InMemoryCatalog {
    data: CatalogData,
    latency: Duration,
}

impl InMemoryCatalog {
    /// Create a catalog over the given records.
    pub fn new(data: CatalogData) -> Self {
        Self {
            data,
            latency: Duration::ZERO,
        }
    }

    /// Create a catalog over the built-in seed dataset.
    pub fn seeded() -> Self {
        Self::new(CatalogData::seed())
    }

    /// Build from configuration: the dataset file if one is set, otherwise
    /// the seed data, with the configured simulated latency.
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        let data = match config.data_path.as_deref() {
            Some(path) => CatalogData::load(Path::new(path))?,
            None => CatalogData::seed(),
        };
        Ok(Self::new(data).with_latency(Duration::from_millis(config.simulated_latency_ms)))
    }

    /// Delay every query by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn all_courses(&self) -> &[Course] {
        &self.data.courses
    }

    pub fn all_materials(&self) -> &[StudyMaterial] {
        &self.data.materials
    }

    pub fn all_past_questions(&self) -> &[PastQuestion] {
        &self.data.past_questions
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::seeded()
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn courses_by(&self, department: Option<&str>, level: Option<&Level>) -> Vec<Course> {
        self.simulate_latency().await;
        let courses: Vec<Course> = self
            .data
            .courses
            .iter()
            .filter(|c| department.map_or(true, |d| department_matches(&c.department, d)))
            .filter(|c| level.map_or(true, |l| &c.level == l))
            .cloned()
            .collect();
        debug!(?department, ?level, results = courses.len(), "Course query");
        courses
    }

    async fn materials_for(&self, course_code: &str) -> Vec<StudyMaterial> {
        self.simulate_latency().await;
        let materials: Vec<StudyMaterial> = self
            .data
            .materials
            .iter()
            .filter(|m| course_code_matches(&m.course_code, course_code))
            .cloned()
            .collect();
        debug!(course_code, results = materials.len(), "Material query");
        materials
    }

    async fn past_questions_for(&self, course_code: &str) -> Vec<PastQuestion> {
        self.simulate_latency().await;
        let papers: Vec<PastQuestion> = self
            .data
            .past_questions
            .iter()
            .filter(|p| course_code_matches(&p.course_code, course_code))
            .cloned()
            .collect();
        debug!(course_code, results = papers.len(), "Past question query");
        papers
    }

    async fn advice_for(&self, level: &Level) -> String {
        self.simulate_latency().await;
        advice::advice_for(level).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use campus_core::error::CampusError;
    use campus_core::types::Semester;

    #[tokio::test]
    async fn test_courses_by_department_substring() {
        let catalog = InMemoryCatalog::seeded();
        let courses = catalog.courses_by(Some("computer"), None).await;
        assert_eq!(courses.len(), 3);
        assert!(courses.iter().all(|c| c.department == "Computer Engineering"));
    }

    #[tokio::test]
    async fn test_courses_by_department_and_level() {
        let catalog = InMemoryCatalog::seeded();
        let courses = catalog
            .courses_by(Some("Computer Engineering"), Some(&Level::L300))
            .await;
        let codes: Vec<&str> = courses.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["CPE 301", "CPE 302"]);
    }

    #[tokio::test]
    async fn test_courses_by_level_only() {
        let catalog = InMemoryCatalog::seeded();
        let courses = catalog.courses_by(None, Some(&Level::L100)).await;
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].code, "MTH 101");
    }

    #[tokio::test]
    async fn test_courses_engineering_matches_every_department() {
        let catalog = InMemoryCatalog::seeded();
        let courses = catalog.courses_by(Some("Engineering"), None).await;
        assert_eq!(courses.len(), 5);
    }

    #[tokio::test]
    async fn test_courses_unknown_department_is_empty() {
        let catalog = InMemoryCatalog::seeded();
        assert!(catalog.courses_by(Some("Mechanical"), None).await.is_empty());
    }

    #[tokio::test]
    async fn test_courses_unknown_level_is_empty() {
        let catalog = InMemoryCatalog::seeded();
        let level = Level::parse("Year 3");
        assert!(catalog.courses_by(None, Some(&level)).await.is_empty());
    }

    #[tokio::test]
    async fn test_courses_no_filters_returns_all() {
        let catalog = InMemoryCatalog::seeded();
        assert_eq!(catalog.courses_by(None, None).await.len(), 5);
    }

    #[tokio::test]
    async fn test_materials_for_matching_code() {
        let catalog = InMemoryCatalog::seeded();
        let materials = catalog.materials_for("CPE 301").await;
        assert_eq!(materials.len(), 1);
        assert_eq!(materials[0].id, "m1");
    }

    #[tokio::test]
    async fn test_materials_for_lowercase_code() {
        let catalog = InMemoryCatalog::seeded();
        assert_eq!(catalog.materials_for("cpe 302").await.len(), 1);
    }

    #[tokio::test]
    async fn test_materials_for_unknown_code_is_empty() {
        let catalog = InMemoryCatalog::seeded();
        assert!(catalog.materials_for("CPE 999").await.is_empty());
    }

    #[tokio::test]
    async fn test_past_questions_for_code() {
        let catalog = InMemoryCatalog::seeded();
        let papers = catalog.past_questions_for("CPE 409").await;
        assert_eq!(papers.len(), 2);
        assert!(papers.iter().all(|p| p.semester == Semester::First));
        assert!(catalog.past_questions_for("CPE 302").await.is_empty());
    }

    #[tokio::test]
    async fn test_advice_for_levels() {
        let catalog = InMemoryCatalog::seeded();
        assert!(catalog.advice_for(&Level::L500).await.contains("Project"));
        assert_eq!(
            catalog.advice_for(&Level::parse("900L")).await,
            advice::GENERIC_ADVICE
        );
    }

    #[tokio::test]
    async fn test_simulated_latency_applies() {
        let catalog = InMemoryCatalog::seeded().with_latency(Duration::from_millis(20));
        let start = std::time::Instant::now();
        catalog.materials_for("CPE 301").await;
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_from_config_defaults_to_seed() {
        let catalog = InMemoryCatalog::from_config(&CatalogConfig::default()).unwrap();
        assert_eq!(catalog.all_courses().len(), 5);
        assert_eq!(catalog.all_materials().len(), 3);
        assert_eq!(catalog.all_past_questions().len(), 3);
    }

    #[test]
    fn test_from_config_with_dataset_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"
[[past_questions]]
id = "p1"
courseCode = "GST 101"
year = 2020
semester = "Second"
url = "https://example.edu/gst101.pdf"
"#,
        )
        .unwrap();
        let config = CatalogConfig {
            data_path: Some(file.path().to_string_lossy().to_string()),
            simulated_latency_ms: 0,
        };
        let catalog = InMemoryCatalog::from_config(&config).unwrap();
        assert!(catalog.all_courses().is_empty());
        assert_eq!(catalog.all_past_questions().len(), 1);
    }

    #[test]
    fn test_from_config_missing_dataset_fails() {
        let config = CatalogConfig {
            data_path: Some("/nonexistent/catalog.toml".to_string()),
            simulated_latency_ms: 0,
        };
        let result = InMemoryCatalog::from_config(&config);
        assert!(matches!(result, Err(CampusError::Catalog(_))));
    }
}
