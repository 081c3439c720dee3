//! Catalog records: the built-in seed set and TOML dataset loading.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use campus_core::error::{CampusError, Result};
use campus_core::types::{Course, Level, MaterialKind, PastQuestion, Semester, StudyMaterial};

/// The full record set backing an in-memory catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogData {
    pub courses: Vec<Course>,
    pub materials: Vec<StudyMaterial>,
    pub past_questions: Vec<PastQuestion>,
}

impl CatalogData {
    /// Load a dataset from a TOML file with `[[courses]]`, `[[materials]]`
    /// and `[[past_questions]]` tables.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CampusError::Catalog(format!("cannot read {}: {}", path.display(), e))
        })?;
        let data: CatalogData = toml::from_str(&content)
            .map_err(|e| CampusError::Catalog(format!("invalid dataset {}: {}", path.display(), e)))?;
        info!(
            path = %path.display(),
            courses = data.courses.len(),
            materials = data.materials.len(),
            past_questions = data.past_questions.len(),
            "Catalog dataset loaded"
        );
        Ok(data)
    }

    /// The built-in prototype dataset.
    pub fn seed() -> Self {
        Self {
            courses: vec![
                course(
                    "1",
                    "CPE 301",
                    "Signals and Systems",
                    3,
                    Level::L300,
                    "Computer Engineering",
                    "Introduction to continuous and discrete time signals.",
                ),
                course(
                    "2",
                    "CPE 302",
                    "Digital System Design",
                    3,
                    Level::L300,
                    "Computer Engineering",
                    "Design of complex digital circuits using VHDL.",
                ),
                course(
                    "3",
                    "CPE 409",
                    "Computer Architecture",
                    4,
                    Level::L400,
                    "Computer Engineering",
                    "Deep dive into CPU design and memory hierarchy.",
                ),
                course(
                    "4",
                    "MTH 101",
                    "Elementary Mathematics I",
                    3,
                    Level::L100,
                    "All Engineering",
                    "Calculus and algebra fundamentals.",
                ),
                course(
                    "5",
                    "EEE 201",
                    "Applied Electricity",
                    3,
                    Level::L200,
                    "Electrical Engineering",
                    "Basic circuit theory and applications.",
                ),
            ],
            materials: vec![
                material("m1", "CPE 301", "Signals & Systems Lecture Note", MaterialKind::Pdf),
                material("m2", "CPE 302", "VHDL Design Basics Video", MaterialKind::Video),
                material("m3", "MTH 101", "Calculus Simplified", MaterialKind::Notes),
            ],
            past_questions: vec![
                past_question("pq1", "CPE 409", 2022, Semester::First),
                past_question("pq2", "CPE 409", 2021, Semester::First),
                past_question("pq3", "CPE 301", 2023, Semester::Second),
            ],
        }
    }
}

fn course(
    id: &str,
    code: &str,
    title: &str,
    units: u32,
    level: Level,
    department: &str,
    description: &str,
) -> Course {
    Course {
        id: id.to_string(),
        code: code.to_string(),
        title: title.to_string(),
        units,
        level,
        department: department.to_string(),
        description: description.to_string(),
    }
}

fn material(id: &str, course_code: &str, title: &str, kind: MaterialKind) -> StudyMaterial {
    StudyMaterial {
        id: id.to_string(),
        course_code: course_code.to_string(),
        title: title.to_string(),
        kind,
        url: "#".to_string(),
    }
}

fn past_question(id: &str, course_code: &str, year: u16, semester: Semester) -> PastQuestion {
    PastQuestion {
        id: id.to_string(),
        course_code: course_code.to_string(),
        year,
        semester,
        url: "#".to_string(),
    }
}
