use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

// =============================================================================
// Enums
// =============================================================================

/// Academic level of a student or course.
///
/// The five canonical levels parse case-insensitively ("300l" is `L300`).
/// Anything else is kept verbatim in `Other` so that values extracted by the
/// oracle pass through unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Level {
    L100,
    L200,
    L300,
    L400,
    L500,
    /// A level string outside the canonical set.
    Other(String),
}

impl Level {
    /// All canonical levels in ascending order.
    pub const CANONICAL: [Level; 5] = [
        Level::L100,
        Level::L200,
        Level::L300,
        Level::L400,
        Level::L500,
    ];

    /// Returns the display label, e.g. `"300L"`.
    pub fn as_str(&self) -> &str {
        match self {
            Level::L100 => "100L",
            Level::L200 => "200L",
            Level::L300 => "300L",
            Level::L400 => "400L",
            Level::L500 => "500L",
            Level::Other(raw) => raw,
        }
    }

    /// Whether this is one of the five canonical levels.
    pub fn is_canonical(&self) -> bool {
        !matches!(self, Level::Other(_))
    }

    /// Parse a level label. Never fails; unknown labels become `Other`.
    pub fn parse(raw: &str) -> Level {
        match raw.trim().to_ascii_uppercase().as_str() {
            "100L" => Level::L100,
            "200L" => Level::L200,
            "300L" => Level::L300,
            "400L" => Level::L400,
            "500L" => Level::L500,
            _ => Level::Other(raw.to_string()),
        }
    }
}

impl FromStr for Level {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Level::parse(s))
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Level::parse(&raw))
    }
}

/// Intent tag produced by the oracle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    /// Which courses to take for a department/level.
    CourseInfo,
    /// Study materials or notes for a course.
    MaterialSearch,
    /// Previous exam papers for a course.
    PastQuestions,
    /// General guidance for a level.
    StudyAdvice,
    /// Greetings and everything else.
    GeneralChat,
    /// The student stated their level or department.
    SetContext,
}

impl Intent {
    /// All intents, in the order they are described to the oracle.
    pub const ALL: [Intent; 6] = [
        Intent::CourseInfo,
        Intent::MaterialSearch,
        Intent::PastQuestions,
        Intent::StudyAdvice,
        Intent::SetContext,
        Intent::GeneralChat,
    ];

    /// Wire tag, e.g. `"COURSE_INFO"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::CourseInfo => "COURSE_INFO",
            Intent::MaterialSearch => "MATERIAL_SEARCH",
            Intent::PastQuestions => "PAST_QUESTIONS",
            Intent::StudyAdvice => "STUDY_ADVICE",
            Intent::GeneralChat => "GENERAL_CHAT",
            Intent::SetContext => "SET_CONTEXT",
        }
    }

    /// Look up an intent by its wire tag, ignoring case and surrounding whitespace.
    pub fn from_tag(tag: &str) -> Option<Intent> {
        let tag = tag.trim();
        Intent::ALL
            .into_iter()
            .find(|intent| intent.as_str().eq_ignore_ascii_case(tag))
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Speaker of a transcript turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// Format of a study material.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialKind {
    #[serde(rename = "PDF")]
    Pdf,
    Video,
    Notes,
}

impl MaterialKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialKind::Pdf => "PDF",
            MaterialKind::Video => "Video",
            MaterialKind::Notes => "Notes",
        }
    }
}

/// Academic semester of an exam paper.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Semester {
    First,
    Second,
}

impl Semester {
    pub fn as_str(&self) -> &'static str {
        match self {
            Semester::First => "First",
            Semester::Second => "Second",
        }
    }
}

// =============================================================================
// Catalog records
// =============================================================================

/// A course offered by a department.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub code: String,
    pub title: String,
    pub units: u32,
    pub level: Level,
    pub department: String,
    pub description: String,
}

/// A downloadable study resource for a course.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyMaterial {
    pub id: String,
    pub course_code: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: MaterialKind,
    pub url: String,
}

/// A past examination paper for a course.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PastQuestion {
    pub id: String,
    pub course_code: String,
    pub year: u16,
    pub semester: Semester,
    pub url: String,
}

// =============================================================================
// Conversation state
// =============================================================================

/// Running memory of what the student has told us so far.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_course_code: Option<String>,
}

impl SessionContext {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.department.is_none() && self.level.is_none() && self.last_course_code.is_none()
    }
}

/// Structured catalog results attached to an assistant turn.
///
/// The list inside is never empty; use the constructors, which return `None`
/// for an empty result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum AttachedData {
    Courses(Vec<Course>),
    Materials(Vec<StudyMaterial>),
    PastQuestions(Vec<PastQuestion>),
}

impl AttachedData {
    pub fn courses(items: Vec<Course>) -> Option<Self> {
        (!items.is_empty()).then_some(AttachedData::Courses(items))
    }

    pub fn materials(items: Vec<StudyMaterial>) -> Option<Self> {
        (!items.is_empty()).then_some(AttachedData::Materials(items))
    }

    pub fn past_questions(items: Vec<PastQuestion>) -> Option<Self> {
        (!items.is_empty()).then_some(AttachedData::PastQuestions(items))
    }

    /// Number of attached records.
    pub fn len(&self) -> usize {
        match self {
            AttachedData::Courses(items) => items.len(),
            AttachedData::Materials(items) => items.len(),
            AttachedData::PastQuestions(items) => items.len(),
        }
    }

    /// Always false for values built through the constructors.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One message in a conversation transcript. Immutable once created.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Turn {
    pub id: Uuid,
    pub role: Role,
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attached_data: Option<AttachedData>,
}

impl Turn {
    /// A user turn stamped with the current time.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: Role::User,
            text: text.into(),
            created_at: Utc::now(),
            intent: None,
            attached_data: None,
        }
    }

    /// An assistant turn with no intent or attachment.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: Role::Assistant,
            text: text.into(),
            created_at: Utc::now(),
            intent: None,
            attached_data: None,
        }
    }

    pub fn with_intent(mut self, intent: Intent) -> Self {
        self.intent = Some(intent);
        self
    }

    pub fn with_attached(mut self, data: Option<AttachedData>) -> Self {
        self.attached_data = data;
        self
    }
}
