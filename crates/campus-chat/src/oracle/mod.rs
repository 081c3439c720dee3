//! Intent oracle: the external classify-and-extract service.
//!
//! The dispatch loop only sees the `IntentOracle` trait. `gemini` holds the
//! hosted implementation and `prompt` the instructions sent with each call.

pub mod gemini;
pub mod prompt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use campus_core::types::{Intent, Level, Role, SessionContext, Turn};

use crate::context::ExtractedParams;

/// Errors from an oracle call. All of them mean the oracle is unavailable
/// for this turn.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("oracle API key is not configured")]
    MissingApiKey,
    #[error("oracle request failed: {0}")]
    Transport(String),
    #[error("oracle returned HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("oracle returned no text")]
    EmptyResponse,
}

/// A prior transcript entry as shown to the oracle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
}

impl From<&Turn> for HistoryEntry {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role,
            content: turn.text.clone(),
        }
    }
}

/// Everything the oracle is given for one turn.
#[derive(Clone, Copy, Debug)]
pub struct OracleRequest<'a> {
    /// Raw user text.
    pub user_text: &'a str,
    /// Trailing window of prior turns, oldest first.
    pub history: &'a [HistoryEntry],
    /// Context snapshot taken before this turn.
    pub context: &'a SessionContext,
}

/// The oracle's answer for one turn.
#[derive(Clone, Debug, PartialEq)]
pub struct OracleReply {
    /// Natural-language answer shown to the student.
    pub answer: String,
    pub intent: Intent,
    pub parameters: ExtractedParams,
}

impl OracleReply {
    /// A general chat reply with no extracted parameters.
    pub fn general_chat(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            intent: Intent::GeneralChat,
            parameters: ExtractedParams::default(),
        }
    }

    /// The intent together with only the parameters that intent uses.
    pub fn call(&self) -> IntentCall {
        IntentCall::from_parts(self.intent, &self.parameters)
    }
}

/// Classify free text into an intent and extract parameters.
#[async_trait]
pub trait IntentOracle: Send + Sync {
    async fn classify(&self, request: OracleRequest<'_>) -> Result<OracleReply, OracleError>;
}

/// Stand-in used when no API key is configured. Every call fails, so each
/// turn ends with the apology reply.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnconfiguredOracle;

#[async_trait]
impl IntentOracle for UnconfiguredOracle {
    async fn classify(&self, _request: OracleRequest<'_>) -> Result<OracleReply, OracleError> {
        Err(OracleError::MissingApiKey)
    }
}

/// An oracle intent carrying the parameters relevant to it.
///
/// Values are those extracted on this turn only; the dispatch loop fills
/// gaps from the session context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IntentCall {
    CourseInfo {
        department: Option<String>,
        level: Option<Level>,
    },
    MaterialSearch {
        course_code: Option<String>,
    },
    PastQuestions {
        course_code: Option<String>,
    },
    StudyAdvice {
        level: Option<Level>,
    },
    GeneralChat,
    SetContext,
}

impl IntentCall {
    /// Pair an intent tag with the relevant extracted parameters.
    pub fn from_parts(intent: Intent, params: &ExtractedParams) -> Self {
        let department = params.department().map(str::to_string);
        let level = params.level().cloned();
        let course_code = params.course_code().map(str::to_string);
        match intent {
            Intent::CourseInfo => IntentCall::CourseInfo { department, level },
            Intent::MaterialSearch => IntentCall::MaterialSearch { course_code },
            Intent::PastQuestions => IntentCall::PastQuestions { course_code },
            Intent::StudyAdvice => IntentCall::StudyAdvice { level },
            Intent::GeneralChat => IntentCall::GeneralChat,
            Intent::SetContext => IntentCall::SetContext,
        }
    }

    pub fn intent(&self) -> Intent {
        match self {
            IntentCall::CourseInfo { .. } => Intent::CourseInfo,
            IntentCall::MaterialSearch { .. } => Intent::MaterialSearch,
            IntentCall::PastQuestions { .. } => Intent::PastQuestions,
            IntentCall::StudyAdvice { .. } => Intent::StudyAdvice,
            IntentCall::GeneralChat => Intent::GeneralChat,
            IntentCall::SetContext => Intent::SetContext,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ExtractedParams {
        ExtractedParams {
            department: Some("Computer Engineering".to_string()),
            level: Some(Level::L300),
            course_code: Some("CPE 301".to_string()),
        }
    }

    #[test]
    fn test_call_keeps_only_relevant_parameters() {
        assert_eq!(
            IntentCall::from_parts(Intent::CourseInfo, &params()),
            IntentCall::CourseInfo {
                department: Some("Computer Engineering".to_string()),
                level: Some(Level::L300),
            }
        );
        assert_eq!(
            IntentCall::from_parts(Intent::MaterialSearch, &params()),
            IntentCall::MaterialSearch {
                course_code: Some("CPE 301".to_string())
            }
        );
        assert_eq!(
            IntentCall::from_parts(Intent::StudyAdvice, &params()),
            IntentCall::StudyAdvice {
                level: Some(Level::L300)
            }
        );
        assert_eq!(
            IntentCall::from_parts(Intent::SetContext, &params()),
            IntentCall::SetContext
        );
    }

    #[test]
    fn test_call_drops_blank_parameters() {
        let blank = ExtractedParams {
            course_code: Some("  ".to_string()),
            ..ExtractedParams::default()
        };
        assert_eq!(
            IntentCall::from_parts(Intent::PastQuestions, &blank),
            IntentCall::PastQuestions { course_code: None }
        );
    }

    #[test]
    fn test_call_round_trips_intent() {
        for intent in Intent::ALL {
            assert_eq!(IntentCall::from_parts(intent, &params()).intent(), intent);
        }
    }

    #[test]
    fn test_general_chat_reply() {
        let reply = OracleReply::general_chat("Hi there");
        assert_eq!(reply.intent, Intent::GeneralChat);
        assert!(reply.parameters.is_empty());
        assert_eq!(reply.call(), IntentCall::GeneralChat);
    }

    #[test]
    fn test_history_entry_from_turn() {
        let turn = Turn::user("materials for CPE 301");
        let entry = HistoryEntry::from(&turn);
        assert_eq!(entry.role, Role::User);
        assert_eq!(entry.content, "materials for CPE 301");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["role"], "user");
    }

    #[tokio::test]
    async fn test_unconfigured_oracle_always_fails() {
        let ctx = SessionContext::default();
        let result = UnconfiguredOracle
            .classify(OracleRequest {
                user_text: "hello",
                history: &[],
                context: &ctx,
            })
            .await;
        assert!(matches!(result, Err(OracleError::MissingApiKey)));
    }
}
