//! Chat orchestrator: the per-turn dispatch loop.
//!
//! Owns the conversation registry, calls the oracle, folds extracted
//! parameters into the session context, runs at most one catalog query per
//! turn and records both turns in the transcript.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use uuid::Uuid;

use campus_catalog::CatalogStore;
use campus_core::config::ChatConfig;
use campus_core::types::{AttachedData, SessionContext, Turn};

use crate::context;
use crate::conversation::{Conversation, ConversationSummary};
use crate::error::ChatError;
use crate::oracle::{IntentCall, IntentOracle, OracleRequest};
use crate::response;

/// How a turn ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnStatus {
    /// The oracle answered.
    Answered,
    /// The oracle was unavailable; an apology was recorded.
    OracleFailed,
}

/// Result of one handled message.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnOutcome {
    /// The assistant turn appended to the transcript.
    pub reply: Turn,
    /// Session context after the turn.
    pub context: SessionContext,
    pub status: TurnStatus,
}

/// Catalog result for one turn: attached records or a note to append.
#[derive(Debug, Default)]
struct Fetched {
    data: Option<AttachedData>,
    note: Option<String>,
}

impl Fetched {
    fn attach(data: Option<AttachedData>, empty_note: impl FnOnce() -> String) -> Self {
        match data {
            Some(data) => Self {
                data: Some(data),
                note: None,
            },
            None => Self {
                data: None,
                note: Some(empty_note()),
            },
        }
    }
}

/// Central coordinator for all conversations.
pub struct ChatOrchestrator {
    dispatcher: Arc<Dispatcher>,
    conversations: Mutex<HashMap<Uuid, Arc<Conversation>>>,
}

/// Oracle, catalog and settings shared by every turn task.
struct Dispatcher {
    oracle: Arc<dyn IntentOracle>,
    catalog: Arc<dyn CatalogStore>,
    config: ChatConfig,
}

impl ChatOrchestrator {
    pub fn new(
        oracle: Arc<dyn IntentOracle>,
        catalog: Arc<dyn CatalogStore>,
        config: ChatConfig,
    ) -> Self {
        Self {
            dispatcher: Arc::new(Dispatcher {
                oracle,
                catalog,
                config,
            }),
            conversations: Mutex::new(HashMap::new()),
        }
    }

    /// Start a conversation and return its id.
    pub fn start_conversation(&self) -> Result<Uuid, ChatError> {
        let conversation = Arc::new(Conversation::new(self.dispatcher.config.greeting.clone()));
        let id = conversation.id();
        self.registry()?.insert(id, conversation);
        tracing::info!(conversation_id = %id, "Conversation started");
        Ok(id)
    }

    /// Handle one user message in a conversation.
    ///
    /// Empty, over-long and concurrent messages are rejected before anything
    /// is recorded. Oracle failures do not surface as errors: the turn ends
    /// with an apology and `TurnStatus::OracleFailed`.
    ///
    /// The turn runs on its own task. Once the user turn is recorded, the
    /// assistant reply is recorded too, even if the caller stops waiting.
    pub async fn handle_message(
        &self,
        conversation_id: Uuid,
        message: &str,
    ) -> Result<TurnOutcome, ChatError> {
        let conversation = self.get(conversation_id)?;
        self.dispatcher.validate(message)?;

        let dispatcher = Arc::clone(&self.dispatcher);
        let message = message.to_string();
        tokio::spawn(async move { dispatcher.run_turn(&conversation, &message).await })
            .await
            .map_err(|e| ChatError::StateError(format!("turn task failed: {}", e)))?
    }

    /// Ordered transcript of a conversation.
    pub fn transcript(&self, conversation_id: Uuid) -> Result<Vec<Turn>, ChatError> {
        Ok(self.get(conversation_id)?.snapshot()?.transcript)
    }

    /// Current session context of a conversation.
    pub fn context(&self, conversation_id: Uuid) -> Result<SessionContext, ChatError> {
        Ok(self.get(conversation_id)?.snapshot()?.context)
    }

    /// Reset a conversation to the greeting and an empty context.
    pub fn reset(&self, conversation_id: Uuid) -> Result<(), ChatError> {
        self.get(conversation_id)?.reset()?;
        tracing::info!(conversation_id = %conversation_id, "Conversation reset");
        Ok(())
    }

    /// Drop a conversation.
    pub fn delete_conversation(&self, conversation_id: Uuid) -> Result<(), ChatError> {
        self.registry()?
            .remove(&conversation_id)
            .map(|_| ())
            .ok_or(ChatError::ConversationNotFound(conversation_id))
    }

    /// Summaries of all conversations, oldest first.
    pub fn list_conversations(&self) -> Result<Vec<ConversationSummary>, ChatError> {
        let conversations: Vec<Arc<Conversation>> = self.registry()?.values().cloned().collect();
        let mut summaries = conversations
            .iter()
            .map(|c| c.summary())
            .collect::<Result<Vec<_>, _>>()?;
        summaries.sort_by_key(|s| s.started_at);
        Ok(summaries)
    }

    pub fn conversation_count(&self) -> Result<usize, ChatError> {
        Ok(self.registry()?.len())
    }

    // -- Private helpers --

    fn registry(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<Uuid, Arc<Conversation>>>, ChatError> {
        self.conversations
            .lock()
            .map_err(|e| ChatError::StateError(format!("conversation registry poisoned: {}", e)))
    }

    fn get(&self, conversation_id: Uuid) -> Result<Arc<Conversation>, ChatError> {
        self.registry()?
            .get(&conversation_id)
            .cloned()
            .ok_or(ChatError::ConversationNotFound(conversation_id))
    }
}

impl Dispatcher {
    fn validate(&self, message: &str) -> Result<(), ChatError> {
        if message.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if message.chars().count() > self.config.max_message_length {
            return Err(ChatError::MessageTooLong(self.config.max_message_length));
        }
        Ok(())
    }

    async fn run_turn(
        &self,
        conversation: &Conversation,
        message: &str,
    ) -> Result<TurnOutcome, ChatError> {
        let _turn = conversation.begin_turn()?;
        let conversation_id = conversation.id();

        // History is taken before the user turn is recorded.
        let (history, previous) = conversation.with_state(|state| {
            let history = state.history_window(self.config.history_window);
            state.transcript.push(Turn::user(message));
            (history, state.context.clone())
        })?;

        let request = OracleRequest {
            user_text: message,
            history: &history,
            context: &previous,
        };

        let reply = match self.oracle.classify(request).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(conversation_id = %conversation_id, error = %e, "Oracle unavailable");
                let apology = Turn::assistant(self.config.apology.clone());
                conversation.with_state(|state| state.transcript.push(apology.clone()))?;
                return Ok(TurnOutcome {
                    reply: apology,
                    context: previous,
                    status: TurnStatus::OracleFailed,
                });
            }
        };

        let updated = context::reduce(&previous, &reply.parameters);
        let fetched = self.fetch(&reply.call(), &previous).await;
        let text = response::compose(&reply.answer, fetched.note.as_deref());

        tracing::info!(
            conversation_id = %conversation_id,
            intent = %reply.intent,
            results = fetched.data.as_ref().map_or(0, AttachedData::len),
            "Turn completed"
        );

        let turn = Turn::assistant(text)
            .with_intent(reply.intent)
            .with_attached(fetched.data);
        conversation.with_state(|state| {
            state.context = updated.clone();
            state.transcript.push(turn.clone());
        })?;

        Ok(TurnOutcome {
            reply: turn,
            context: updated,
            status: TurnStatus::Answered,
        })
    }

    /// Run the catalog query for an intent, if its parameters are available.
    ///
    /// Each required parameter prefers the value extracted this turn and
    /// falls back to the context from before the turn.
    async fn fetch(&self, call: &IntentCall, previous: &SessionContext) -> Fetched {
        match call {
            IntentCall::CourseInfo { department, level } => {
                let department = department.as_deref().or(previous.department.as_deref());
                let level = level.as_ref().or(previous.level.as_ref());
                if department.is_none() && level.is_none() {
                    return Fetched::default();
                }
                let courses = self.catalog.courses_by(department, level).await;
                Fetched::attach(AttachedData::courses(courses), || {
                    response::NO_COURSES.to_string()
                })
            }
            IntentCall::MaterialSearch { course_code } => {
                let Some(code) = course_code
                    .as_deref()
                    .or(previous.last_course_code.as_deref())
                else {
                    return Fetched::default();
                };
                let materials = self.catalog.materials_for(code).await;
                Fetched::attach(AttachedData::materials(materials), || {
                    response::no_materials(code)
                })
            }
            IntentCall::PastQuestions { course_code } => {
                let Some(code) = course_code
                    .as_deref()
                    .or(previous.last_course_code.as_deref())
                else {
                    return Fetched::default();
                };
                let papers = self.catalog.past_questions_for(code).await;
                Fetched::attach(AttachedData::past_questions(papers), || {
                    response::no_past_questions(code)
                })
            }
            IntentCall::StudyAdvice { level } => {
                let Some(level) = level.as_ref().or(previous.level.as_ref()) else {
                    return Fetched::default();
                };
                let advice = self.catalog.advice_for(level).await;
                Fetched {
                    data: None,
                    note: Some(response::advice_note(level, &advice)),
                }
            }
            IntentCall::GeneralChat | IntentCall::SetContext => Fetched::default(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
