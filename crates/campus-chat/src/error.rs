//! Error types for the conversational core.

use campus_core::error::CampusError;

/// Errors surfaced by the chat orchestrator.
///
/// Oracle failures are not listed here: they are absorbed inside the turn
/// and recorded as an apology reply.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("a turn is already in progress for this conversation")]
    Busy,
    #[error("conversation not found: {0}")]
    ConversationNotFound(uuid::Uuid),
    #[error("state error: {0}")]
    StateError(String),
}

impl From<ChatError> for CampusError {
    fn from(err: ChatError) -> Self {
        CampusError::Api(err.to_string())
    }
}
