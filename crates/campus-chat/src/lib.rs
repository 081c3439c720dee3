//! Conversational core of the campus assistant.
//!
//! Wires the intent oracle, the session context reducer and the catalog
//! store into a per-conversation dispatch loop.

pub mod context;
pub mod conversation;
pub mod error;
pub mod oracle;
pub mod orchestrator;
pub mod parser;
pub mod response;

pub use context::{reduce, ExtractedParams};
pub use conversation::{Conversation, ConversationState, ConversationSummary};
pub use error::ChatError;
pub use oracle::gemini::GeminiOracle;
pub use oracle::{
    HistoryEntry, IntentCall, IntentOracle, OracleError, OracleReply, OracleRequest,
    UnconfiguredOracle,
};
pub use orchestrator::{ChatOrchestrator, TurnOutcome, TurnStatus};
