//! Per-conversation state: transcript, session context and busy flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use campus_core::types::{SessionContext, Turn};

use crate::context;
use crate::error::ChatError;
use crate::oracle::HistoryEntry;

/// Mutable state of one conversation.
#[derive(Clone, Debug, PartialEq)]
pub struct ConversationState {
    pub context: SessionContext,
    /// Insertion-ordered turns; always starts with the greeting.
    pub transcript: Vec<Turn>,
}

impl ConversationState {
    /// A fresh state: empty context and the greeting turn.
    pub fn new(greeting: &str) -> Self {
        Self {
            context: context::reset(),
            transcript: vec![Turn::assistant(greeting)],
        }
    }

    /// The last `window` turns, oldest first, as shown to the oracle.
    pub fn history_window(&self, window: usize) -> Vec<HistoryEntry> {
        let start = self.transcript.len().saturating_sub(window);
        self.transcript[start..].iter().map(HistoryEntry::from).collect()
    }
}

/// Summary of a conversation for listings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub turn_count: usize,
    pub busy: bool,
    pub context: SessionContext,
}

/// One conversation: its state plus the single in-flight turn flag.
pub struct Conversation {
    id: Uuid,
    started_at: DateTime<Utc>,
    greeting: String,
    state: Mutex<ConversationState>,
    busy: AtomicBool,
}

impl Conversation {
    pub fn new(greeting: impl Into<String>) -> Self {
        let greeting = greeting.into();
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            state: Mutex::new(ConversationState::new(&greeting)),
            greeting,
            busy: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Whether a turn is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Claim the conversation for one turn.
    ///
    /// Fails with `Busy` while another turn holds it. The claim is released
    /// when the returned guard drops.
    pub fn begin_turn(&self) -> Result<TurnGuard<'_>, ChatError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ChatError::Busy)?;
        Ok(TurnGuard { busy: &self.busy })
    }

    /// Run `f` with the state locked. Never hold the lock across an await.
    pub fn with_state<T>(
        &self,
        f: impl FnOnce(&mut ConversationState) -> T,
    ) -> Result<T, ChatError> {
        let mut state = self.lock()?;
        Ok(f(&mut state))
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> Result<ConversationState, ChatError> {
        Ok(self.lock()?.clone())
    }

    /// Clear the context and replace the transcript with the greeting.
    ///
    /// Refused with `Busy` while a turn is in flight.
    pub fn reset(&self) -> Result<(), ChatError> {
        let _guard = self.begin_turn()?;
        let mut state = self.lock()?;
        *state = ConversationState::new(&self.greeting);
        Ok(())
    }

    pub fn summary(&self) -> Result<ConversationSummary, ChatError> {
        let state = self.lock()?;
        Ok(ConversationSummary {
            id: self.id,
            started_at: self.started_at,
            turn_count: state.transcript.len(),
            busy: self.is_busy(),
            context: state.context.clone(),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, ConversationState>, ChatError> {
        self.state
            .lock()
            .map_err(|e| ChatError::StateError(format!("conversation lock poisoned: {}", e)))
    }
}

/// Releases the busy flag on drop, including on early return.
pub struct TurnGuard<'a> {
    busy: &'a AtomicBool,
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
