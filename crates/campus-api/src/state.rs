//! Application state shared across all route handlers.

use std::sync::Arc;
use std::time::Instant;

use campus_catalog::InMemoryCatalog;
use campus_chat::ChatOrchestrator;
use campus_core::config::CampusConfig;

/// Shared application state.
///
/// All fields use `Arc` for cheap cloning across handler tasks. Mutable
/// conversation state lives behind the orchestrator.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration, fixed at startup.
    pub config: Arc<CampusConfig>,
    /// Dispatch loop and conversation registry.
    pub orchestrator: Arc<ChatOrchestrator>,
    /// Catalog used for direct browsing. The orchestrator holds its own
    /// handle to the same store.
    pub catalog: Arc<InMemoryCatalog>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        config: CampusConfig,
        orchestrator: Arc<ChatOrchestrator>,
        catalog: Arc<InMemoryCatalog>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            orchestrator,
            catalog,
            start_time: Instant::now(),
        }
    }
}
