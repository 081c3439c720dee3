//! Route handler functions for all API endpoints.
//!
//! Each handler extracts path/query parameters and JSON bodies via axum
//! extractors, calls the orchestrator or the catalog, and returns JSON.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use campus_catalog::CatalogStore;
use campus_chat::{ConversationSummary, TurnOutcome};
use campus_core::types::{Course, Level, PastQuestion, SessionContext, StudyMaterial, Turn};

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request and query types
// =============================================================================

/// Body for POST /conversations/{id}/messages.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CourseQuery {
    pub department: Option<String>,
    pub level: Option<String>,
}

impl CourseQuery {
    fn department(&self) -> Option<&str> {
        self.department.as_deref().filter(|d| !d.trim().is_empty())
    }

    fn level(&self) -> Option<Level> {
        self.level
            .as_deref()
            .filter(|l| !l.trim().is_empty())
            .map(Level::parse)
    }
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub conversations: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConversationCreated {
    pub id: Uuid,
    pub transcript: Vec<Turn>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConversationList {
    pub conversations: Vec<ConversationSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranscriptResponse {
    pub id: Uuid,
    pub turns: Vec<Turn>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CoursesResponse {
    pub courses: Vec<Course>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MaterialsResponse {
    pub materials: Vec<StudyMaterial>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PastQuestionsResponse {
    pub past_questions: Vec<PastQuestion>,
}

// =============================================================================
// Health
// =============================================================================

/// GET /health - health check.
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        conversations: state.orchestrator.conversation_count()?,
    }))
}

// =============================================================================
// Conversations
// =============================================================================

/// POST /conversations - start a conversation.
pub async fn create_conversation(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ConversationCreated>), ApiError> {
    let id = state.orchestrator.start_conversation()?;
    let transcript = state.orchestrator.transcript(id)?;
    Ok((StatusCode::CREATED, Json(ConversationCreated { id, transcript })))
}

/// GET /conversations - list conversation summaries.
pub async fn list_conversations(
    State(state): State<AppState>,
) -> Result<Json<ConversationList>, ApiError> {
    Ok(Json(ConversationList {
        conversations: state.orchestrator.list_conversations()?,
    }))
}

/// POST /conversations/{id}/messages - run one turn.
///
/// Oracle outages still answer 200 with the apology turn and a
/// `status` of `oracle_failed`.
pub async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<SendMessageRequest>,
) -> Result<Json<TurnOutcome>, ApiError> {
    let outcome = state.orchestrator.handle_message(id, &body.message).await?;
    Ok(Json(outcome))
}

/// GET /conversations/{id}/transcript - ordered turns.
pub async fn get_transcript(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TranscriptResponse>, ApiError> {
    let turns = state.orchestrator.transcript(id)?;
    Ok(Json(TranscriptResponse { id, turns }))
}

/// GET /conversations/{id}/context - current session context.
pub async fn get_context(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionContext>, ApiError> {
    Ok(Json(state.orchestrator.context(id)?))
}

/// POST /conversations/{id}/reset - back to the greeting and an empty context.
pub async fn reset_conversation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TranscriptResponse>, ApiError> {
    state.orchestrator.reset(id)?;
    let turns = state.orchestrator.transcript(id)?;
    Ok(Json(TranscriptResponse { id, turns }))
}

/// DELETE /conversations/{id}
pub async fn delete_conversation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.orchestrator.delete_conversation(id)?;
    tracing::info!(conversation_id = %id, "Conversation deleted");
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Catalog browse
// =============================================================================

/// GET /catalog/courses?department=&level=
pub async fn list_courses(
    State(state): State<AppState>,
    Query(query): Query<CourseQuery>,
) -> Json<CoursesResponse> {
    let level = query.level();
    let courses = state
        .catalog
        .courses_by(query.department(), level.as_ref())
        .await;
    Json(CoursesResponse { courses })
}

/// GET /catalog/courses/{code}/materials
pub async fn course_materials(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Json<MaterialsResponse> {
    Json(MaterialsResponse {
        materials: state.catalog.materials_for(&code).await,
    })
}

/// GET /catalog/courses/{code}/past-questions
pub async fn course_past_questions(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Json<PastQuestionsResponse> {
    Json(PastQuestionsResponse {
        past_questions: state.catalog.past_questions_for(&code).await,
    })
}
