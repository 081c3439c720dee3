//! System instructions, per-turn prompt and response schema for the oracle.

use serde_json::{json, Value};

use campus_core::types::SessionContext;

use super::OracleRequest;

/// Persona and intent catalogue sent as the system instruction.
pub const SYSTEM_PROMPT: &str = "\
You are a Campus Academic Assistant for a Nigerian University.
Your goal is to help students find academic information.
Identify the user's intent and parameters from the chat history and the current message.

Intents:
- COURSE_INFO: Asking about what courses to take. Needs 'department' and 'level'.
- MATERIAL_SEARCH: Asking for study materials or notes. Needs 'courseCode'.
- PAST_QUESTIONS: Asking for previous exam papers. Needs 'courseCode'.
- STUDY_ADVICE: Asking for general guidance for a specific level. Needs 'level'.
- SET_CONTEXT: When user explicitly states their level or department (e.g. \"I am in 300L\").
- GENERAL_CHAT: Greeting or miscellaneous talk.

Instructions:
1. Always respond in JSON format.
2. If parameters are missing, ask for them politely in the 'answer' field.
3. If you have enough info, set the 'intent' and provide the 'parameters'.
4. Keep the 'answer' friendly and supportive.
";

const UNKNOWN: &str = "Unknown";

/// One-line summary of the session context.
pub fn context_summary(context: &SessionContext) -> String {
    format!(
        "Department: {}, Level: {}, Last course: {}",
        context.department.as_deref().unwrap_or(UNKNOWN),
        context.level.as_ref().map(|l| l.as_str()).unwrap_or(UNKNOWN),
        context.last_course_code.as_deref().unwrap_or(UNKNOWN),
    )
}

/// Build the user prompt for one turn.
pub fn build_prompt(request: &OracleRequest<'_>) -> String {
    let history = serde_json::to_string(request.history).unwrap_or_else(|_| "[]".to_string());
    format!(
        "Session Context: {}\nUser Message: {}\n\nPrevious History: {}",
        context_summary(request.context),
        request.user_text,
        history,
    )
}

/// JSON schema the oracle's reply must follow.
pub fn response_schema() -> Value {
    let intents: Vec<&str> = campus_core::types::Intent::ALL
        .iter()
        .map(|i| i.as_str())
        .collect();
    json!({
        "type": "OBJECT",
        "properties": {
            "answer": { "type": "STRING" },
            "intent": {
                "type": "STRING",
                "description": format!("One of {}", intents.join(", ")),
            },
            "parameters": {
                "type": "OBJECT",
                "properties": {
                    "department": { "type": "STRING" },
                    "level": { "type": "STRING" },
                    "courseCode": { "type": "STRING" },
                },
            },
        },
        "required": ["answer", "intent"],
    })
}
