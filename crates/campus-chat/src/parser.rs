//! Best-effort parsing of the oracle's JSON reply.
//!
//! Parsing never fails. A reply that is not a JSON object with a string
//! `answer` becomes a `GENERAL_CHAT` reply whose answer is the raw text with
//! any Markdown code fence removed. An unknown intent tag is read as
//! `GENERAL_CHAT` with the extracted parameters kept.

use serde::Deserialize;
use serde_json::Value;

use campus_core::types::{Intent, Level};

use crate::context::ExtractedParams;
use crate::oracle::OracleReply;

#[derive(Debug, Deserialize)]
struct RawReply {
    answer: Option<String>,
    #[serde(default)]
    intent: Option<String>,
    #[serde(default)]
    parameters: Option<Value>,
}

/// Parse the oracle's raw text into a reply.
pub fn parse_reply(raw: &str) -> OracleReply {
    let body = strip_code_fence(raw);

    let parsed = match serde_json::from_str::<RawReply>(body) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(error = %e, "Oracle reply is not valid JSON; treating as plain text");
            return OracleReply::general_chat(body);
        }
    };

    let Some(answer) = parsed.answer else {
        tracing::warn!("Oracle reply has no answer; treating as plain text");
        return OracleReply::general_chat(body);
    };

    let intent = match parsed.intent.as_deref() {
        Some(tag) => Intent::from_tag(tag).unwrap_or_else(|| {
            tracing::debug!(tag, "Unknown intent tag; falling back to GENERAL_CHAT");
            Intent::GeneralChat
        }),
        None => Intent::GeneralChat,
    };

    OracleReply {
        answer,
        intent,
        parameters: parsed
            .parameters
            .as_ref()
            .map(parse_parameters)
            .unwrap_or_default(),
    }
}

/// Remove a surrounding Markdown code fence (```json ... ```), if any.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening line.
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => strip_inline_info(rest),
    };
    rest.trim_end()
        .strip_suffix("```")
        .unwrap_or(rest)
        .trim()
}

/// Single-line fence: drop a leading info word only when JSON follows it.
fn strip_inline_info(rest: &str) -> &str {
    let body = rest.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    if body.len() < rest.len() && body.trim_start().starts_with(['{', '[']) {
        body
    } else {
        rest
    }
}

fn parse_parameters(value: &Value) -> ExtractedParams {
    ExtractedParams {
        department: text_field(value, "department"),
        level: text_field(value, "level").map(|l| Level::parse(&l)),
        course_code: text_field(value, "courseCode").or_else(|| text_field(value, "course_code")),
    }
}

/// A non-blank string (or number, rendered as text) field of an object.
fn text_field(value: &Value, key: &str) -> Option<String> {
    let text = match value.get(key)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}
