//! GeminiOracle against a local fake of the generateContent endpoint.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use campus_chat::{GeminiOracle, HistoryEntry, IntentOracle, OracleError, OracleRequest};
use campus_core::types::{Intent, Level, Role, SessionContext};

#[derive(Clone)]
struct FakeGemini {
    status: StatusCode,
    body: Value,
    seen: Arc<Mutex<Vec<(String, Option<String>, Value)>>>,
}

#[derive(serde::Deserialize)]
struct KeyQuery {
    key: Option<String>,
}

async fn generate(
    State(fake): State<FakeGemini>,
    Path(model_call): Path<String>,
    Query(query): Query<KeyQuery>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    fake.seen.lock().unwrap().push((model_call, query.key, body));
    (fake.status, Json(fake.body.clone()))
}

/// Start a fake server and return an oracle pointed at it.
async fn start(status: StatusCode, body: Value) -> (GeminiOracle, FakeGemini) {
    let fake = FakeGemini {
        status,
        body,
        seen: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/models/{model_call}", post(generate))
        .with_state(fake.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let oracle = GeminiOracle::new(
        "test-key",
        "gemini-test",
        format!("http://{addr}/models"),
        Duration::from_secs(5),
    )
    .unwrap();
    (oracle, fake)
}

fn candidate(text: &str) -> Value {
    json!({ "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }] })
}

#[tokio::test]
async fn test_classify_parses_structured_reply() {
    let (oracle, fake) = start(
        StatusCode::OK,
        candidate(
            r#"{"answer":"Great, noted!","intent":"SET_CONTEXT","parameters":{"department":"Computer Engineering","level":"300L"}}"#,
        ),
    )
    .await;

    let ctx = SessionContext::default();
    let history = vec![HistoryEntry {
        role: Role::Assistant,
        content: "Hello!".to_string(),
    }];
    let reply = oracle
        .classify(OracleRequest {
            user_text: "I am in 300L Computer Engineering",
            history: &history,
            context: &ctx,
        })
        .await
        .unwrap();

    assert_eq!(reply.answer, "Great, noted!");
    assert_eq!(reply.intent, Intent::SetContext);
    assert_eq!(reply.parameters.level, Some(Level::L300));

    let seen = fake.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let (model_call, key, body) = &seen[0];
    assert_eq!(model_call, "gemini-test:generateContent");
    assert_eq!(key.as_deref(), Some("test-key"));
    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("User Message: I am in 300L Computer Engineering"));
    assert!(prompt.contains("Hello!"));
    assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
}

#[tokio::test]
async fn test_classify_non_json_text_is_general_chat() {
    let (oracle, _) = start(
        StatusCode::OK,
        candidate("```\nI can only help with academic questions.\n```"),
    )
    .await;

    let ctx = SessionContext::default();
    let reply = oracle
        .classify(OracleRequest {
            user_text: "tell me a joke",
            history: &[],
            context: &ctx,
        })
        .await
        .unwrap();

    assert_eq!(reply.intent, Intent::GeneralChat);
    assert_eq!(reply.answer, "I can only help with academic questions.");
    assert!(reply.parameters.is_empty());
}

#[tokio::test]
async fn test_classify_http_error_is_status_error() {
    let (oracle, _) = start(
        StatusCode::TOO_MANY_REQUESTS,
        json!({ "error": { "code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED" } }),
    )
    .await;

    let ctx = SessionContext::default();
    let err = oracle
        .classify(OracleRequest {
            user_text: "hello",
            history: &[],
            context: &ctx,
        })
        .await
        .unwrap_err();

    match err {
        OracleError::Status { status, message } => {
            assert_eq!(status, 429);
            assert!(message.contains("Quota exceeded"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_classify_empty_candidates_is_empty_response() {
    let (oracle, _) = start(StatusCode::OK, json!({ "candidates": [] })).await;

    let ctx = SessionContext::default();
    let err = oracle
        .classify(OracleRequest {
            user_text: "hello",
            history: &[],
            context: &ctx,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, OracleError::EmptyResponse));
}

#[tokio::test]
async fn test_classify_unreachable_host_is_transport_error() {
    let oracle = GeminiOracle::new(
        "k",
        "m",
        "http://127.0.0.1:9/models",
        Duration::from_secs(2),
    )
    .unwrap();
    let ctx = SessionContext::default();
    let err = oracle
        .classify(OracleRequest {
            user_text: "hello",
            history: &[],
            context: &ctx,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, OracleError::Transport(_)));
}
