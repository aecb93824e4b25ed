//! Gemini client tests against a local axum server standing in for the
//! remote API.

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use docchat_core::{ApiKey, CompletionBackend, CompletionError, GeminiBackend, Model, complete};
use serde_json::{Value, json};

#[derive(Default)]
struct Seen {
    path: Option<String>,
    api_key: Option<String>,
    body: Option<Value>,
}

type Shared = Arc<Mutex<Seen>>;

async fn generate(
    State(seen): State<Shared>,
    Path(model_action): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let key = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    {
        let mut seen = seen.lock().unwrap();
        seen.path = Some(model_action);
        seen.api_key = key.clone();
        seen.body = Some(body);
    }

    match key.as_deref() {
        Some("good-key") => (
            StatusCode::OK,
            Json(json!({
                "candidates": [{
                    "content": { "role": "model", "parts": [{ "text": "The document " }, { "text": "is short." }] },
                    "finishReason": "STOP"
                }]
            })),
        ),
        Some("quota-key") => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "error": { "code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED" } })),
        ),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": { "code": 400, "message": "API key not valid. Please pass a valid API key.", "status": "INVALID_ARGUMENT" } })),
        ),
    }
}

async fn spawn_server() -> (String, Shared) {
    let seen: Shared = Arc::new(Mutex::new(Seen::default()));
    let app = Router::new()
        .route("/v1beta/models/{model_action}", post(generate))
        .with_state(seen.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), seen)
}

#[tokio::test]
async fn successful_request_shape_and_answer() {
    let (base, seen) = spawn_server().await;
    let backend = GeminiBackend::new(reqwest::Client::new(), base);

    let answer = complete(
        &backend,
        "What is the summary?",
        "Alpha Beta Gamma",
        Model::Gemini15Flash,
        &ApiKey::new("good-key"),
    )
    .await
    .unwrap();
    assert_eq!(answer, "The document is short.");

    let seen = seen.lock().unwrap();
    assert_eq!(seen.path.as_deref(), Some("gemini-1.5-flash:generateContent"));
    assert_eq!(seen.api_key.as_deref(), Some("good-key"));

    let body = seen.body.as_ref().unwrap();
    let contents = body["contents"].as_array().unwrap();
    assert_eq!(contents.len(), 1);
    assert_eq!(contents[0]["role"], "user");
    let text = contents[0]["parts"][0]["text"].as_str().unwrap();
    assert!(text.find("Alpha Beta Gamma").unwrap() < text.find("What is the summary?").unwrap());
}

#[tokio::test]
async fn invalid_key_is_reported() {
    let (base, _) = spawn_server().await;
    let backend = GeminiBackend::new(reqwest::Client::new(), base);

    let err = backend
        .generate("hi", Model::Gemini15Pro, &ApiKey::new("wrong"))
        .await
        .unwrap_err();
    assert!(matches!(err, CompletionError::InvalidCredential(_)));
}

#[tokio::test]
async fn quota_is_reported() {
    let (base, _) = spawn_server().await;
    let backend = GeminiBackend::new(reqwest::Client::new(), base);

    let err = backend
        .generate("hi", Model::Gemini15Pro, &ApiKey::new("quota-key"))
        .await
        .unwrap_err();
    assert_eq!(err, CompletionError::Quota("Quota exceeded".into()));
}

#[tokio::test]
async fn unreachable_service_is_transport_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let backend = GeminiBackend::new(reqwest::Client::new(), format!("http://{}", addr));
    let err = backend
        .generate("hi", Model::Gemini15Pro, &ApiKey::new("good-key"))
        .await
        .unwrap_err();
    assert!(matches!(err, CompletionError::Transport(_)));
}
