//! Google Gemini `generateContent` client.

use std::future::Future;
use std::pin::Pin;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::backend::{CompletionBackend, CompletionError};
use crate::config::ApiKey;
use crate::Model;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

pub struct GeminiBackend {
    client: reqwest::Client,
    api_base: String,
}

impl GeminiBackend {
    pub fn new(client: reqwest::Client, api_base: impl Into<String>) -> Self {
        Self {
            client,
            api_base: api_base.into(),
        }
    }

    fn endpoint(&self, model: Model) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            model.as_str()
        )
    }
}

impl Default for GeminiBackend {
    fn default() -> Self {
        Self::new(reqwest::Client::new(), DEFAULT_API_BASE)
    }
}

// ── Wire types ──────────────────────────────────────────────────────────

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<ResponseContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

impl CompletionBackend for GeminiBackend {
    fn name(&self) -> &str {
        "Gemini"
    }

    fn generate<'a>(
        &'a self,
        prompt: &'a str,
        model: Model,
        api_key: &'a ApiKey,
    ) -> Pin<Box<dyn Future<Output = Result<String, CompletionError>> + Send + 'a>> {
        Box::pin(async move {
            let body = GenerateRequest {
                contents: vec![RequestContent {
                    role: "user",
                    parts: vec![RequestPart { text: prompt }],
                }],
            };

            let resp = self
                .client
                .post(self.endpoint(model))
                .header("x-goog-api-key", api_key.expose())
                .json(&body)
                .send()
                .await
                .map_err(|e| CompletionError::Transport(e.to_string()))?;

            let status = resp.status();
            if !status.is_success() {
                let text = resp.text().await.unwrap_or_default();
                return Err(classify_failure(status, &text));
            }

            let data: GenerateResponse = resp
                .json()
                .await
                .map_err(|e| CompletionError::MalformedResponse(e.to_string()))?;

            response_text(data)
        })
    }
}

/// Map a non-2xx response onto a [`CompletionError`].
fn classify_failure(status: StatusCode, body: &str) -> CompletionError {
    let (message, api_status) = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(env) => (env.error.message, env.error.status),
        Err(_) => (body.trim().to_string(), String::new()),
    };
    let message = if message.is_empty() {
        status.to_string()
    } else {
        message
    };

    match status {
        StatusCode::TOO_MANY_REQUESTS => CompletionError::Quota(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            CompletionError::InvalidCredential(message)
        }
        // Google reports a bad key as 400 INVALID_ARGUMENT
        StatusCode::BAD_REQUEST if message.contains("API key") => {
            CompletionError::InvalidCredential(message)
        }
        _ if api_status == "RESOURCE_EXHAUSTED" => CompletionError::Quota(message),
        _ => CompletionError::Service {
            status: status.as_u16(),
            message,
        },
    }
}

/// Concatenate the text parts of the first candidate.
fn response_text(data: GenerateResponse) -> Result<String, CompletionError> {
    let Some(candidate) = data.candidates.into_iter().next() else {
        let reason = data
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .unwrap_or_else(|| "no candidates returned".to_string());
        return Err(CompletionError::Blocked(reason));
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if !text.is_empty() {
        return Ok(text);
    }

    match candidate.finish_reason.as_deref() {
        Some("SAFETY") | Some("RECITATION") | Some("BLOCKLIST") | Some("PROHIBITED_CONTENT") => Err(
            CompletionError::Blocked(candidate.finish_reason.unwrap_or_default()),
        ),
        Some(reason) => Err(CompletionError::MalformedResponse(format!(
            "candidate has no text (finish reason {})",
            reason
        ))),
        None => Err(CompletionError::MalformedResponse(
            "candidate has no text".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> GenerateResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn joins_all_text_parts() {
        let data = parse(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Hello, "},{"text":"world"}]},"finishReason":"STOP"}]}"#,
        );
        assert_eq!(response_text(data).unwrap(), "Hello, world");
    }

    #[test]
    fn only_first_candidate_is_used() {
        let data = parse(
            r#"{"candidates":[{"content":{"parts":[{"text":"one"}]}},{"content":{"parts":[{"text":"two"}]}}]}"#,
        );
        assert_eq!(response_text(data).unwrap(), "one");
    }

    #[test]
    fn blocked_prompt_reports_reason() {
        let data = parse(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#);
        assert_eq!(
            response_text(data).unwrap_err(),
            CompletionError::Blocked("SAFETY".into())
        );
    }

    #[test]
    fn safety_stop_without_text_is_blocked() {
        let data = parse(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#);
        assert!(matches!(
            response_text(data).unwrap_err(),
            CompletionError::Blocked(_)
        ));
    }

    #[test]
    fn empty_candidate_is_malformed() {
        let data = parse(r#"{"candidates":[{"content":{"parts":[]},"finishReason":"MAX_TOKENS"}]}"#);
        let err = response_text(data).unwrap_err();
        assert!(err.to_string().contains("MAX_TOKENS"));
    }

    #[test]
    fn bad_key_400_is_invalid_credential() {
        let body = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#;
        assert!(matches!(
            classify_failure(StatusCode::BAD_REQUEST, body),
            CompletionError::InvalidCredential(m) if m.starts_with("API key not valid")
        ));
    }

    #[test]
    fn rate_limit_is_quota() {
        let body = r#"{"error":{"code":429,"message":"Resource has been exhausted","status":"RESOURCE_EXHAUSTED"}}"#;
        assert!(matches!(
            classify_failure(StatusCode::TOO_MANY_REQUESTS, body),
            CompletionError::Quota(_)
        ));
    }

    #[test]
    fn non_json_error_body_is_kept() {
        let err = classify_failure(StatusCode::BAD_GATEWAY, "upstream unavailable\n");
        assert_eq!(
            err,
            CompletionError::Service {
                status: 502,
                message: "upstream unavailable".into()
            }
        );
    }

    #[test]
    fn empty_error_body_uses_status_line() {
        let err = classify_failure(StatusCode::INTERNAL_SERVER_ERROR, "");
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn endpoint_includes_model_and_strips_trailing_slash() {
        let backend = GeminiBackend::new(reqwest::Client::new(), "http://localhost:9/");
        assert_eq!(
            backend.endpoint(Model::Gemini15Flash),
            "http://localhost:9/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }
}
