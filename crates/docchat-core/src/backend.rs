use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use crate::config::ApiKey;
use crate::prompt::compose_prompt;
use crate::Model;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    #[error("invalid API key: {0}")]
    InvalidCredential(String),
    #[error("quota exceeded: {0}")]
    Quota(String),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("service error (HTTP {status}): {message}")]
    Service { status: u16, message: String },
    #[error("response blocked: {0}")]
    Blocked(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// A remote text-generation service.
pub trait CompletionBackend: Send + Sync {
    /// Human-readable name of the service (e.g. "Gemini").
    fn name(&self) -> &str;

    /// Send one prompt and return the generated text. Exactly one request
    /// per call; no streaming and no retries.
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
        model: Model,
        api_key: &'a ApiKey,
    ) -> Pin<Box<dyn Future<Output = Result<String, CompletionError>> + Send + 'a>>;
}

/// Answer `question`, using `context` as the document when it is non-empty.
pub async fn complete(
    backend: &dyn CompletionBackend,
    question: &str,
    context: &str,
    model: Model,
    api_key: &ApiKey,
) -> Result<String, CompletionError> {
    let prompt = compose_prompt(question, context);
    tracing::debug!(
        backend = backend.name(),
        model = model.as_str(),
        prompt_chars = prompt.chars().count(),
        with_document = !context.is_empty(),
        "requesting completion"
    );
    backend.generate(&prompt, model, api_key).await
}
