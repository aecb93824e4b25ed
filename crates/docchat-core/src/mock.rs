//! Mock completion backend for testing.

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::Model;
use crate::backend::{CompletionBackend, CompletionError};
use crate::config::ApiKey;

/// A configurable mock response for [`MockBackend`].
#[derive(Clone, Debug)]
pub enum MockReply {
    /// Return this text.
    Answer(String),
    /// Return the prompt unchanged.
    Echo,
    /// Fail with this error.
    Fail(CompletionError),
}

/// A hand-rolled mock implementing [`CompletionBackend`] for tests.
///
/// Records every prompt and model it receives and counts calls. Replies
/// come from a sequence (one per call) and fall back to a fixed reply once
/// the sequence is exhausted.
pub struct MockBackend {
    replies: Mutex<Vec<MockReply>>,
    fallback: MockReply,
    calls: AtomicUsize,
    requests: Mutex<Vec<(Model, String)>>,
}

impl MockBackend {
    /// Create a mock that always returns `reply`.
    pub fn new(reply: MockReply) -> Self {
        Self {
            replies: Mutex::new(Vec::new()),
            fallback: reply,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that always answers with `text`.
    pub fn answering(text: &str) -> Self {
        Self::new(MockReply::Answer(text.to_string()))
    }

    /// Create a mock that returns `replies` in order, then `fallback`.
    pub fn with_sequence(mut replies: Vec<MockReply>, fallback: MockReply) -> Self {
        // Reverse so we can pop() from the front cheaply.
        replies.reverse();
        Self {
            replies: Mutex::new(replies),
            ..Self::new(fallback)
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every prompt received, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|r| r.iter().map(|(_, p)| p.clone()).collect())
            .unwrap_or_default()
    }

    /// The model used for the most recent call.
    pub fn last_model(&self) -> Option<Model> {
        self.requests
            .lock()
            .ok()
            .and_then(|r| r.last().map(|(m, _)| *m))
    }

    fn next_reply(&self) -> MockReply {
        self.replies
            .lock()
            .ok()
            .and_then(|mut r| r.pop())
            .unwrap_or_else(|| self.fallback.clone())
    }
}

impl CompletionBackend for MockBackend {
    fn name(&self) -> &str {
        "Mock"
    }

    fn generate<'a>(
        &'a self,
        prompt: &'a str,
        model: Model,
        _api_key: &'a ApiKey,
    ) -> Pin<Box<dyn Future<Output = Result<String, CompletionError>> + Send + 'a>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Ok(mut requests) = self.requests.lock() {
                requests.push((model, prompt.to_string()));
            }

            match self.next_reply() {
                MockReply::Answer(text) => Ok(text),
                MockReply::Echo => Ok(prompt.to_string()),
                MockReply::Fail(err) => Err(err),
            }
        })
    }
}
