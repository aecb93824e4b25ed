//! Interaction controller: turns user events into session updates.
//!
//! Three events act on one [`Session`]: an upload replaces the active
//! document, a submit asks the model and records the exchange, a clear
//! resets everything. Each event runs to completion before the caller can
//! issue the next one (`&mut self`).

use std::sync::Arc;

use docchat_ingest::{DocumentKind, IngestError};
use serde::Serialize;
use thiserror::Error;

use crate::backend::{CompletionBackend, CompletionError, complete};
use crate::config::ApiKey;
use crate::session::Session;
use crate::{Message, Model};

/// Number of characters shown in a document preview.
pub const PREVIEW_CHARS: usize = 1000;
/// Marker appended to a truncated preview.
pub const PREVIEW_ELLIPSIS: &str = "...";

/// A file handed to the controller by a front end.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    /// Declared MIME type; selects the extractor.
    pub mime: String,
    pub data: Vec<u8>,
}

/// Per-session configuration: model choice and credential.
#[derive(Debug, Clone, Default)]
pub struct SessionSettings {
    pub model: Model,
    pub api_key: ApiKey,
}

/// What the user sees after an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentPreview {
    pub name: String,
    /// At most [`PREVIEW_CHARS`] characters, plus [`PREVIEW_ELLIPSIS`] when truncated.
    pub preview: String,
    pub total_chars: usize,
    pub truncated: bool,
}

impl DocumentPreview {
    pub fn of(name: &str, text: &str) -> Self {
        let total_chars = text.chars().count();
        let truncated = total_chars > PREVIEW_CHARS;
        let preview = if truncated {
            let cut = text
                .char_indices()
                .nth(PREVIEW_CHARS)
                .map_or(text.len(), |(i, _)| i);
            format!("{}{}", &text[..cut], PREVIEW_ELLIPSIS)
        } else {
            text.to_string()
        };

        Self {
            name: name.to_string(),
            preview,
            total_chars,
            truncated,
        }
    }
}

/// Snapshot of everything a front end renders.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub api_key_configured: bool,
    pub model: Model,
    pub document: Option<DocumentPreview>,
    /// Chronological, oldest first.
    pub messages: Vec<Message>,
}

#[derive(Error, Debug)]
pub enum UploadError {
    #[error(transparent)]
    Extraction(#[from] IngestError),
    #[error("extraction task failed: {0}")]
    Task(String),
}

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("please configure your API key")]
    MissingCredential,
    #[error("please enter a question")]
    EmptyQuestion,
    #[error("error calling LLM: {0}")]
    Completion(#[from] CompletionError),
}

pub struct Controller {
    backend: Arc<dyn CompletionBackend>,
    session: Session,
    settings: SessionSettings,
}

impl Controller {
    pub fn new(backend: Arc<dyn CompletionBackend>, settings: SessionSettings) -> Self {
        Self {
            backend,
            session: Session::new(),
            settings,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn set_model(&mut self, model: Model) {
        tracing::debug!(model = model.as_str(), "model selected");
        self.settings.model = model;
    }

    pub fn set_api_key(&mut self, api_key: ApiKey) {
        tracing::debug!(configured = !api_key.is_empty(), "API key updated");
        self.settings.api_key = api_key;
    }

    /// Extract `file` on the blocking pool and make it the active document.
    pub async fn upload(&mut self, file: UploadedFile) -> Result<DocumentPreview, UploadError> {
        self.upload_with(file, docchat_ingest::extract).await
    }

    async fn upload_with(
        &mut self,
        file: UploadedFile,
        extract: fn(&[u8], &str) -> Result<String, IngestError>,
    ) -> Result<DocumentPreview, UploadError> {
        let UploadedFile { name, mime, data } = file;
        match tokio::task::spawn_blocking(move || extract(&data, &mime)).await {
            Ok(result) => self.load_extracted(&name, result),
            Err(e) => Err(self.reject_upload(&name, UploadError::Task(e.to_string()))),
        }
    }

    /// Apply an extraction result produced elsewhere.
    ///
    /// Success replaces the active document. Failure also drops the previous
    /// document, since the upload was meant to replace it, and the error text
    /// is never stored as document content.
    pub fn load_extracted(
        &mut self,
        name: &str,
        result: Result<String, IngestError>,
    ) -> Result<DocumentPreview, UploadError> {
        match result {
            Ok(text) => {
                let preview = DocumentPreview::of(name, &text);
                tracing::info!(
                    file = name,
                    chars = preview.total_chars,
                    "document loaded"
                );
                self.session.set_document(name, text);
                Ok(preview)
            }
            Err(e) => Err(self.reject_upload(name, UploadError::Extraction(e))),
        }
    }

    /// Drop the active document after a failed upload.
    fn reject_upload(&mut self, name: &str, error: UploadError) -> UploadError {
        tracing::warn!(file = name, error = %error, "upload failed");
        self.session.clear_document();
        error
    }

    /// Convenience for callers that only have a path-like name and bytes.
    pub fn declared_mime_for(name: &str) -> &'static str {
        DocumentKind::from_path(std::path::Path::new(name)).mime()
    }

    /// Ask the model and record the exchange.
    ///
    /// Checks, in order, that an API key is configured and that the question
    /// is not blank; either failure returns before any request is made and
    /// leaves the session untouched. Blank means empty after trimming, so a
    /// whitespace-only question is rejected (keys are trimmed by
    /// [`ApiKey::new`]).
    ///
    /// The history only ever holds answered questions: a failed completion
    /// records neither message and the error goes back to the caller for
    /// display instead of being stored as an assistant reply.
    pub async fn submit(&mut self, question: &str) -> Result<String, SubmitError> {
        if self.settings.api_key.is_empty() {
            return Err(SubmitError::MissingCredential);
        }
        if question.trim().is_empty() {
            return Err(SubmitError::EmptyQuestion);
        }

        let result = complete(
            self.backend.as_ref(),
            question,
            self.session.document_text(),
            self.settings.model,
            &self.settings.api_key,
        )
        .await;

        match result {
            Ok(answer) => {
                self.session.record_exchange(question, answer.clone());
                tracing::info!(
                    model = self.settings.model.as_str(),
                    messages = self.session.messages().len(),
                    "exchange recorded"
                );
                Ok(answer)
            }
            Err(e) => {
                tracing::warn!(model = self.settings.model.as_str(), error = %e, "completion failed");
                Err(SubmitError::Completion(e))
            }
        }
    }

    /// Reset history and document. No confirmation.
    pub fn clear(&mut self) {
        self.session.reset();
        tracing::info!("session cleared");
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            api_key_configured: !self.settings.api_key.is_empty(),
            model: self.settings.model,
            document: self
                .session
                .document()
                .map(|d| DocumentPreview::of(&d.name, &d.text)),
            messages: self.session.messages().to_vec(),
        }
    }
}
