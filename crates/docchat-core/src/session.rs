//! Per-session conversation state.

use crate::Message;

/// The document currently loaded into a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveDocument {
    pub name: String,
    pub text: String,
}

/// Conversation history plus the active document for one session.
///
/// Owned exclusively by a [`Controller`](crate::Controller); every mutation
/// goes through `&mut self`, so a reader never observes a half-recorded
/// exchange.
#[derive(Debug, Clone, Default)]
pub struct Session {
    history: Vec<Message>,
    document: Option<ActiveDocument>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a user message followed by the assistant's reply.
    pub fn record_exchange(&mut self, user_text: impl Into<String>, assistant_text: impl Into<String>) {
        self.history.reserve(2);
        self.history.push(Message::user(user_text));
        self.history.push(Message::assistant(assistant_text));
    }

    /// Replace the active document. Never merges with the previous one.
    pub fn set_document(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.document = Some(ActiveDocument {
            name: name.into(),
            text: text.into(),
        });
    }

    pub fn clear_document(&mut self) {
        self.document = None;
    }

    /// Empty the history and drop the active document.
    pub fn reset(&mut self) {
        self.history.clear();
        self.document = None;
    }

    /// Oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.history
    }

    pub fn document(&self) -> Option<&ActiveDocument> {
        self.document.as_ref()
    }

    /// The active document's text, or `""` when none is loaded.
    pub fn document_text(&self) -> &str {
        self.document.as_ref().map_or("", |d| d.text.as_str())
    }
}
