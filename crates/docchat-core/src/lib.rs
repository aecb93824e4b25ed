use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod backend;
pub mod config;
pub mod config_file;
pub mod controller;
pub mod gemini;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;
pub mod prompt;
pub mod session;

// Re-export for convenience
pub use backend::{CompletionBackend, CompletionError, complete};
pub use config::{ApiKey, AppConfig, ConfigError};
pub use controller::{
    Controller, DocumentPreview, SessionSettings, SessionView, SubmitError, UploadError,
    UploadedFile,
};
pub use gemini::GeminiBackend;
pub use session::Session;

/// Who authored a message in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One entry of the conversation history. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    role: Role,
    content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// The generative models a session can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Model {
    #[default]
    #[serde(rename = "gemini-1.5-pro")]
    Gemini15Pro,
    #[serde(rename = "gemini-1.5-flash")]
    Gemini15Flash,
    #[serde(rename = "gemini-1.0-pro")]
    Gemini10Pro,
}

impl Model {
    pub const ALL: [Model; 3] = [Model::Gemini15Pro, Model::Gemini15Flash, Model::Gemini10Pro];

    /// The identifier the remote service expects in the request path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Model::Gemini15Pro => "gemini-1.5-pro",
            Model::Gemini15Flash => "gemini-1.5-flash",
            Model::Gemini10Pro => "gemini-1.0-pro",
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown model {0:?} (expected one of gemini-1.5-pro, gemini-1.5-flash, gemini-1.0-pro)")]
pub struct UnknownModel(pub String);

impl FromStr for Model {
    type Err = UnknownModel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Model::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownModel(s.to_string()))
    }
}
