use docchat_core::{DocumentPreview, Model, SessionView};
use serde::{Deserialize, Serialize};

// ── Requests ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SettingsRequest {
    pub model: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub question: String,
}

// ── Responses ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ModelJson {
    pub id: &'static str,
    pub selected: bool,
}

impl ModelJson {
    pub fn list(selected: Model) -> Vec<ModelJson> {
        Model::ALL
            .into_iter()
            .map(|m| ModelJson {
                id: m.as_str(),
                selected: m == selected,
            })
            .collect()
    }
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub document: DocumentPreview,
    pub state: SessionView,
}

#[derive(Serialize)]
pub struct AskResponse {
    pub answer: String,
    pub state: SessionView,
}

#[derive(Serialize)]
pub struct ErrorJson {
    pub error: String,
}
