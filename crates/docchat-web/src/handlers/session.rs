use axum::Json;
use axum::extract::State;
use std::sync::Arc;

use docchat_core::{ApiKey, Model, SessionView};

use crate::error::ApiError;
use crate::models::{ModelJson, SettingsRequest};
use crate::state::AppState;

pub async fn state(State(state): State<Arc<AppState>>) -> Json<SessionView> {
    Json(state.controller.lock().await.view())
}

pub async fn models(State(state): State<Arc<AppState>>) -> Json<Vec<ModelJson>> {
    let selected = state.controller.lock().await.settings().model;
    Json(ModelJson::list(selected))
}

pub async fn settings(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SettingsRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let model = req
        .model
        .as_deref()
        .map(str::parse::<Model>)
        .transpose()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let mut controller = state.controller.lock().await;
    if let Some(model) = model {
        controller.set_model(model);
    }
    if let Some(key) = req.api_key {
        controller.set_api_key(ApiKey::new(key));
    }
    Ok(Json(controller.view()))
}

pub async fn clear(State(state): State<Arc<AppState>>) -> Json<SessionView> {
    let mut controller = state.controller.lock().await;
    controller.clear();
    Json(controller.view())
}
