use axum::Json;
use axum::extract::State;
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::{AskRequest, AskResponse};
use crate::state::AppState;

pub async fn ask(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    let mut controller = state.controller.lock().await;
    let answer = controller.submit(&req.question).await?;

    Ok(Json(AskResponse {
        answer,
        state: controller.view(),
    }))
}
