use axum::Json;
use axum::extract::{Multipart, State};
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::UploadResponse;
use crate::state::AppState;
use crate::upload;

pub async fn upload(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let file = upload::parse_multipart(multipart)
        .await
        .map_err(ApiError::bad_request)?;

    let mut controller = state.controller.lock().await;
    let document = controller.upload(file).await?;

    Ok(Json(UploadResponse {
        document,
        state: controller.view(),
    }))
}
