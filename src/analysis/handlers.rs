use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use bytes::Bytes;
use tracing::{info, instrument, warn};

use super::dto::AnalysisResult;
use crate::{
    error::AppError,
    images::services::{save_upload, UploadItem},
    state::AppState,
};

const IMAGE_FIELD: &str = "fridge_image";

pub fn upload_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload_image))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

/// POST /upload (multipart), field `fridge_image`
#[instrument(skip(state, mp))]
pub async fn upload_image(
    State(state): State<AppState>,
    mut mp: Multipart,
) -> Result<Json<AnalysisResult>, AppError> {
    let mut upload: Option<(String, String, Bytes)> = None;
    while let Some(field) = mp
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(e.body_text()))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let body = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidInput(e.body_text()))?;
        upload = Some((file_name, content_type, body));
        break;
    }

    let Some((file_name, content_type, body)) = upload else {
        warn!("upload without image field");
        return Err(AppError::InvalidInput("No image uploaded".into()));
    };
    if file_name.is_empty() {
        return Err(AppError::InvalidInput("No image selected".into()));
    }

    let path = save_upload(
        &state.config.upload_dir,
        UploadItem {
            body,
            content_type: &content_type,
            file_name: &file_name,
        },
    )
    .await?;
    info!(path = %path.display(), %file_name, "fridge image received");

    let coordinator = state.coordinator.clone();
    let analyzed_path = path.clone();
    let result = tokio::task::spawn_blocking(move || coordinator.analyze(&analyzed_path)).await;

    // Uploads are only kept for the duration of the analysis.
    if let Err(e) = tokio::fs::remove_file(&path).await {
        warn!(error = %e, path = %path.display(), "could not remove upload");
    }
    Ok(Json(result??))
}
