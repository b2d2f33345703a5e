//! Media library: uploads written to the uploads directory and served
//! under `/uploads`.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use chrono::Utc;
use domain::models::media_asset::{
    media_category, public_url, stored_file_name, MAX_UPLOAD_BYTES,
};
use domain::models::{MediaAsset, SuccessResponse};
use persistence::repositories::{MediaAssetRepository, NewMediaAsset};
use rand::Rng;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{info, warn};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

/// Mounted at `/api/admin/media`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_media).post(upload_media))
        .route("/:id", delete(delete_media))
}

struct Upload {
    original_name: String,
    mime_type: String,
    bytes: Vec<u8>,
}

/// Content type sent with the part, else guessed from the file name.
fn upload_mime_type(declared: Option<&str>, original_name: &str) -> String {
    declared
        .map(str::trim)
        .filter(|m| !m.is_empty() && *m != "application/octet-stream")
        .map(str::to_string)
        .unwrap_or_else(|| {
            mime_guess::from_path(original_name)
                .first_or_octet_stream()
                .essence_str()
                .to_string()
        })
}

/// GET /api/admin/media
pub async fn list_media(State(state): State<AppState>) -> Result<Json<Vec<MediaAsset>>, ApiError> {
    let assets = MediaAssetRepository::new(state.pool.clone())
        .list()
        .await?
        .into_iter()
        .map(MediaAsset::from)
        .collect();
    Ok(Json(assets))
}

/// POST /api/admin/media
///
/// Multipart form with a `file` part and an optional `altText` part.
pub async fn upload_media(
    State(state): State<AppState>,
    auth: UserAuth,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<MediaAsset>), ApiError> {
    let mut upload: Option<Upload> = None;
    let mut alt_text: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Invalid multipart body: {}", e)))?
    {
        match field.name() {
            Some("file") => {
                let original_name = field.file_name().unwrap_or("upload").to_string();
                let mime_type = upload_mime_type(field.content_type(), &original_name);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Validation(format!("Invalid file upload: {}", e)))?;
                upload = Some(Upload {
                    original_name,
                    mime_type,
                    bytes: bytes.to_vec(),
                });
            }
            Some("altText") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::Validation(format!("Invalid alt text: {}", e)))?;
                alt_text = Some(text.trim().to_string()).filter(|t| !t.is_empty());
            }
            _ => {}
        }
    }

    let upload = upload.ok_or_else(|| ApiError::Validation("File upload missing".to_string()))?;
    let category = media_category(&upload.mime_type).ok_or_else(|| {
        ApiError::Validation("Only image or video uploads are supported".to_string())
    })?;
    if upload.bytes.len() > MAX_UPLOAD_BYTES {
        return Err(ApiError::Validation(
            "File exceeds the 100 MB upload limit".to_string(),
        ));
    }

    let suffix: u32 = rand::thread_rng().gen_range(100_000_000..1_000_000_000);
    let file_name = stored_file_name(&upload.original_name, Utc::now().timestamp_millis(), suffix);
    let uploads_dir = PathBuf::from(&state.config.server.uploads_dir);
    tokio::fs::create_dir_all(&uploads_dir)
        .await
        .map_err(|e| ApiError::Internal(format!("Cannot prepare uploads directory: {}", e)))?;
    tokio::fs::write(uploads_dir.join(&file_name), &upload.bytes)
        .await
        .map_err(|e| ApiError::Internal(format!("Cannot store upload: {}", e)))?;

    let url = public_url(&file_name);
    let asset = MediaAssetRepository::new(state.pool.clone())
        .create(&NewMediaAsset {
            file_name: &file_name,
            url: &url,
            alt_text: alt_text.as_deref(),
            mime_type: Some(&upload.mime_type),
            category: Some(category),
            created_by: Some(auth.user_id),
        })
        .await?;

    info!(
        media_id = %asset.id,
        file_name = %file_name,
        bytes = upload.bytes.len(),
        "Media uploaded"
    );
    Ok((StatusCode::CREATED, Json(MediaAsset::from(asset))))
}

/// DELETE /api/admin/media/:id
///
/// A stored file that is already gone is ignored.
pub async fn delete_media(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let asset = MediaAssetRepository::new(state.pool.clone())
        .delete(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Media asset not found".to_string()))?;

    if asset.url.starts_with("/uploads/") {
        let path = PathBuf::from(&state.config.server.uploads_dir).join(&asset.file_name);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(media_id = %id, error = %e, "Failed to remove media file"),
        }
    }

    info!(media_id = %id, "Media asset deleted");
    Ok(Json(SuccessResponse::ok()))
}
