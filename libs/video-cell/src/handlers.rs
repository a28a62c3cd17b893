use axum::{
    extract::{Extension, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use tracing::debug;

use shared_models::auth::Role;
use shared_models::error::AppError;
use shared_models::user::User;
use shared_utils::policy::require_role;
use shared_utils::AppState;

use crate::models::{StoredFile, VideoError, VideoResponse, VideoUpload};
use crate::services::library::VideoLibraryService;
use crate::services::storage::UploadStore;

async fn read_upload(uploads: &UploadStore, mut multipart: Multipart) -> Result<VideoUpload, VideoError> {
    let mut upload = VideoUpload::default();

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| VideoError::Multipart(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let mut pending = uploads.create(&file_name).await?;

                loop {
                    match field.chunk().await {
                        Ok(Some(chunk)) => {
                            if let Err(e) = pending.write(&chunk).await {
                                pending.discard().await;
                                return Err(e.into());
                            }
                        }
                        Ok(None) => break,
                        Err(e) => {
                            pending.discard().await;
                            return Err(VideoError::Multipart(e.to_string()));
                        }
                    }
                }

                let file_url = pending.finish().await?;
                upload.file = Some(StoredFile { file_name, file_url });
            }
            "title" => {
                upload.title = Some(field.text().await.map_err(|e| VideoError::Multipart(e.to_string()))?);
            }
            "description" => {
                upload.description = Some(field.text().await.map_err(|e| VideoError::Multipart(e.to_string()))?);
            }
            other => debug!("Ignoring multipart field {}", other),
        }
    }

    Ok(upload)
}

pub async fn list_videos(State(state): State<AppState>) -> Result<Json<Vec<VideoResponse>>, AppError> {
    Ok(Json(VideoLibraryService::new(&state).list_videos().await?))
}

pub async fn get_video(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> Result<Json<VideoResponse>, AppError> {
    Ok(Json(VideoLibraryService::new(&state).get_video(&video_id).await?))
}

#[axum::debug_handler]
pub async fn upload_video(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<VideoResponse>), AppError> {
    // Reject before any of the body is read.
    require_role(&user, Role::Doctor)?;

    let library = VideoLibraryService::new(&state);
    let upload = read_upload(library.uploads(), multipart).await?;
    let video = library.upload_video(&user, upload).await?;
    Ok((StatusCode::CREATED, Json(video)))
}
