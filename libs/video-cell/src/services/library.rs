use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use shared_database::ClinicStore;
use shared_models::auth::Role;
use shared_models::error::AppError;
use shared_models::user::User;
use shared_models::video::{NewVideo, VideoListing};
use shared_utils::policy::require_role;
use shared_utils::AppState;

use crate::models::{VideoError, VideoResponse, VideoUpload};
use crate::services::storage::{default_title, UploadStore};

pub struct VideoLibraryService {
    store: Arc<dyn ClinicStore>,
    uploads: UploadStore,
}

impl VideoLibraryService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            uploads: UploadStore::new(&state.config.upload_dir),
        }
    }

    pub fn uploads(&self) -> &UploadStore {
        &self.uploads
    }

    pub async fn list_videos(&self) -> Result<Vec<VideoResponse>, AppError> {
        let videos = self.store.list_videos().await?;
        Ok(videos.into_iter().map(VideoResponse::from).collect())
    }

    pub async fn get_video(&self, video_id: &str) -> Result<VideoResponse, AppError> {
        let id = Uuid::parse_str(video_id).map_err(|_| VideoError::NotFound)?;
        let listing = self.store.find_video(id).await?.ok_or(VideoError::NotFound)?;
        Ok(listing.into())
    }

    pub async fn upload_video(&self, caller: &User, upload: VideoUpload) -> Result<VideoResponse, AppError> {
        require_role(caller, Role::Doctor)?;

        let file = upload.file.ok_or(VideoError::FileRequired)?;

        let title = match upload.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => default_title(&file.file_name),
        };

        let video = self
            .store
            .insert_video(NewVideo {
                title,
                description: upload.description.unwrap_or_default(),
                file_path: file.file_url,
                thumbnail: None,
                uploader_id: caller.id,
                public: true,
            })
            .await?;

        info!("Video {} uploaded by {}", video.id, caller.id);
        Ok(VideoListing {
            video,
            uploader: Some(caller.summary()),
        }
        .into())
    }
}
