use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use shared_models::error::AppError;
use shared_models::user::UserSummary;
use shared_models::video::VideoListing;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub file_url: String,
    pub thumbnail: String,
    pub public: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploader: Option<UserSummary>,
}

impl From<VideoListing> for VideoResponse {
    fn from(listing: VideoListing) -> Self {
        let video = listing.video;
        Self {
            id: video.id,
            title: video.title,
            description: video.description,
            file_url: video.file_path,
            thumbnail: video.thumbnail.unwrap_or_default(),
            public: video.public,
            created_at: video.created_at,
            uploader: listing.uploader,
        }
    }
}

/// A file already streamed into the upload directory.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub file_name: String,
    pub file_url: String,
}

/// A multipart upload after the form has been read.
#[derive(Debug, Default)]
pub struct VideoUpload {
    pub file: Option<StoredFile>,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Error)]
pub enum VideoError {
    #[error("video not found")]
    NotFound,

    #[error("video file is required")]
    FileRequired,

    #[error("malformed upload: {0}")]
    Multipart(String),

    #[error("failed to save video: {0}")]
    Storage(#[from] std::io::Error),
}

impl From<VideoError> for AppError {
    fn from(err: VideoError) -> Self {
        match err {
            VideoError::NotFound => AppError::NotFound(err.to_string()),
            VideoError::FileRequired | VideoError::Multipart(_) => AppError::BadRequest(err.to_string()),
            VideoError::Storage(e) => AppError::Internal(format!("failed to save video: {}", e)),
        }
    }
}
