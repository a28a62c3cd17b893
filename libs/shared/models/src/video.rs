use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user::UserSummary;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub file_path: String,
    pub thumbnail: Option<String>,
    pub uploader_id: Option<Uuid>,
    pub public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewVideo {
    pub title: String,
    pub description: String,
    pub file_path: String,
    pub thumbnail: Option<String>,
    pub uploader_id: Uuid,
    pub public: bool,
}

#[derive(Debug, Clone)]
pub struct VideoListing {
    pub video: Video,
    pub uploader: Option<UserSummary>,
}
