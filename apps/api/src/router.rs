use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use serde_json::{json, Value};
use tower_http::services::ServeDir;

use appointment_cell::router::appointment_routes;
use auth_cell::router::auth_routes;
use patient_cell::router::patient_routes;
use prediction_cell::router::prediction_routes;
use shared_models::error::AppError;
use shared_utils::AppState;
use user_cell::router::user_routes;
use video_cell::models::VideoResponse;
use video_cell::router::video_routes;
use video_cell::services::library::VideoLibraryService;

#[derive(Debug, Serialize)]
struct HomeResponse {
    videos: Vec<VideoResponse>,
}

async fn home(State(state): State<AppState>) -> Result<Json<HomeResponse>, AppError> {
    let videos = VideoLibraryService::new(&state).list_videos().await?;
    Ok(Json(HomeResponse { videos }))
}

async fn status() -> Json<Value> {
    Json(json!({ "message": "Clinic API is running" }))
}

pub fn create_router(state: AppState) -> Router {
    let upload_dir = state.config.upload_dir.clone();

    Router::new()
        .route("/", get(home))
        .route("/api/status", get(status))
        .with_state(state.clone())
        .nest("/api/auth", auth_routes(state.clone()))
        .nest("/api/appointments", appointment_routes(state.clone()))
        .nest("/api/patients", patient_routes(state.clone()))
        .nest("/api/users", user_routes(state.clone()))
        .nest("/api/videos", video_routes(state.clone()))
        .nest("/api/ml", prediction_routes(state))
        .nest_service("/uploads", ServeDir::new(upload_dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use shared_models::video::NewVideo;
    use shared_utils::test_utils::{TestConfig, TestUser};
    use tower::ServiceExt;

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_status_endpoint() {
        let state = TestConfig::default().build_state().await;
        let (status, body) = get_json(create_router(state), "/api/status").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Clinic API is running");
    }

    #[tokio::test]
    async fn test_home_lists_videos() {
        let state = TestConfig::default().build_state().await;
        let doctor = TestUser::doctor("doc@example.com").insert(&state).await;
        state
            .store
            .insert_video(NewVideo {
                title: "Stretching".to_string(),
                description: String::new(),
                file_path: "/uploads/x_stretch.mp4".to_string(),
                thumbnail: None,
                uploader_id: doctor.id,
                public: true,
            })
            .await
            .unwrap();

        let (status, body) = get_json(create_router(state), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["videos"][0]["title"], "Stretching");
    }

    #[tokio::test]
    async fn test_uploads_are_served_statically() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("clip.mp4"), b"bytes").unwrap();
        let state = TestConfig::default().with_upload_dir(dir.path()).build_state().await;

        let request = Request::builder().uri("/uploads/clip.mp4").body(Body::empty()).unwrap();
        let response = create_router(state).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"bytes");
    }

    #[tokio::test]
    async fn test_cells_are_mounted_under_api() {
        let state = TestConfig::default().build_state().await;

        let (status, body) = get_json(create_router(state.clone()), "/api/patients/diseases").await;
        assert_eq!(status, StatusCode::OK);
        assert!(!body.as_array().unwrap().is_empty());

        let (status, _) = get_json(create_router(state), "/api/appointments").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
