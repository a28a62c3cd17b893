use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};

use shared_utils::extractor::auth_middleware;
use shared_utils::AppState;

use crate::handlers;

pub const MAX_UPLOAD_BYTES: usize = 512 * 1024 * 1024;

pub fn video_routes(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(handlers::list_videos))
        .route("/{id}", get(handlers::get_video));

    let protected_routes = Router::new()
        .route("/", post(handlers::upload_video))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
