use std::sync::Arc;

use axum::{middleware, routing::post, Extension, Router};

use shared_utils::extractor::auth_middleware;
use shared_utils::AppState;

use crate::handlers;
use crate::services::client::PredictionClient;

pub fn prediction_routes(state: AppState) -> Router {
    let client = Arc::new(PredictionClient::new(&state.config));

    Router::new()
        .route("/symptoms", post(handlers::predict_symptoms))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .layer(Extension(client))
        .with_state(state)
}
