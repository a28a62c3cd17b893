use axum::{middleware, routing::get, Router};

use shared_utils::extractor::auth_middleware;
use shared_utils::AppState;

use crate::handlers;

pub fn user_routes(state: AppState) -> Router {
    let public_routes = Router::new().route("/doctors", get(handlers::list_doctors));

    let protected_routes = Router::new()
        .route("/patients", get(handlers::list_patients))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
