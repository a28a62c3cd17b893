use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_utils::extractor::auth_middleware;
use shared_utils::AppState;

use crate::handlers::*;

pub fn patient_routes(state: AppState) -> Router {
    let public_routes = Router::new().route("/diseases", get(list_diseases));

    let protected_routes = Router::new()
        .route("/", get(list_patients))
        .route("/assign", post(assign_patient))
        .route("/{id}/medical-info", post(update_medical_info))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
