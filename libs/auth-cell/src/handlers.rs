use axum::{
    extract::{Extension, Json, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use tracing::debug;

use shared_models::error::AppError;
use shared_models::user::User;
use shared_utils::AppState;

use crate::models::{AuthResponse, LoginRequest, MeResponse, RegisterRequest};
use crate::services::registration::RegistrationService;

#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<RegisterRequest>, AppError>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    debug!("Registering new {} account", request.role);

    let response = RegistrationService::new(&state).register(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<LoginRequest>, AppError>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = RegistrationService::new(&state).login(request).await?;
    Ok(Json(response))
}

pub async fn me(Extension(user): Extension<User>) -> Json<MeResponse> {
    Json(MeResponse { user })
}
