use axum::{
    extract::{Extension, State},
    Json,
};

use shared_models::error::AppError;
use shared_models::user::User;
use shared_utils::AppState;

use crate::models::{DoctorEntry, PatientEntry};
use crate::services::directory::DirectoryService;

pub async fn list_doctors(State(state): State<AppState>) -> Result<Json<Vec<DoctorEntry>>, AppError> {
    Ok(Json(DirectoryService::new(&state).list_doctors().await?))
}

pub async fn list_patients(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<PatientEntry>>, AppError> {
    Ok(Json(DirectoryService::new(&state).list_patients(&user).await?))
}
