use std::sync::Arc;

use axum::{extract::Extension, Json};
use axum_extra::extract::WithRejection;
use tracing::debug;

use shared_models::error::AppError;
use shared_models::user::User;

use crate::models::{PredictionResponse, SymptomsRequest};
use crate::services::client::PredictionClient;

#[axum::debug_handler]
pub async fn predict_symptoms(
    Extension(client): Extension<Arc<PredictionClient>>,
    Extension(user): Extension<User>,
    WithRejection(Json(symptoms), _): WithRejection<Json<SymptomsRequest>, AppError>,
) -> Result<Json<PredictionResponse>, AppError> {
    debug!("Symptom prediction requested by {}", user.id);

    Ok(Json(client.predict_symptoms(symptoms).await?))
}
