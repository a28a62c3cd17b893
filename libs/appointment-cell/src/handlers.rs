// libs/appointment-cell/src/handlers.rs
use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;

use shared_models::error::AppError;
use shared_models::user::User;
use shared_utils::AppState;

use crate::models::{
    AppointmentListQuery, AppointmentResponse, CreateAppointmentRequest, StatusChangeRequest,
    UpdateAppointmentRequest,
};
use crate::services::booking::AppointmentBookingService;

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(query): Query<AppointmentListQuery>,
) -> Result<Json<Vec<AppointmentResponse>>, AppError> {
    let appointments = AppointmentBookingService::new(&state)
        .list_appointments(&user, query)
        .await?;
    Ok(Json(appointments))
}

#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    WithRejection(Json(request), _): WithRejection<Json<CreateAppointmentRequest>, AppError>,
) -> Result<(StatusCode, Json<AppointmentResponse>), AppError> {
    let appointment = AppointmentBookingService::new(&state)
        .create_appointment(&user, request)
        .await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<String>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateAppointmentRequest>, AppError>,
) -> Result<Json<AppointmentResponse>, AppError> {
    let appointment = AppointmentBookingService::new(&state)
        .update_appointment(&user, &appointment_id, request)
        .await?;
    Ok(Json(appointment))
}

#[axum::debug_handler]
pub async fn update_status(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<String>,
    WithRejection(Json(request), _): WithRejection<Json<StatusChangeRequest>, AppError>,
) -> Result<Json<AppointmentResponse>, AppError> {
    let appointment = AppointmentBookingService::new(&state)
        .change_status(&user, &appointment_id, request)
        .await?;
    Ok(Json(appointment))
}
