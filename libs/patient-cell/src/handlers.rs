use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;

use shared_models::care::Disease;
use shared_models::error::AppError;
use shared_models::user::User;
use shared_utils::AppState;

use crate::models::{
    AssignPatientRequest, AssignmentResponse, MedicalInfoRequest, MedicalInfoResponse, PatientListItem,
    PatientListQuery,
};
use crate::services::CareLedgerService;

#[axum::debug_handler]
pub async fn assign_patient(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    WithRejection(Json(request), _): WithRejection<Json<AssignPatientRequest>, AppError>,
) -> Result<(StatusCode, Json<AssignmentResponse>), AppError> {
    let assignment = CareLedgerService::new(&state).assign_patient(&user, request).await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

#[axum::debug_handler]
pub async fn list_patients(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(query): Query<PatientListQuery>,
) -> Result<Json<Vec<PatientListItem>>, AppError> {
    let patients = CareLedgerService::new(&state).list_patients(&user, query).await?;
    Ok(Json(patients))
}

#[axum::debug_handler]
pub async fn update_medical_info(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(patient_id): Path<String>,
    WithRejection(Json(request), _): WithRejection<Json<MedicalInfoRequest>, AppError>,
) -> Result<Json<MedicalInfoResponse>, AppError> {
    let info = CareLedgerService::new(&state)
        .write_medical_info(&user, &patient_id, request)
        .await?;
    Ok(Json(info))
}

pub async fn list_diseases(State(state): State<AppState>) -> Result<Json<Vec<Disease>>, AppError> {
    let diseases = CareLedgerService::new(&state).list_diseases().await?;
    Ok(Json(diseases))
}
