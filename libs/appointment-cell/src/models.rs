// libs/appointment-cell/src/models.rs
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use shared_models::appointment::{Appointment, AppointmentStatus};
use shared_models::error::AppError;
use shared_models::user::UserSummary;

pub const DEFAULT_DURATION_MIN: i32 = 30;

// ==============================================================================
// REQUESTS
// ==============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    pub doctor_id: Option<String>,
    /// RFC 3339 timestamp.
    pub scheduled_at: Option<String>,
    pub duration_min: Option<i32>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointmentRequest {
    pub scheduled_at: Option<String>,
    pub duration_min: Option<i32>,
    pub reason: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusChangeRequest {
    #[serde(default)]
    pub status: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppointmentListQuery {
    pub status: Option<String>,
}

// ==============================================================================
// RESPONSES
// ==============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientSummary {
    pub id: Uuid,
    pub full_name: String,
}

impl From<UserSummary> for PatientSummary {
    fn from(summary: UserSummary) -> Self {
        Self {
            id: summary.id,
            full_name: summary.full_name,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AppointmentResponse {
    #[serde(flatten)]
    pub appointment: Appointment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor: Option<UserSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient: Option<PatientSummary>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, Error, PartialEq)]
pub enum AppointmentError {
    #[error("appointment not found")]
    NotFound,

    #[error("doctor not found")]
    DoctorNotFound,

    #[error("doctorId is required")]
    MissingDoctor,

    #[error("invalid scheduledAt")]
    InvalidScheduledAt,

    #[error("durationMin must be positive")]
    InvalidDuration,

    #[error("unknown appointment status: {0}")]
    UnknownStatus(String),

    #[error("no updates provided")]
    NoUpdates,

    #[error("status change not permitted")]
    StatusChangeNotPermitted,

    #[error("invalid status transition from {from} to {to}")]
    InvalidStatusTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::NotFound | AppointmentError::DoctorNotFound => AppError::NotFound(err.to_string()),
            other => AppError::BadRequest(other.to_string()),
        }
    }
}
