use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::error::AppError;
use shared_models::user::{DoctorDetails, PatientDetails, User};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub role: String,
    pub doctor_profile: Option<DoctorDetails>,
    pub patient_profile: Option<PatientDetails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
    pub expires_in: u64,
    pub token_type: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: User,
}

#[derive(Debug, Error, PartialEq)]
pub enum RegistrationError {
    #[error("full name is required")]
    MissingFullName,

    #[error("invalid email")]
    InvalidEmail,

    #[error("password must be at least {0} characters")]
    PasswordTooShort(usize),

    #[error("role must be doctor or patient")]
    InvalidRole,

    #[error("doctor profile with speciality is required")]
    MissingSpeciality,

    #[error("email already registered")]
    EmailTaken,

    #[error("invalid email or password")]
    InvalidCredentials,
}

impl From<RegistrationError> for AppError {
    fn from(err: RegistrationError) -> Self {
        match err {
            RegistrationError::InvalidCredentials => AppError::Auth(err.to_string()),
            other => AppError::ValidationError(other.to_string()),
        }
    }
}
