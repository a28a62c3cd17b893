use serde::Serialize;
use uuid::Uuid;

use shared_models::user::{DoctorDetails, PatientDetails, User};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorEntry {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub doctor_profile: DoctorDetails,
}

impl From<User> for DoctorEntry {
    fn from(user: User) -> Self {
        Self {
            doctor_profile: user.doctor_profile.map(|p| p.details).unwrap_or_default(),
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            phone: user.phone,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientEntry {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub patient_profile: PatientDetails,
}

impl From<User> for PatientEntry {
    fn from(user: User) -> Self {
        Self {
            patient_profile: user.patient_profile.map(|p| p.details).unwrap_or_default(),
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            phone: user.phone,
        }
    }
}
