use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use shared_models::care::{Disease, DoctorPatient, MedicalRecord};
use shared_models::error::AppError;
use shared_models::user::{User, UserSummary};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignPatientRequest {
    pub patient_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MedicalInfoRequest {
    pub gender: String,
    pub age_group: String,
    pub disease_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatientListQuery {
    pub filter: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRef {
    pub id: Uuid,
    pub full_name: String,
}

impl From<&UserSummary> for PersonRef {
    fn from(summary: &UserSummary) -> Self {
        Self {
            id: summary.id,
            full_name: summary.full_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientContact {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentResponse {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub patient: PatientContact,
    pub created_at: DateTime<Utc>,
}

impl AssignmentResponse {
    pub fn new(edge: DoctorPatient, patient: &User) -> Self {
        Self {
            id: edge.id,
            doctor_id: edge.doctor_id,
            patient_id: edge.patient_id,
            patient: PatientContact {
                id: patient.id,
                full_name: patient.full_name.clone(),
                email: patient.email.clone(),
            },
            created_at: edge.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseBrief {
    pub id: Uuid,
    pub name: String,
    pub category: String,
}

impl From<&Disease> for DiseaseBrief {
    fn from(disease: &Disease) -> Self {
        Self {
            id: disease.id,
            name: disease.name.clone(),
            category: disease.category.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalInfoSummary {
    pub id: Uuid,
    pub gender: String,
    pub age_group: String,
    pub diseases: Vec<DiseaseBrief>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor: Option<PersonRef>,
}

impl From<&MedicalRecord> for MedicalInfoSummary {
    fn from(record: &MedicalRecord) -> Self {
        Self {
            id: record.info.id,
            gender: record.info.gender.clone(),
            age_group: record.info.age_group.clone(),
            diseases: record.diseases.iter().map(DiseaseBrief::from).collect(),
            updated_at: record.info.updated_at,
            doctor: record.doctor.as_ref().map(PersonRef::from),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientListItem {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical_info: Option<MedicalInfoSummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalInfoResponse {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Option<Uuid>,
    pub gender: String,
    pub age_group: String,
    pub diseases: Vec<DiseaseBrief>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub patient: PersonRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor: Option<PersonRef>,
}

impl MedicalInfoResponse {
    pub fn new(record: MedicalRecord, patient: &User) -> Self {
        Self {
            id: record.info.id,
            patient_id: record.info.patient_id,
            doctor_id: record.info.doctor_id,
            gender: record.info.gender,
            age_group: record.info.age_group,
            diseases: record.diseases.iter().map(DiseaseBrief::from).collect(),
            created_at: record.info.created_at,
            updated_at: record.info.updated_at,
            patient: PersonRef {
                id: patient.id,
                full_name: patient.full_name.clone(),
            },
            doctor: record.doctor.as_ref().map(PersonRef::from),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum CareError {
    #[error("patient not found")]
    PatientNotFound,

    #[error("patientId is required")]
    MissingPatientId,

    #[error("patient already assigned to this doctor")]
    AlreadyAssigned,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("invalid disease ids")]
    InvalidDiseaseIds,
}

impl From<CareError> for AppError {
    fn from(err: CareError) -> Self {
        match err {
            CareError::PatientNotFound => AppError::NotFound(err.to_string()),
            other => AppError::BadRequest(other.to_string()),
        }
    }
}
