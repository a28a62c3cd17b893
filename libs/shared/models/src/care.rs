use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user::{User, UserSummary};

/// Assignment edge between a doctor and one of their patients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorPatient {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Disease {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Catalog entry used to seed the disease table.
#[derive(Debug, Clone, Copy)]
pub struct DiseaseSeed {
    pub name: &'static str,
    pub category: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientMedicalInfo {
    pub id: Uuid,
    pub patient_id: Uuid,
    /// Doctor who last wrote the record.
    pub doctor_id: Option<Uuid>,
    pub gender: String,
    pub age_group: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A medical-info row together with its disease set and author.
#[derive(Debug, Clone)]
pub struct MedicalRecord {
    pub info: PatientMedicalInfo,
    pub diseases: Vec<Disease>,
    pub doctor: Option<UserSummary>,
}

/// Full write of a patient's medical info. `disease_ids` becomes the complete
/// disease set; it is never merged with the previous one.
#[derive(Debug, Clone)]
pub struct MedicalInfoWrite {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub gender: String,
    pub age_group: String,
    pub disease_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatientScope {
    All,
    AssignedTo(Uuid),
}

#[derive(Debug, Clone)]
pub struct PatientChart {
    pub patient: User,
    pub medical_info: Option<MedicalRecord>,
}
