use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::Role;

pub const DEFAULT_USER_STATUS: &str = "active";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// Never leaves the process: skipped on serialization.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub full_name: String,
    pub phone: String,
    pub role: Role,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_profile: Option<DoctorProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_profile: Option<PatientProfile>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            full_name: self.full_name.clone(),
            role: self.role,
        }
    }
}

/// Compact view of a user embedded in other resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub full_name: String,
    pub role: Role,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DoctorDetails {
    pub speciality: String,
    pub experience_years: i32,
    pub license_number: String,
    pub clinic_name: String,
    pub city: String,
    pub bio: String,
    pub avatar_url: String,
    pub consultation_fee: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(flatten)]
    pub details: DoctorDetails,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatientDetails {
    pub date_of_birth: Option<DateTime<Utc>>,
    pub gender: String,
    pub blood_type: String,
    pub allergies: String,
    pub chronic_conditions: String,
    pub emergency_contact: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(flatten)]
    pub details: PatientDetails,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The role-specific profile created together with a user.
#[derive(Debug, Clone, PartialEq)]
pub enum NewProfile {
    Doctor(DoctorDetails),
    Patient(PatientDetails),
    None,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub phone: String,
    pub role: Role,
    pub profile: NewProfile,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_is_never_serialized() {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: "doc@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            full_name: "Dr. Who".to_string(),
            phone: String::new(),
            role: Role::Doctor,
            status: DEFAULT_USER_STATUS.to_string(),
            created_at: now,
            updated_at: now,
            doctor_profile: None,
            patient_profile: None,
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(!json.to_string().contains("argon2"));
        assert_eq!(json["fullName"], "Dr. Who");
    }

    #[test]
    fn test_doctor_profile_flattens_details() {
        let now = Utc::now();
        let profile = DoctorProfile {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            details: DoctorDetails {
                speciality: "Cardiology".to_string(),
                experience_years: 12,
                ..Default::default()
            },
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["speciality"], "Cardiology");
        assert_eq!(json["experienceYears"], 12);
    }
}
