use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use shared_models::appointment::{Appointment, AppointmentChanges, AppointmentFilter, AppointmentStatus, NewAppointment};
use shared_models::auth::Role;
use shared_models::care::{
    Disease, DiseaseSeed, DoctorPatient, MedicalInfoWrite, MedicalRecord, PatientChart,
    PatientMedicalInfo, PatientScope,
};
use shared_models::user::{
    DoctorProfile, NewProfile, NewUser, PatientProfile, User, UserSummary, DEFAULT_USER_STATUS,
};
use shared_models::video::{NewVideo, Video, VideoListing};

use crate::store::{ClinicStore, DbError, DbResult};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    doctor_profiles: HashMap<Uuid, DoctorProfile>,
    patient_profiles: HashMap<Uuid, PatientProfile>,
    appointments: HashMap<Uuid, Appointment>,
    assignments: Vec<DoctorPatient>,
    diseases: HashMap<Uuid, Disease>,
    medical_infos: HashMap<Uuid, PatientMedicalInfo>,
    medical_info_diseases: HashMap<Uuid, BTreeSet<Uuid>>,
    videos: HashMap<Uuid, Video>,
}

impl Tables {
    fn hydrate(&self, user: &User) -> User {
        let mut user = user.clone();
        user.doctor_profile = self.doctor_profiles.get(&user.id).cloned();
        user.patient_profile = self.patient_profiles.get(&user.id).cloned();
        user
    }

    fn summary(&self, id: Uuid) -> Option<UserSummary> {
        self.users.get(&id).map(User::summary)
    }

    fn sorted_diseases<'a>(&self, ids: impl IntoIterator<Item = &'a Uuid>) -> Vec<Disease> {
        let mut diseases: Vec<Disease> = ids
            .into_iter()
            .filter_map(|id| self.diseases.get(id).cloned())
            .collect();
        diseases.sort_by(|a, b| (&a.category, &a.name).cmp(&(&b.category, &b.name)));
        diseases
    }

    fn medical_record(&self, patient_id: Uuid) -> Option<MedicalRecord> {
        let info = self.medical_infos.get(&patient_id)?.clone();
        let diseases = self
            .medical_info_diseases
            .get(&info.id)
            .map(|ids| self.sorted_diseases(ids))
            .unwrap_or_default();
        let doctor = info.doctor_id.and_then(|id| self.summary(id));

        Some(MedicalRecord {
            info,
            diseases,
            doctor,
        })
    }

    fn listing(&self, video: &Video) -> VideoListing {
        VideoListing {
            video: video.clone(),
            uploader: video.uploader_id.and_then(|id| self.summary(id)),
        }
    }
}

/// Lock-guarded in-process store. Every operation runs under a single write
/// or read guard, which makes multi-row writes atomic.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClinicStore for MemoryStore {
    async fn create_user(&self, new_user: NewUser) -> DbResult<User> {
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.email == new_user.email) {
            return Err(DbError::UniqueViolation("users.email".to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: new_user.email,
            password_hash: new_user.password_hash,
            full_name: new_user.full_name,
            phone: new_user.phone,
            role: new_user.role,
            status: DEFAULT_USER_STATUS.to_string(),
            created_at: now,
            updated_at: now,
            doctor_profile: None,
            patient_profile: None,
        };

        match new_user.profile {
            NewProfile::Doctor(details) => {
                tables.doctor_profiles.insert(
                    user.id,
                    DoctorProfile {
                        id: Uuid::new_v4(),
                        user_id: user.id,
                        details,
                        created_at: now,
                        updated_at: now,
                    },
                );
            }
            NewProfile::Patient(details) => {
                tables.patient_profiles.insert(
                    user.id,
                    PatientProfile {
                        id: Uuid::new_v4(),
                        user_id: user.id,
                        details,
                        created_at: now,
                        updated_at: now,
                    },
                );
            }
            NewProfile::None => {}
        }

        tables.users.insert(user.id, user.clone());
        debug!("Created user {} ({})", user.id, user.role);
        Ok(tables.hydrate(&user))
    }

    async fn find_user_by_id(&self, id: Uuid) -> DbResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&id).map(|u| tables.hydrate(u)))
    }

    async fn find_user_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.email == email)
            .map(|u| tables.hydrate(u)))
    }

    async fn list_users_by_role(&self, role: Role) -> DbResult<Vec<User>> {
        let tables = self.tables.read().await;
        let mut users: Vec<User> = tables
            .users
            .values()
            .filter(|u| u.role == role)
            .map(|u| tables.hydrate(u))
            .collect();
        users.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(users)
    }

    async fn user_summaries(&self, ids: &[Uuid]) -> DbResult<Vec<UserSummary>> {
        let tables = self.tables.read().await;
        Ok(ids.iter().filter_map(|id| tables.summary(*id)).collect())
    }

    async fn insert_appointment(&self, new_appointment: NewAppointment) -> DbResult<Appointment> {
        let mut tables = self.tables.write().await;

        for id in [new_appointment.doctor_id, new_appointment.patient_id] {
            if !tables.users.contains_key(&id) {
                return Err(DbError::UnknownReference(format!("user {}", id)));
            }
        }

        let now = Utc::now();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            doctor_id: new_appointment.doctor_id,
            patient_id: new_appointment.patient_id,
            scheduled_at: new_appointment.scheduled_at,
            duration_min: new_appointment.duration_min,
            status: AppointmentStatus::Pending,
            reason: new_appointment.reason,
            notes: String::new(),
            created_at: now,
            updated_at: now,
        };
        tables.appointments.insert(appointment.id, appointment.clone());
        Ok(appointment)
    }

    async fn find_appointment(&self, id: Uuid) -> DbResult<Option<Appointment>> {
        Ok(self.tables.read().await.appointments.get(&id).cloned())
    }

    async fn list_appointments(&self, filter: &AppointmentFilter) -> DbResult<Vec<Appointment>> {
        let tables = self.tables.read().await;
        let mut appointments: Vec<Appointment> = tables
            .appointments
            .values()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        appointments.sort_by(|a, b| b.scheduled_at.cmp(&a.scheduled_at));
        Ok(appointments)
    }

    async fn update_appointment(&self, id: Uuid, changes: AppointmentChanges) -> DbResult<Appointment> {
        let mut tables = self.tables.write().await;
        let appointment = tables.appointments.get_mut(&id).ok_or(DbError::NotFound)?;
        changes.apply_to(appointment);
        appointment.updated_at = Utc::now();
        Ok(appointment.clone())
    }

    async fn find_assignment(&self, doctor_id: Uuid, patient_id: Uuid) -> DbResult<Option<DoctorPatient>> {
        let tables = self.tables.read().await;
        Ok(tables
            .assignments
            .iter()
            .find(|a| a.doctor_id == doctor_id && a.patient_id == patient_id)
            .cloned())
    }

    async fn insert_assignment(&self, doctor_id: Uuid, patient_id: Uuid) -> DbResult<DoctorPatient> {
        let mut tables = self.tables.write().await;

        if tables
            .assignments
            .iter()
            .any(|a| a.doctor_id == doctor_id && a.patient_id == patient_id)
        {
            return Err(DbError::UniqueViolation("doctor_patients.doctor_id_patient_id".to_string()));
        }

        let assignment = DoctorPatient {
            id: Uuid::new_v4(),
            doctor_id,
            patient_id,
            created_at: Utc::now(),
        };
        tables.assignments.push(assignment.clone());
        Ok(assignment)
    }

    async fn list_patient_charts(&self, scope: PatientScope) -> DbResult<Vec<PatientChart>> {
        let tables = self.tables.read().await;

        let mut patients: Vec<&User> = match scope {
            PatientScope::All => tables.users.values().filter(|u| u.role == Role::Patient).collect(),
            PatientScope::AssignedTo(doctor_id) => tables
                .assignments
                .iter()
                .filter(|a| a.doctor_id == doctor_id)
                .filter_map(|a| tables.users.get(&a.patient_id))
                .collect(),
        };
        patients.sort_by(|a, b| a.full_name.cmp(&b.full_name));

        Ok(patients
            .into_iter()
            .map(|patient| PatientChart {
                patient: tables.hydrate(patient),
                medical_info: tables.medical_record(patient.id),
            })
            .collect())
    }

    async fn find_diseases(&self, ids: &[Uuid]) -> DbResult<Vec<Disease>> {
        let tables = self.tables.read().await;
        let unique: BTreeSet<Uuid> = ids.iter().copied().collect();
        Ok(tables.sorted_diseases(&unique))
    }

    async fn write_medical_info(&self, write: MedicalInfoWrite) -> DbResult<MedicalRecord> {
        let mut guard = self.tables.write().await;
        let tables = &mut *guard;

        let disease_ids: BTreeSet<Uuid> = write.disease_ids.iter().copied().collect();
        if let Some(missing) = disease_ids.iter().find(|id| !tables.diseases.contains_key(id)) {
            return Err(DbError::UnknownReference(format!("disease {}", missing)));
        }

        let now = Utc::now();
        let info = match tables.medical_infos.get_mut(&write.patient_id) {
            Some(existing) => {
                existing.doctor_id = Some(write.doctor_id);
                existing.gender = write.gender;
                existing.age_group = write.age_group;
                existing.updated_at = now;
                existing.clone()
            }
            None => {
                let created = PatientMedicalInfo {
                    id: Uuid::new_v4(),
                    patient_id: write.patient_id,
                    doctor_id: Some(write.doctor_id),
                    gender: write.gender,
                    age_group: write.age_group,
                    created_at: now,
                    updated_at: now,
                };
                tables.medical_infos.insert(write.patient_id, created.clone());
                created
            }
        };

        tables.medical_info_diseases.insert(info.id, disease_ids);

        tables.medical_record(write.patient_id).ok_or(DbError::NotFound)
    }

    async fn list_diseases(&self) -> DbResult<Vec<Disease>> {
        let tables = self.tables.read().await;
        Ok(tables.sorted_diseases(tables.diseases.keys()))
    }

    async fn seed_diseases(&self, catalog: &[DiseaseSeed]) -> DbResult<usize> {
        let mut tables = self.tables.write().await;
        let mut inserted = 0;

        for seed in catalog {
            if tables.diseases.values().any(|d| d.name == seed.name) {
                continue;
            }
            let disease = Disease {
                id: Uuid::new_v4(),
                name: seed.name.to_string(),
                category: seed.category.to_string(),
                description: seed.description.to_string(),
                created_at: Utc::now(),
            };
            tables.diseases.insert(disease.id, disease);
            inserted += 1;
        }

        Ok(inserted)
    }

    async fn insert_video(&self, new_video: NewVideo) -> DbResult<Video> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let video = Video {
            id: Uuid::new_v4(),
            title: new_video.title,
            description: new_video.description,
            file_path: new_video.file_path,
            thumbnail: new_video.thumbnail,
            uploader_id: Some(new_video.uploader_id),
            public: new_video.public,
            created_at: now,
            updated_at: now,
        };
        tables.videos.insert(video.id, video.clone());
        Ok(video)
    }

    async fn find_video(&self, id: Uuid) -> DbResult<Option<VideoListing>> {
        let tables = self.tables.read().await;
        Ok(tables.videos.get(&id).map(|v| tables.listing(v)))
    }

    async fn list_videos(&self) -> DbResult<Vec<VideoListing>> {
        let tables = self.tables.read().await;
        let mut listings: Vec<VideoListing> = tables.videos.values().map(|v| tables.listing(v)).collect();
        listings.sort_by(|a, b| b.video.created_at.cmp(&a.video.created_at));
        Ok(listings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::Duration;
    use shared_models::user::DoctorDetails;

    use crate::seed::DISEASE_CATALOG;

    fn new_user(email: &str, name: &str, role: Role) -> NewUser {
        NewUser {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            full_name: name.to_string(),
            phone: String::new(),
            role,
            profile: match role {
                Role::Doctor => NewProfile::Doctor(DoctorDetails {
                    speciality: "General".to_string(),
                    ..Default::default()
                }),
                Role::Patient => NewProfile::Patient(Default::default()),
                Role::Admin => NewProfile::None,
            },
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_leaves_first_user_intact() {
        let store = MemoryStore::new();
        let first = store
            .create_user(new_user("a@example.com", "Alice", Role::Doctor))
            .await
            .unwrap();

        let second = store
            .create_user(new_user("a@example.com", "Impostor", Role::Patient))
            .await;
        assert_matches!(second, Err(DbError::UniqueViolation(_)));

        let stored = store.find_user_by_email("a@example.com").await.unwrap().unwrap();
        assert_eq!(stored.id, first.id);
        assert_eq!(stored.full_name, "Alice");
        assert!(stored.doctor_profile.is_some());
        assert_eq!(store.list_users_by_role(Role::Patient).await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_seeding_is_idempotent_and_ordered() {
        let store = MemoryStore::new();
        assert_eq!(store.seed_diseases(&DISEASE_CATALOG).await.unwrap(), 20);
        assert_eq!(store.seed_diseases(&DISEASE_CATALOG).await.unwrap(), 0);

        let diseases = store.list_diseases().await.unwrap();
        assert_eq!(diseases.len(), 20);
        let keys: Vec<(String, String)> = diseases
            .iter()
            .map(|d| (d.category.clone(), d.name.clone()))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[tokio::test]
    async fn test_medical_info_disease_set_is_replaced() {
        let store = MemoryStore::new();
        store.seed_diseases(&DISEASE_CATALOG).await.unwrap();
        let doctor = store.create_user(new_user("d@example.com", "Doc", Role::Doctor)).await.unwrap();
        let patient = store.create_user(new_user("p@example.com", "Pat", Role::Patient)).await.unwrap();
        let diseases = store.list_diseases().await.unwrap();

        let write = |ids: Vec<Uuid>| MedicalInfoWrite {
            patient_id: patient.id,
            doctor_id: doctor.id,
            gender: "female".to_string(),
            age_group: "19-35".to_string(),
            disease_ids: ids,
        };

        store.write_medical_info(write(vec![diseases[0].id, diseases[1].id])).await.unwrap();
        let record = store.write_medical_info(write(vec![diseases[2].id])).await.unwrap();

        assert_eq!(record.diseases.len(), 1);
        assert_eq!(record.diseases[0].id, diseases[2].id);

        let cleared = store.write_medical_info(write(vec![])).await.unwrap();
        assert!(cleared.diseases.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_disease_rejects_whole_write() {
        let store = MemoryStore::new();
        let doctor = store.create_user(new_user("d@example.com", "Doc", Role::Doctor)).await.unwrap();
        let patient = store.create_user(new_user("p@example.com", "Pat", Role::Patient)).await.unwrap();

        let result = store
            .write_medical_info(MedicalInfoWrite {
                patient_id: patient.id,
                doctor_id: doctor.id,
                gender: "male".to_string(),
                age_group: "65+".to_string(),
                disease_ids: vec![Uuid::new_v4()],
            })
            .await;

        assert_matches!(result, Err(DbError::UnknownReference(_)));
        let charts = store.list_patient_charts(PatientScope::All).await.unwrap();
        assert!(charts[0].medical_info.is_none());
    }

    #[tokio::test]
    async fn test_appointments_filtered_and_newest_first() {
        let store = MemoryStore::new();
        let doctor = store.create_user(new_user("d@example.com", "Doc", Role::Doctor)).await.unwrap();
        let other = store.create_user(new_user("o@example.com", "Other", Role::Doctor)).await.unwrap();
        let patient = store.create_user(new_user("p@example.com", "Pat", Role::Patient)).await.unwrap();
        let base = Utc::now();

        for (doctor_id, offset) in [(doctor.id, 1), (doctor.id, 3), (other.id, 2)] {
            store
                .insert_appointment(NewAppointment {
                    doctor_id,
                    patient_id: patient.id,
                    scheduled_at: base + Duration::days(offset),
                    duration_min: 30,
                    reason: String::new(),
                })
                .await
                .unwrap();
        }

        let filter = AppointmentFilter {
            doctor_id: Some(doctor.id),
            ..Default::default()
        };
        let listed = store.list_appointments(&filter).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|a| a.doctor_id == doctor.id));
        assert!(listed[0].scheduled_at > listed[1].scheduled_at);
    }
}
