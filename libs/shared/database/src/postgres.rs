use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{FromRow, Postgres, QueryBuilder, Transaction};
use tracing::{debug, info};
use uuid::Uuid;

use shared_models::appointment::{Appointment, AppointmentChanges, AppointmentFilter, AppointmentStatus, NewAppointment};
use shared_models::auth::Role;
use shared_models::care::{
    Disease, DiseaseSeed, DoctorPatient, MedicalInfoWrite, MedicalRecord, PatientChart,
    PatientMedicalInfo, PatientScope,
};
use shared_models::user::{
    DoctorDetails, DoctorProfile, NewProfile, NewUser, PatientDetails, PatientProfile, User, UserSummary,
};
use shared_models::video::{NewVideo, Video, VideoListing};

use crate::store::{ClinicStore, DbError, DbResult};

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound,
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                DbError::UniqueViolation(db_err.constraint().unwrap_or("unique").to_string())
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                DbError::UnknownReference(db_err.constraint().unwrap_or("foreign key").to_string())
            }
            other => DbError::Query(other.to_string()),
        }
    }
}

fn parse_column<T: std::str::FromStr<Err = String>>(value: &str) -> DbResult<T> {
    value.parse().map_err(DbError::Query)
}

// ----------------------------------------------------------------------------
// Row types
// ----------------------------------------------------------------------------

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    full_name: String,
    phone: String,
    role: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> DbResult<User> {
        Ok(User {
            id: self.id,
            email: self.email,
            password_hash: self.password_hash,
            full_name: self.full_name,
            phone: self.phone,
            role: parse_column(&self.role)?,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
            doctor_profile: None,
            patient_profile: None,
        })
    }
}

#[derive(FromRow)]
struct SummaryRow {
    id: Uuid,
    full_name: String,
    role: String,
}

impl SummaryRow {
    fn into_summary(self) -> DbResult<UserSummary> {
        Ok(UserSummary {
            id: self.id,
            full_name: self.full_name,
            role: parse_column(&self.role)?,
        })
    }
}

#[derive(FromRow)]
struct DoctorProfileRow {
    id: Uuid,
    user_id: Uuid,
    speciality: String,
    experience_years: i32,
    license_number: String,
    clinic_name: String,
    city: String,
    bio: String,
    avatar_url: String,
    consultation_fee: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DoctorProfileRow> for DoctorProfile {
    fn from(row: DoctorProfileRow) -> Self {
        DoctorProfile {
            id: row.id,
            user_id: row.user_id,
            details: DoctorDetails {
                speciality: row.speciality,
                experience_years: row.experience_years,
                license_number: row.license_number,
                clinic_name: row.clinic_name,
                city: row.city,
                bio: row.bio,
                avatar_url: row.avatar_url,
                consultation_fee: row.consultation_fee,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct PatientProfileRow {
    id: Uuid,
    user_id: Uuid,
    date_of_birth: Option<DateTime<Utc>>,
    gender: String,
    blood_type: String,
    allergies: String,
    chronic_conditions: String,
    emergency_contact: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PatientProfileRow> for PatientProfile {
    fn from(row: PatientProfileRow) -> Self {
        PatientProfile {
            id: row.id,
            user_id: row.user_id,
            details: PatientDetails {
                date_of_birth: row.date_of_birth,
                gender: row.gender,
                blood_type: row.blood_type,
                allergies: row.allergies,
                chronic_conditions: row.chronic_conditions,
                emergency_contact: row.emergency_contact,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct AppointmentRow {
    id: Uuid,
    doctor_id: Uuid,
    patient_id: Uuid,
    scheduled_at: DateTime<Utc>,
    duration_min: i32,
    status: String,
    reason: String,
    notes: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AppointmentRow {
    fn into_appointment(self) -> DbResult<Appointment> {
        Ok(Appointment {
            id: self.id,
            doctor_id: self.doctor_id,
            patient_id: self.patient_id,
            scheduled_at: self.scheduled_at,
            duration_min: self.duration_min,
            status: parse_column(&self.status)?,
            reason: self.reason,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(FromRow)]
struct DiseaseRow {
    id: Uuid,
    name: String,
    category: String,
    description: String,
    created_at: DateTime<Utc>,
}

impl From<DiseaseRow> for Disease {
    fn from(row: DiseaseRow) -> Self {
        Disease {
            id: row.id,
            name: row.name,
            category: row.category,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

#[derive(FromRow)]
struct LinkedDiseaseRow {
    medical_info_id: Uuid,
    #[sqlx(flatten)]
    disease: DiseaseRow,
}

#[derive(FromRow)]
struct MedicalInfoRow {
    id: Uuid,
    patient_id: Uuid,
    doctor_id: Option<Uuid>,
    gender: String,
    age_group: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<MedicalInfoRow> for PatientMedicalInfo {
    fn from(row: MedicalInfoRow) -> Self {
        PatientMedicalInfo {
            id: row.id,
            patient_id: row.patient_id,
            doctor_id: row.doctor_id,
            gender: row.gender,
            age_group: row.age_group,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct DoctorPatientRow {
    id: Uuid,
    doctor_id: Uuid,
    patient_id: Uuid,
    created_at: DateTime<Utc>,
}

impl From<DoctorPatientRow> for DoctorPatient {
    fn from(row: DoctorPatientRow) -> Self {
        DoctorPatient {
            id: row.id,
            doctor_id: row.doctor_id,
            patient_id: row.patient_id,
            created_at: row.created_at,
        }
    }
}

#[derive(FromRow)]
struct VideoRow {
    id: Uuid,
    title: String,
    description: String,
    file_path: String,
    thumbnail: Option<String>,
    uploader_id: Option<Uuid>,
    public: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    uploader_name: Option<String>,
    uploader_role: Option<String>,
}

impl VideoRow {
    fn into_listing(self) -> DbResult<VideoListing> {
        let uploader = match (self.uploader_id, self.uploader_name, self.uploader_role) {
            (Some(id), Some(full_name), Some(role)) => Some(UserSummary {
                id,
                full_name,
                role: parse_column(&role)?,
            }),
            _ => None,
        };

        Ok(VideoListing {
            video: Video {
                id: self.id,
                title: self.title,
                description: self.description,
                file_path: self.file_path,
                thumbnail: self.thumbnail,
                uploader_id: self.uploader_id,
                public: self.public,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            uploader,
        })
    }
}

const USER_COLUMNS: &str =
    "id, email, password_hash, full_name, phone, role, status, created_at, updated_at";

const APPOINTMENT_COLUMNS: &str =
    "id, doctor_id, patient_id, scheduled_at, duration_min, status, reason, notes, created_at, updated_at";

const VIDEO_SELECT: &str = "SELECT v.id, v.title, v.description, v.file_path, v.thumbnail, \
     v.uploader_id, v.public, v.created_at, v.updated_at, \
     u.full_name AS uploader_name, u.role AS uploader_role \
     FROM videos v LEFT JOIN users u ON u.id = v.uploader_id";

// ----------------------------------------------------------------------------
// Store
// ----------------------------------------------------------------------------

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> DbResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(25)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(30))
            .max_lifetime(Duration::from_secs(5 * 60))
            .connect(database_url)
            .await?;

        info!("Database connection pool created successfully");
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> DbResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DbError::Migration(e.to_string()))?;
        info!("Database schema migrated");
        Ok(())
    }

    async fn attach_profiles(&self, mut users: Vec<User>) -> DbResult<Vec<User>> {
        if users.is_empty() {
            return Ok(users);
        }
        let ids: Vec<Uuid> = users.iter().map(|u| u.id).collect();

        let mut doctors: HashMap<Uuid, DoctorProfile> =
            sqlx::query_as::<_, DoctorProfileRow>("SELECT * FROM doctor_profiles WHERE user_id = ANY($1)")
                .bind(&ids)
                .fetch_all(&self.pool)
                .await?
                .into_iter()
                .map(|row| (row.user_id, DoctorProfile::from(row)))
                .collect();

        let mut patients: HashMap<Uuid, PatientProfile> =
            sqlx::query_as::<_, PatientProfileRow>("SELECT * FROM patient_profiles WHERE user_id = ANY($1)")
                .bind(&ids)
                .fetch_all(&self.pool)
                .await?
                .into_iter()
                .map(|row| (row.user_id, PatientProfile::from(row)))
                .collect();

        for user in users.iter_mut() {
            user.doctor_profile = doctors.remove(&user.id);
            user.patient_profile = patients.remove(&user.id);
        }
        Ok(users)
    }

    async fn fetch_users(&self, sql: &str, bind: Uuid) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, UserRow>(sql)
            .bind(bind)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(UserRow::into_user)
            .collect::<DbResult<Vec<_>>>()?;
        self.attach_profiles(users).await
    }

    async fn medical_records(&self, patient_ids: &[Uuid]) -> DbResult<HashMap<Uuid, MedicalRecord>> {
        let infos: Vec<PatientMedicalInfo> = sqlx::query_as::<_, MedicalInfoRow>(
            "SELECT * FROM patient_medical_infos WHERE patient_id = ANY($1)",
        )
        .bind(patient_ids)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(PatientMedicalInfo::from)
        .collect();

        if infos.is_empty() {
            return Ok(HashMap::new());
        }

        let info_ids: Vec<Uuid> = infos.iter().map(|i| i.id).collect();
        let mut diseases_by_info: HashMap<Uuid, Vec<Disease>> = HashMap::new();
        let linked = sqlx::query_as::<_, LinkedDiseaseRow>(
            "SELECT l.medical_info_id, d.id, d.name, d.category, d.description, d.created_at \
             FROM patient_medical_info_diseases l JOIN diseases d ON d.id = l.disease_id \
             WHERE l.medical_info_id = ANY($1) ORDER BY d.category ASC, d.name ASC",
        )
        .bind(&info_ids)
        .fetch_all(&self.pool)
        .await?;
        for row in linked {
            diseases_by_info
                .entry(row.medical_info_id)
                .or_default()
                .push(row.disease.into());
        }

        let doctor_ids: Vec<Uuid> = infos.iter().filter_map(|i| i.doctor_id).collect();
        let doctors: HashMap<Uuid, UserSummary> = self
            .user_summaries(&doctor_ids)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        Ok(infos
            .into_iter()
            .map(|info| {
                let diseases = diseases_by_info.remove(&info.id).unwrap_or_default();
                let doctor = info.doctor_id.and_then(|id| doctors.get(&id).cloned());
                (
                    info.patient_id,
                    MedicalRecord {
                        info,
                        diseases,
                        doctor,
                    },
                )
            })
            .collect())
    }

    async fn insert_profile(tx: &mut Transaction<'_, Postgres>, user_id: Uuid, profile: NewProfile) -> DbResult<()> {
        match profile {
            NewProfile::Doctor(d) => {
                sqlx::query(
                    "INSERT INTO doctor_profiles (id, user_id, speciality, experience_years, license_number, \
                     clinic_name, city, bio, avatar_url, consultation_fee) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
                )
                .bind(Uuid::new_v4())
                .bind(user_id)
                .bind(d.speciality)
                .bind(d.experience_years)
                .bind(d.license_number)
                .bind(d.clinic_name)
                .bind(d.city)
                .bind(d.bio)
                .bind(d.avatar_url)
                .bind(d.consultation_fee)
                .execute(&mut **tx)
                .await?;
            }
            NewProfile::Patient(p) => {
                sqlx::query(
                    "INSERT INTO patient_profiles (id, user_id, date_of_birth, gender, blood_type, \
                     allergies, chronic_conditions, emergency_contact) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
                )
                .bind(Uuid::new_v4())
                .bind(user_id)
                .bind(p.date_of_birth)
                .bind(p.gender)
                .bind(p.blood_type)
                .bind(p.allergies)
                .bind(p.chronic_conditions)
                .bind(p.emergency_contact)
                .execute(&mut **tx)
                .await?;
            }
            NewProfile::None => {}
        }
        Ok(())
    }
}

#[async_trait]
impl ClinicStore for PgStore {
    async fn create_user(&self, new_user: NewUser) -> DbResult<User> {
        let mut tx = self.pool.begin().await?;
        let user_id = Uuid::new_v4();

        sqlx::query(
            "INSERT INTO users (id, email, password_hash, full_name, phone, role) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(user_id)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(&new_user.full_name)
        .bind(&new_user.phone)
        .bind(new_user.role.as_str())
        .execute(&mut *tx)
        .await?;

        // Any failure below drops `tx` uncommitted, rolling back the user row.
        Self::insert_profile(&mut tx, user_id, new_user.profile).await?;
        tx.commit().await?;

        debug!("Created user {} ({})", user_id, new_user.role);
        self.find_user_by_id(user_id).await?.ok_or(DbError::NotFound)
    }

    async fn find_user_by_id(&self, id: Uuid) -> DbResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        Ok(self.fetch_users(&sql, id).await?.into_iter().next())
    }

    async fn find_user_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(self.attach_profiles(vec![row.into_user()?]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list_users_by_role(&self, role: Role) -> DbResult<Vec<User>> {
        let sql = format!(
            "SELECT {} FROM users WHERE role = $1 ORDER BY full_name ASC",
            USER_COLUMNS
        );
        let users = sqlx::query_as::<_, UserRow>(&sql)
            .bind(role.as_str())
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(UserRow::into_user)
            .collect::<DbResult<Vec<_>>>()?;
        self.attach_profiles(users).await
    }

    async fn user_summaries(&self, ids: &[Uuid]) -> DbResult<Vec<UserSummary>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, SummaryRow>("SELECT id, full_name, role FROM users WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(SummaryRow::into_summary)
            .collect()
    }

    async fn insert_appointment(&self, new_appointment: NewAppointment) -> DbResult<Appointment> {
        let sql = format!(
            "INSERT INTO appointments (id, doctor_id, patient_id, scheduled_at, duration_min, status, reason) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            APPOINTMENT_COLUMNS
        );
        sqlx::query_as::<_, AppointmentRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(new_appointment.doctor_id)
            .bind(new_appointment.patient_id)
            .bind(new_appointment.scheduled_at)
            .bind(new_appointment.duration_min)
            .bind(AppointmentStatus::Pending.as_str())
            .bind(new_appointment.reason)
            .fetch_one(&self.pool)
            .await?
            .into_appointment()
    }

    async fn find_appointment(&self, id: Uuid) -> DbResult<Option<Appointment>> {
        let sql = format!("SELECT {} FROM appointments WHERE id = $1", APPOINTMENT_COLUMNS);
        sqlx::query_as::<_, AppointmentRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(AppointmentRow::into_appointment)
            .transpose()
    }

    async fn list_appointments(&self, filter: &AppointmentFilter) -> DbResult<Vec<Appointment>> {
        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM appointments WHERE TRUE",
            APPOINTMENT_COLUMNS
        ));
        if let Some(doctor_id) = filter.doctor_id {
            query.push(" AND doctor_id = ").push_bind(doctor_id);
        }
        if let Some(patient_id) = filter.patient_id {
            query.push(" AND patient_id = ").push_bind(patient_id);
        }
        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status.as_str());
        }
        query.push(" ORDER BY scheduled_at DESC");

        query
            .build_query_as::<AppointmentRow>()
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(AppointmentRow::into_appointment)
            .collect()
    }

    async fn update_appointment(&self, id: Uuid, changes: AppointmentChanges) -> DbResult<Appointment> {
        let mut query = QueryBuilder::<Postgres>::new("UPDATE appointments SET updated_at = now()");
        if let Some(scheduled_at) = changes.scheduled_at {
            query.push(", scheduled_at = ").push_bind(scheduled_at);
        }
        if let Some(duration_min) = changes.duration_min {
            query.push(", duration_min = ").push_bind(duration_min);
        }
        if let Some(reason) = changes.reason {
            query.push(", reason = ").push_bind(reason);
        }
        if let Some(notes) = changes.notes {
            query.push(", notes = ").push_bind(notes);
        }
        if let Some(status) = changes.status {
            query.push(", status = ").push_bind(status.as_str());
        }
        query.push(" WHERE id = ").push_bind(id);
        query.push(format!(" RETURNING {}", APPOINTMENT_COLUMNS));

        query
            .build_query_as::<AppointmentRow>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DbError::NotFound)?
            .into_appointment()
    }

    async fn find_assignment(&self, doctor_id: Uuid, patient_id: Uuid) -> DbResult<Option<DoctorPatient>> {
        Ok(sqlx::query_as::<_, DoctorPatientRow>(
            "SELECT id, doctor_id, patient_id, created_at FROM doctor_patients \
             WHERE doctor_id = $1 AND patient_id = $2",
        )
        .bind(doctor_id)
        .bind(patient_id)
        .fetch_optional(&self.pool)
        .await?
        .map(DoctorPatient::from))
    }

    async fn insert_assignment(&self, doctor_id: Uuid, patient_id: Uuid) -> DbResult<DoctorPatient> {
        Ok(sqlx::query_as::<_, DoctorPatientRow>(
            "INSERT INTO doctor_patients (id, doctor_id, patient_id) VALUES ($1, $2, $3) \
             RETURNING id, doctor_id, patient_id, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(doctor_id)
        .bind(patient_id)
        .fetch_one(&self.pool)
        .await?
        .into())
    }

    async fn list_patient_charts(&self, scope: PatientScope) -> DbResult<Vec<PatientChart>> {
        let patients = match scope {
            PatientScope::All => self.list_users_by_role(Role::Patient).await?,
            PatientScope::AssignedTo(doctor_id) => {
                let sql = format!(
                    "SELECT {} FROM users WHERE id IN \
                     (SELECT patient_id FROM doctor_patients WHERE doctor_id = $1) \
                     ORDER BY full_name ASC",
                    USER_COLUMNS
                );
                self.fetch_users(&sql, doctor_id).await?
            }
        };

        let ids: Vec<Uuid> = patients.iter().map(|p| p.id).collect();
        let mut records = self.medical_records(&ids).await?;

        Ok(patients
            .into_iter()
            .map(|patient| {
                let medical_info = records.remove(&patient.id);
                PatientChart { patient, medical_info }
            })
            .collect())
    }

    async fn find_diseases(&self, ids: &[Uuid]) -> DbResult<Vec<Disease>> {
        Ok(sqlx::query_as::<_, DiseaseRow>(
            "SELECT id, name, category, description, created_at FROM diseases \
             WHERE id = ANY($1) ORDER BY category ASC, name ASC",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Disease::from)
        .collect())
    }

    async fn write_medical_info(&self, write: MedicalInfoWrite) -> DbResult<MedicalRecord> {
        let mut tx = self.pool.begin().await?;

        let info_id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO patient_medical_infos (id, patient_id, doctor_id, gender, age_group) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (patient_id) DO UPDATE SET doctor_id = EXCLUDED.doctor_id, \
             gender = EXCLUDED.gender, age_group = EXCLUDED.age_group, updated_at = now() \
             RETURNING id",
        )
        .bind(Uuid::new_v4())
        .bind(write.patient_id)
        .bind(write.doctor_id)
        .bind(&write.gender)
        .bind(&write.age_group)
        .fetch_one(&mut *tx)
        .await?;

        // Replace, never merge: drop every edge, then insert the new set.
        sqlx::query("DELETE FROM patient_medical_info_diseases WHERE medical_info_id = $1")
            .bind(info_id)
            .execute(&mut *tx)
            .await?;

        if !write.disease_ids.is_empty() {
            sqlx::query(
                "INSERT INTO patient_medical_info_diseases (medical_info_id, disease_id) \
                 SELECT $1, unnest($2::uuid[]) ON CONFLICT DO NOTHING",
            )
            .bind(info_id)
            .bind(&write.disease_ids)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.medical_records(&[write.patient_id])
            .await?
            .remove(&write.patient_id)
            .ok_or(DbError::NotFound)
    }

    async fn list_diseases(&self) -> DbResult<Vec<Disease>> {
        Ok(sqlx::query_as::<_, DiseaseRow>(
            "SELECT id, name, category, description, created_at FROM diseases ORDER BY category ASC, name ASC",
        )
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Disease::from)
        .collect())
    }

    async fn seed_diseases(&self, catalog: &[DiseaseSeed]) -> DbResult<usize> {
        let mut inserted = 0;
        for seed in catalog {
            let result = sqlx::query(
                "INSERT INTO diseases (id, name, category, description) VALUES ($1, $2, $3, $4) \
                 ON CONFLICT (name) DO NOTHING",
            )
            .bind(Uuid::new_v4())
            .bind(seed.name)
            .bind(seed.category)
            .bind(seed.description)
            .execute(&self.pool)
            .await?;
            inserted += result.rows_affected() as usize;
        }
        Ok(inserted)
    }

    async fn insert_video(&self, new_video: NewVideo) -> DbResult<Video> {
        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO videos (id, title, description, file_path, thumbnail, uploader_id, public) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(id)
        .bind(new_video.title)
        .bind(new_video.description)
        .bind(new_video.file_path)
        .bind(new_video.thumbnail)
        .bind(new_video.uploader_id)
        .bind(new_video.public)
        .execute(&self.pool)
        .await?;

        self.find_video(id)
            .await?
            .map(|listing| listing.video)
            .ok_or(DbError::NotFound)
    }

    async fn find_video(&self, id: Uuid) -> DbResult<Option<VideoListing>> {
        let sql = format!("{} WHERE v.id = $1", VIDEO_SELECT);
        sqlx::query_as::<_, VideoRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(VideoRow::into_listing)
            .transpose()
    }

    async fn list_videos(&self) -> DbResult<Vec<VideoListing>> {
        let sql = format!("{} ORDER BY v.created_at DESC", VIDEO_SELECT);
        sqlx::query_as::<_, VideoRow>(&sql)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(VideoRow::into_listing)
            .collect()
    }
}
