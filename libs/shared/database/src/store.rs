use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use shared_models::appointment::{Appointment, AppointmentChanges, AppointmentFilter, NewAppointment};
use shared_models::auth::Role;
use shared_models::care::{
    Disease, DiseaseSeed, DoctorPatient, MedicalInfoWrite, MedicalRecord, PatientChart, PatientScope,
};
use shared_models::error::AppError;
use shared_models::user::{NewUser, User, UserSummary};
use shared_models::video::{NewVideo, Video, VideoListing};

#[derive(Debug, Error)]
pub enum DbError {
    #[error("record not found")]
    NotFound,

    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("unknown reference: {0}")]
    UnknownReference(String),

    #[error("query failed: {0}")]
    Query(String),

    #[error("migration failed: {0}")]
    Migration(String),
}

pub type DbResult<T> = Result<T, DbError>;

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound => AppError::NotFound("record not found".to_string()),
            DbError::UniqueViolation(msg) | DbError::UnknownReference(msg) => AppError::BadRequest(msg),
            DbError::Query(msg) | DbError::Migration(msg) => AppError::Database(msg),
        }
    }
}

/// Persistence interface shared by every cell. Implementations must make
/// `create_user` and `write_medical_info` all-or-nothing.
#[async_trait]
pub trait ClinicStore: Send + Sync {
    // Identity

    /// Inserts the user and its role profile in one transaction. A duplicate
    /// email yields `DbError::UniqueViolation`.
    async fn create_user(&self, new_user: NewUser) -> DbResult<User>;

    async fn find_user_by_id(&self, id: Uuid) -> DbResult<Option<User>>;

    /// `email` must already be normalized to lowercase.
    async fn find_user_by_email(&self, email: &str) -> DbResult<Option<User>>;

    /// Users of one role with profiles loaded, ordered by full name.
    async fn list_users_by_role(&self, role: Role) -> DbResult<Vec<User>>;

    async fn user_summaries(&self, ids: &[Uuid]) -> DbResult<Vec<UserSummary>>;

    // Appointments

    async fn insert_appointment(&self, new_appointment: NewAppointment) -> DbResult<Appointment>;

    async fn find_appointment(&self, id: Uuid) -> DbResult<Option<Appointment>>;

    /// Ordered by scheduled time, newest first.
    async fn list_appointments(&self, filter: &AppointmentFilter) -> DbResult<Vec<Appointment>>;

    /// Writes the supplied fields; last writer wins.
    async fn update_appointment(&self, id: Uuid, changes: AppointmentChanges) -> DbResult<Appointment>;

    // Care assignment and medical info

    async fn find_assignment(&self, doctor_id: Uuid, patient_id: Uuid) -> DbResult<Option<DoctorPatient>>;

    async fn insert_assignment(&self, doctor_id: Uuid, patient_id: Uuid) -> DbResult<DoctorPatient>;

    /// Patients in scope ordered by full name, medical info preloaded.
    async fn list_patient_charts(&self, scope: PatientScope) -> DbResult<Vec<PatientChart>>;

    async fn find_diseases(&self, ids: &[Uuid]) -> DbResult<Vec<Disease>>;

    /// Upserts the patient's medical info and replaces its disease set in one
    /// transaction.
    async fn write_medical_info(&self, write: MedicalInfoWrite) -> DbResult<MedicalRecord>;

    /// Ordered by category, then name.
    async fn list_diseases(&self) -> DbResult<Vec<Disease>>;

    /// Inserts catalog entries whose name is not present yet. Returns the
    /// number of rows inserted.
    async fn seed_diseases(&self, catalog: &[DiseaseSeed]) -> DbResult<usize>;

    // Videos

    async fn insert_video(&self, new_video: NewVideo) -> DbResult<Video>;

    async fn find_video(&self, id: Uuid) -> DbResult<Option<VideoListing>>;

    /// Newest first.
    async fn list_videos(&self) -> DbResult<Vec<VideoListing>>;
}
