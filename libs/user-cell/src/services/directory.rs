use std::sync::Arc;

use tracing::debug;

use shared_database::ClinicStore;
use shared_models::auth::Role;
use shared_models::error::AppError;
use shared_models::user::User;
use shared_utils::policy::require_role;
use shared_utils::AppState;

use crate::models::{DoctorEntry, PatientEntry};

/// Read-only listing of users by role, ordered by full name.
pub struct DirectoryService {
    store: Arc<dyn ClinicStore>,
}

impl DirectoryService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    pub async fn list_doctors(&self) -> Result<Vec<DoctorEntry>, AppError> {
        let doctors = self.store.list_users_by_role(Role::Doctor).await?;
        debug!("Listing {} doctors", doctors.len());
        Ok(doctors.into_iter().map(DoctorEntry::from).collect())
    }

    /// Doctors and admins only.
    pub async fn list_patients(&self, caller: &User) -> Result<Vec<PatientEntry>, AppError> {
        require_role(caller, Role::Doctor)?;

        let patients = self.store.list_users_by_role(Role::Patient).await?;
        Ok(patients.into_iter().map(PatientEntry::from).collect())
    }
}
