use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use shared_database::{ClinicStore, DbError};
use shared_models::auth::Role;
use shared_models::care::{Disease, MedicalInfoWrite, PatientScope};
use shared_models::error::AppError;
use shared_models::user::User;
use shared_utils::policy::require_role;
use shared_utils::AppState;

use crate::models::{
    AssignPatientRequest, AssignmentResponse, CareError, MedicalInfoRequest, MedicalInfoResponse,
    MedicalInfoSummary, PatientListItem, PatientListQuery,
};

fn required(value: &str, field: &'static str) -> Result<String, CareError> {
    let value = value.trim();
    if value.is_empty() {
        Err(CareError::MissingField(field))
    } else {
        Ok(value.to_string())
    }
}

/// Parses and de-duplicates disease ids, keeping first-seen order.
fn parse_disease_ids(raw: &[String]) -> Result<Vec<Uuid>, CareError> {
    let mut ids = Vec::with_capacity(raw.len());
    for value in raw {
        let id = Uuid::parse_str(value.trim()).map_err(|_| CareError::InvalidDiseaseIds)?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(ids)
}

fn scope_for(caller: &User, query: &PatientListQuery) -> PatientScope {
    match query.filter.as_deref() {
        Some("all") => PatientScope::All,
        _ => PatientScope::AssignedTo(caller.id),
    }
}

pub struct CareLedgerService {
    store: Arc<dyn ClinicStore>,
}

impl CareLedgerService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    async fn find_patient(&self, patient_id: Uuid) -> Result<User, AppError> {
        match self.store.find_user_by_id(patient_id).await? {
            Some(user) if user.role == Role::Patient => Ok(user),
            _ => Err(CareError::PatientNotFound.into()),
        }
    }

    pub async fn assign_patient(
        &self,
        caller: &User,
        request: AssignPatientRequest,
    ) -> Result<AssignmentResponse, AppError> {
        require_role(caller, Role::Doctor)?;

        let raw = request
            .patient_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(CareError::MissingPatientId)?;
        let patient_id = Uuid::parse_str(raw).map_err(|_| CareError::PatientNotFound)?;
        let patient = self.find_patient(patient_id).await?;

        if self.store.find_assignment(caller.id, patient.id).await?.is_some() {
            return Err(CareError::AlreadyAssigned.into());
        }

        let edge = match self.store.insert_assignment(caller.id, patient.id).await {
            Ok(edge) => edge,
            Err(DbError::UniqueViolation(_)) => return Err(CareError::AlreadyAssigned.into()),
            Err(e) => return Err(e.into()),
        };

        info!("Doctor {} assigned patient {}", caller.id, patient.id);
        Ok(AssignmentResponse::new(edge, &patient))
    }

    pub async fn list_patients(
        &self,
        caller: &User,
        query: PatientListQuery,
    ) -> Result<Vec<PatientListItem>, AppError> {
        require_role(caller, Role::Doctor)?;

        let charts = self.store.list_patient_charts(scope_for(caller, &query)).await?;
        debug!("Listing {} patients for {}", charts.len(), caller.id);

        Ok(charts
            .into_iter()
            .map(|chart| PatientListItem {
                medical_info: chart.medical_info.as_ref().map(MedicalInfoSummary::from),
                id: chart.patient.id,
                full_name: chart.patient.full_name,
                email: chart.patient.email,
                phone: chart.patient.phone,
            })
            .collect())
    }

    /// Creates or overwrites the patient's medical info. Ownership moves to the
    /// caller and the disease set is replaced, never merged.
    pub async fn write_medical_info(
        &self,
        caller: &User,
        patient_id: &str,
        request: MedicalInfoRequest,
    ) -> Result<MedicalInfoResponse, AppError> {
        require_role(caller, Role::Doctor)?;

        let patient_id = Uuid::parse_str(patient_id).map_err(|_| CareError::PatientNotFound)?;
        let gender = required(&request.gender, "gender")?;
        let age_group = required(&request.age_group, "ageGroup")?;
        let disease_ids = parse_disease_ids(&request.disease_ids)?;

        let patient = self.find_patient(patient_id).await?;

        if !disease_ids.is_empty() {
            let found = self.store.find_diseases(&disease_ids).await?;
            if found.len() != disease_ids.len() {
                return Err(CareError::InvalidDiseaseIds.into());
            }
        }

        let record = match self
            .store
            .write_medical_info(MedicalInfoWrite {
                patient_id: patient.id,
                doctor_id: caller.id,
                gender,
                age_group,
                disease_ids,
            })
            .await
        {
            Ok(record) => record,
            Err(DbError::UnknownReference(_)) => return Err(CareError::InvalidDiseaseIds.into()),
            Err(e) => return Err(e.into()),
        };

        info!(
            "Medical info for patient {} written by {} ({} diseases)",
            patient.id,
            caller.id,
            record.diseases.len()
        );
        Ok(MedicalInfoResponse::new(record, &patient))
    }

    pub async fn list_diseases(&self) -> Result<Vec<Disease>, AppError> {
        Ok(self.store.list_diseases().await?)
    }
}
