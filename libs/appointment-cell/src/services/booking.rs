// libs/appointment-cell/src/services/booking.rs
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use shared_database::ClinicStore;
use shared_models::appointment::{
    Appointment, AppointmentChanges, AppointmentFilter, AppointmentStatus, NewAppointment,
};
use shared_models::auth::Role;
use shared_models::error::AppError;
use shared_models::user::{User, UserSummary};
use shared_utils::policy::{authorize, require_role};
use shared_utils::AppState;

use crate::models::{
    AppointmentError, AppointmentListQuery, AppointmentResponse, CreateAppointmentRequest,
    StatusChangeRequest, UpdateAppointmentRequest, DEFAULT_DURATION_MIN,
};
use crate::services::lifecycle::{AppointmentLifecycleService, Participation};

fn parse_scheduled_at(value: &str) -> Result<DateTime<Utc>, AppointmentError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppointmentError::InvalidScheduledAt)
}

fn parse_duration(value: i32) -> Result<i32, AppointmentError> {
    if value > 0 {
        Ok(value)
    } else {
        Err(AppointmentError::InvalidDuration)
    }
}

fn parse_status_filter(value: Option<&str>) -> Result<Option<AppointmentStatus>, AppointmentError> {
    match value.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| AppointmentError::UnknownStatus(raw.to_string())),
        None => Ok(None),
    }
}

/// Visibility: doctors and patients see their own appointments, admins see all.
fn visibility_filter(caller: &User, status: Option<AppointmentStatus>) -> AppointmentFilter {
    let mut filter = AppointmentFilter {
        status,
        ..Default::default()
    };
    match caller.role {
        Role::Doctor => filter.doctor_id = Some(caller.id),
        Role::Patient => filter.patient_id = Some(caller.id),
        Role::Admin => {}
    }
    filter
}

pub struct AppointmentBookingService {
    store: Arc<dyn ClinicStore>,
    lifecycle: AppointmentLifecycleService,
}

impl AppointmentBookingService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            lifecycle: AppointmentLifecycleService::new(),
        }
    }

    /// Books a pending appointment for the calling patient. The patient id is
    /// always the caller, whatever the body says.
    pub async fn create_appointment(
        &self,
        caller: &User,
        request: CreateAppointmentRequest,
    ) -> Result<AppointmentResponse, AppError> {
        require_role(caller, Role::Patient)?;

        let raw_doctor_id = request
            .doctor_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(AppointmentError::MissingDoctor)?;
        let scheduled_at = parse_scheduled_at(request.scheduled_at.as_deref().unwrap_or_default())?;
        let duration_min = parse_duration(request.duration_min.unwrap_or(DEFAULT_DURATION_MIN))?;

        let doctor_id = Uuid::parse_str(raw_doctor_id).map_err(|_| AppointmentError::DoctorNotFound)?;
        match self.store.find_user_by_id(doctor_id).await? {
            Some(doctor) if doctor.role == Role::Doctor => {}
            _ => return Err(AppointmentError::DoctorNotFound.into()),
        }

        let appointment = self
            .store
            .insert_appointment(NewAppointment {
                doctor_id,
                patient_id: caller.id,
                scheduled_at,
                duration_min,
                reason: request.reason.unwrap_or_default(),
            })
            .await?;

        info!("Appointment {} booked with doctor {}", appointment.id, doctor_id);
        self.respond(appointment).await
    }

    pub async fn list_appointments(
        &self,
        caller: &User,
        query: AppointmentListQuery,
    ) -> Result<Vec<AppointmentResponse>, AppError> {
        let status = parse_status_filter(query.status.as_deref())?;
        let filter = visibility_filter(caller, status);

        let appointments = self.store.list_appointments(&filter).await?;
        debug!("Listing {} appointments for {}", appointments.len(), caller.id);

        let mut ids: Vec<Uuid> = appointments
            .iter()
            .flat_map(|a| [a.doctor_id, a.patient_id])
            .collect();
        ids.sort_unstable();
        ids.dedup();
        let summaries = self.summaries(&ids).await?;

        Ok(appointments
            .into_iter()
            .map(|appointment| Self::attach(appointment, &summaries))
            .collect())
    }

    pub async fn update_appointment(
        &self,
        caller: &User,
        appointment_id: &str,
        request: UpdateAppointmentRequest,
    ) -> Result<AppointmentResponse, AppError> {
        let appointment = self.load_for_participant(caller, appointment_id).await?;

        let mut changes = AppointmentChanges::default();
        if let Some(raw) = request.scheduled_at.as_deref() {
            changes.scheduled_at = Some(parse_scheduled_at(raw)?);
        }
        if let Some(duration) = request.duration_min {
            changes.duration_min = Some(parse_duration(duration)?);
        }
        changes.reason = request.reason;
        if Participation::of(caller, &appointment) == Participation::AssignedDoctor {
            changes.notes = request.notes;
        }

        if changes.is_empty() {
            return Err(AppointmentError::NoUpdates.into());
        }

        let updated = self.store.update_appointment(appointment.id, changes).await?;
        debug!("Appointment {} updated by {}", updated.id, caller.id);
        self.respond(updated).await
    }

    pub async fn change_status(
        &self,
        caller: &User,
        appointment_id: &str,
        request: StatusChangeRequest,
    ) -> Result<AppointmentResponse, AppError> {
        let appointment = self.load_for_participant(caller, appointment_id).await?;

        let status: AppointmentStatus = request
            .status
            .parse()
            .map_err(|_| AppointmentError::UnknownStatus(request.status.clone()))?;

        let participation = Participation::of(caller, &appointment);
        self.lifecycle
            .check_status_change(participation, appointment.status, status)?;

        let changes = AppointmentChanges {
            status: Some(status),
            notes: request.notes,
            ..Default::default()
        };
        let updated = self.store.update_appointment(appointment.id, changes).await?;

        info!(
            "Appointment {} moved {} -> {} by {}",
            updated.id, appointment.status, updated.status, caller.id
        );
        self.respond(updated).await
    }

    /// Unparseable and unknown ids are both "not found".
    async fn load_for_participant(&self, caller: &User, appointment_id: &str) -> Result<Appointment, AppError> {
        let id = Uuid::parse_str(appointment_id).map_err(|_| AppointmentError::NotFound)?;
        let appointment = self
            .store
            .find_appointment(id)
            .await?
            .ok_or(AppointmentError::NotFound)?;

        authorize(caller, None, |user| appointment.is_participant(user.id))?;
        Ok(appointment)
    }

    async fn summaries(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, UserSummary>, AppError> {
        Ok(self
            .store
            .user_summaries(ids)
            .await?
            .into_iter()
            .map(|summary| (summary.id, summary))
            .collect())
    }

    async fn respond(&self, appointment: Appointment) -> Result<AppointmentResponse, AppError> {
        let summaries = self
            .summaries(&[appointment.doctor_id, appointment.patient_id])
            .await?;
        Ok(Self::attach(appointment, &summaries))
    }

    fn attach(appointment: Appointment, summaries: &HashMap<Uuid, UserSummary>) -> AppointmentResponse {
        AppointmentResponse {
            doctor: summaries.get(&appointment.doctor_id).cloned(),
            patient: summaries.get(&appointment.patient_id).cloned().map(Into::into),
            appointment,
        }
    }
}
