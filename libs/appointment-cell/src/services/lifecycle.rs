// libs/appointment-cell/src/services/lifecycle.rs
use tracing::{debug, warn};

use shared_models::appointment::{Appointment, AppointmentStatus};
use shared_models::auth::Role;
use shared_models::user::User;

use crate::models::AppointmentError;

/// How the caller relates to one appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Participation {
    AssignedDoctor,
    AssignedPatient,
    Admin,
    Outsider,
}

impl Participation {
    pub fn of(caller: &User, appointment: &Appointment) -> Self {
        match caller.role {
            Role::Admin => Participation::Admin,
            Role::Doctor if appointment.doctor_id == caller.id => Participation::AssignedDoctor,
            Role::Patient if appointment.patient_id == caller.id => Participation::AssignedPatient,
            _ => Participation::Outsider,
        }
    }
}

pub struct AppointmentLifecycleService;

impl AppointmentLifecycleService {
    pub fn new() -> Self {
        Self
    }

    /// Completed and cancelled are terminal.
    pub fn get_valid_transitions(&self, current_status: AppointmentStatus) -> &'static [AppointmentStatus] {
        match current_status {
            AppointmentStatus::Pending => &[AppointmentStatus::Confirmed, AppointmentStatus::Cancelled],
            AppointmentStatus::Confirmed => &[AppointmentStatus::Completed, AppointmentStatus::Cancelled],
            AppointmentStatus::Completed | AppointmentStatus::Cancelled => &[],
        }
    }

    pub fn validate_status_transition(
        &self,
        current_status: AppointmentStatus,
        new_status: AppointmentStatus,
    ) -> Result<(), AppointmentError> {
        debug!("Validating status transition from {} to {}", current_status, new_status);

        if current_status.is_terminal() {
            warn!("Appointment already {}, refusing {}", current_status, new_status);
            return Err(AppointmentError::InvalidStatusTransition {
                from: current_status,
                to: new_status,
            });
        }

        if !self.get_valid_transitions(current_status).contains(&new_status) {
            warn!("Invalid status transition attempted: {} -> {}", current_status, new_status);
            return Err(AppointmentError::InvalidStatusTransition {
                from: current_status,
                to: new_status,
            });
        }
        Ok(())
    }

    /// Statuses a participant may request, before the state machine is consulted.
    pub fn permitted_statuses(&self, participation: Participation) -> &'static [AppointmentStatus] {
        match participation {
            Participation::AssignedDoctor | Participation::Admin => &[
                AppointmentStatus::Confirmed,
                AppointmentStatus::Completed,
                AppointmentStatus::Cancelled,
            ],
            Participation::AssignedPatient => &[AppointmentStatus::Cancelled],
            Participation::Outsider => &[],
        }
    }

    /// Role permission first, then the transition table.
    pub fn check_status_change(
        &self,
        participation: Participation,
        current_status: AppointmentStatus,
        new_status: AppointmentStatus,
    ) -> Result<(), AppointmentError> {
        if !self.permitted_statuses(participation).contains(&new_status) {
            return Err(AppointmentError::StatusChangeNotPermitted);
        }
        self.validate_status_transition(current_status, new_status)
    }
}

impl Default for AppointmentLifecycleService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use shared_models::appointment::AppointmentStatus::*;

    #[test]
    fn test_transition_table() {
        let lifecycle = AppointmentLifecycleService::new();

        assert!(lifecycle.validate_status_transition(Pending, Confirmed).is_ok());
        assert!(lifecycle.validate_status_transition(Pending, Cancelled).is_ok());
        assert!(lifecycle.validate_status_transition(Confirmed, Completed).is_ok());
        assert!(lifecycle.validate_status_transition(Confirmed, Cancelled).is_ok());

        assert_matches!(
            lifecycle.validate_status_transition(Pending, Completed),
            Err(AppointmentError::InvalidStatusTransition { from: Pending, to: Completed })
        );
        assert!(lifecycle.validate_status_transition(Confirmed, Pending).is_err());
    }

    #[test]
    fn test_terminal_states_are_immutable() {
        let lifecycle = AppointmentLifecycleService::new();
        for terminal in [Completed, Cancelled] {
            for next in [Pending, Confirmed, Completed, Cancelled] {
                assert!(lifecycle.validate_status_transition(terminal, next).is_err());
            }
        }
    }

    #[test]
    fn test_patient_may_only_cancel() {
        let lifecycle = AppointmentLifecycleService::new();

        assert!(lifecycle
            .check_status_change(Participation::AssignedPatient, Pending, Cancelled)
            .is_ok());
        assert_eq!(
            lifecycle.check_status_change(Participation::AssignedPatient, Pending, Confirmed),
            Err(AppointmentError::StatusChangeNotPermitted)
        );
    }

    #[test]
    fn test_role_check_precedes_state_machine() {
        let lifecycle = AppointmentLifecycleService::new();

        assert_eq!(
            lifecycle.check_status_change(Participation::AssignedPatient, Completed, Confirmed),
            Err(AppointmentError::StatusChangeNotPermitted)
        );
        assert_matches!(
            lifecycle.check_status_change(Participation::Admin, Completed, Cancelled),
            Err(AppointmentError::InvalidStatusTransition { .. })
        );
        assert!(lifecycle.permitted_statuses(Participation::Outsider).is_empty());
    }
}
