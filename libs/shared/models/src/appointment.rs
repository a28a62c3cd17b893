use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AppointmentStatus::Completed | AppointmentStatus::Cancelled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(AppointmentStatus::Pending),
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            other => Err(format!("unknown appointment status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub duration_min: i32,
    pub status: AppointmentStatus,
    pub reason: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn is_participant(&self, user_id: Uuid) -> bool {
        self.doctor_id == user_id || self.patient_id == user_id
    }
}

#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub duration_min: i32,
    pub reason: String,
}

/// Typed partial update: only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentChanges {
    pub scheduled_at: Option<DateTime<Utc>>,
    pub duration_min: Option<i32>,
    pub reason: Option<String>,
    pub notes: Option<String>,
    pub status: Option<AppointmentStatus>,
}

impl AppointmentChanges {
    pub fn is_empty(&self) -> bool {
        self.scheduled_at.is_none()
            && self.duration_min.is_none()
            && self.reason.is_none()
            && self.notes.is_none()
            && self.status.is_none()
    }

    pub fn apply_to(&self, appointment: &mut Appointment) {
        if let Some(scheduled_at) = self.scheduled_at {
            appointment.scheduled_at = scheduled_at;
        }
        if let Some(duration_min) = self.duration_min {
            appointment.duration_min = duration_min;
        }
        if let Some(reason) = &self.reason {
            appointment.reason = reason.clone();
        }
        if let Some(notes) = &self.notes {
            appointment.notes = notes.clone();
        }
        if let Some(status) = self.status {
            appointment.status = status;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppointmentFilter {
    pub doctor_id: Option<Uuid>,
    pub patient_id: Option<Uuid>,
    pub status: Option<AppointmentStatus>,
}

impl AppointmentFilter {
    pub fn matches(&self, appointment: &Appointment) -> bool {
        self.doctor_id.map_or(true, |id| appointment.doctor_id == id)
            && self.patient_id.map_or(true, |id| appointment.patient_id == id)
            && self.status.map_or(true, |status| appointment.status == status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        assert!(!AppointmentStatus::Pending.is_terminal());
        assert!(!AppointmentStatus::Confirmed.is_terminal());
        assert!(AppointmentStatus::Completed.is_terminal());
        assert!(AppointmentStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_changes_apply_only_supplied_fields() {
        let now = Utc::now();
        let mut appointment = Appointment {
            id: Uuid::new_v4(),
            doctor_id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            scheduled_at: now,
            duration_min: 30,
            status: AppointmentStatus::Pending,
            reason: "checkup".to_string(),
            notes: String::new(),
            created_at: now,
            updated_at: now,
        };

        let changes = AppointmentChanges {
            reason: Some("follow-up".to_string()),
            ..Default::default()
        };
        assert!(!changes.is_empty());
        changes.apply_to(&mut appointment);

        assert_eq!(appointment.reason, "follow-up");
        assert_eq!(appointment.duration_min, 30);
        assert_eq!(appointment.scheduled_at, now);
        assert!(AppointmentChanges::default().is_empty());
    }
}
