//! Appointment domain model

use super::common::{is_entity_ref, parse_timestamp, StringUuid};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "Scheduled",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Cancelled => "Cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Scheduled" => Some(AppointmentStatus::Scheduled),
            "Completed" => Some(AppointmentStatus::Completed),
            "Cancelled" => Some(AppointmentStatus::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Appointment entity
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Appointment {
    pub id: StringUuid,
    pub patient_id: StringUuid,
    pub doctor_id: StringUuid,
    pub date: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Appointment {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            patient_id: StringUuid::new_v4(),
            doctor_id: StringUuid::new_v4(),
            date: now,
            status: AppointmentStatus::Scheduled,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for creating an appointment
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAppointmentInput {
    #[validate(custom(function = "validate_patient_ref"))]
    pub patient: String,
    #[validate(custom(function = "validate_doctor_ref"))]
    pub doctor: String,
    #[validate(custom(function = "validate_date"))]
    pub date: String,
    #[validate(custom(function = "validate_status"))]
    pub status: Option<String>,
}

/// Input for updating an appointment; every field optional
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateAppointmentInput {
    #[validate(custom(function = "validate_patient_ref"))]
    pub patient: Option<String>,
    #[validate(custom(function = "validate_doctor_ref"))]
    pub doctor: Option<String>,
    #[validate(custom(function = "validate_date"))]
    pub date: Option<String>,
    #[validate(custom(function = "validate_status"))]
    pub status: Option<String>,
}

fn validate_patient_ref(id: &str) -> Result<(), ValidationError> {
    if is_entity_ref(id) {
        Ok(())
    } else {
        let mut err = ValidationError::new("entity_ref");
        err.message = Some("Valid patient ID is required".into());
        Err(err)
    }
}

fn validate_doctor_ref(id: &str) -> Result<(), ValidationError> {
    if is_entity_ref(id) {
        Ok(())
    } else {
        let mut err = ValidationError::new("entity_ref");
        err.message = Some("Valid doctor ID is required".into());
        Err(err)
    }
}

fn validate_date(date: &str) -> Result<(), ValidationError> {
    if parse_timestamp(date).is_some() {
        Ok(())
    } else {
        let mut err = ValidationError::new("timestamp");
        err.message = Some("Valid date is required (ISO 8601 format)".into());
        Err(err)
    }
}

fn validate_status(status: &str) -> Result<(), ValidationError> {
    if AppointmentStatus::parse(status).is_some() {
        Ok(())
    } else {
        let mut err = ValidationError::new("status");
        err.message = Some("Status must be one of: Scheduled, Completed, Cancelled".into());
        Err(err)
    }
}
