//! Appointment business logic

use crate::domain::common::parse_timestamp;
use crate::domain::{
    Appointment, AppointmentStatus, CreateAppointmentInput, StringUuid, UpdateAppointmentInput,
};
use crate::error::{AppError, Result};
use crate::repository::AppointmentRepository;
use chrono::Utc;
use std::sync::Arc;
use validator::Validate;

pub struct AppointmentService<R: AppointmentRepository> {
    repo: Arc<R>,
}

impl<R: AppointmentRepository> AppointmentService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, input: CreateAppointmentInput) -> Result<Appointment> {
        input.validate()?;

        let patient_id = parse_ref(&input.patient, "patient", "Valid patient ID is required")?;
        let doctor_id = parse_ref(&input.doctor, "doctor", "Valid doctor ID is required")?;
        let date = parse_timestamp(&input.date).ok_or_else(|| {
            AppError::validation("date", "Valid date is required (ISO 8601 format)")
        })?;
        let status = parse_status(input.status.as_deref())?.unwrap_or(AppointmentStatus::Scheduled);

        let now = Utc::now();
        let appointment = Appointment {
            id: StringUuid::new_v4(),
            patient_id,
            doctor_id,
            date,
            status,
            created_at: now,
            updated_at: now,
        };

        self.repo.create(&appointment).await
    }

    pub async fn list(&self) -> Result<Vec<Appointment>> {
        self.repo.list().await
    }

    pub async fn get(&self, id: StringUuid) -> Result<Appointment> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Appointment not found".to_string()))
    }

    pub async fn update(&self, id: StringUuid, input: UpdateAppointmentInput) -> Result<Appointment> {
        input.validate()?;

        let mut appointment = self.get(id).await?;

        if let Some(patient) = input.patient.as_deref() {
            appointment.patient_id = parse_ref(patient, "patient", "Valid patient ID is required")?;
        }
        if let Some(doctor) = input.doctor.as_deref() {
            appointment.doctor_id = parse_ref(doctor, "doctor", "Valid doctor ID is required")?;
        }
        if let Some(date) = input.date.as_deref() {
            appointment.date = parse_timestamp(date).ok_or_else(|| {
                AppError::validation("date", "Valid date is required (ISO 8601 format)")
            })?;
        }
        if let Some(status) = parse_status(input.status.as_deref())? {
            appointment.status = status;
        }
        appointment.updated_at = Utc::now();

        self.repo.update(&appointment).await
    }

    pub async fn delete(&self, id: StringUuid) -> Result<()> {
        self.get(id).await?;
        self.repo.delete(id).await
    }
}

fn parse_ref(id: &str, field: &str, message: &str) -> Result<StringUuid> {
    StringUuid::parse_str(id).map_err(|_| AppError::validation(field, message))
}

fn parse_status(status: Option<&str>) -> Result<Option<AppointmentStatus>> {
    match status {
        Some(s) => AppointmentStatus::parse(s).map(Some).ok_or_else(|| {
            AppError::validation(
                "status",
                "Status must be one of: Scheduled, Completed, Cancelled",
            )
        }),
        None => Ok(None),
    }
}
