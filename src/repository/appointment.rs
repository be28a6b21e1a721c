//! Appointment repository

use crate::domain::{Appointment, StringUuid};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn create(&self, appointment: &Appointment) -> Result<Appointment>;
    async fn list(&self) -> Result<Vec<Appointment>>;
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Appointment>>;
    async fn update(&self, appointment: &Appointment) -> Result<Appointment>;
    async fn delete(&self, id: StringUuid) -> Result<()>;
}

pub struct AppointmentRepositoryImpl {
    pool: MySqlPool,
}

impl AppointmentRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

const APPOINTMENT_COLUMNS: &str =
    "id, patient_id, doctor_id, date, status, created_at, updated_at";

#[async_trait]
impl AppointmentRepository for AppointmentRepositoryImpl {
    async fn create(&self, appointment: &Appointment) -> Result<Appointment> {
        sqlx::query(
            r#"
            INSERT INTO appointments (id, patient_id, doctor_id, date, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(appointment.id)
        .bind(appointment.patient_id)
        .bind(appointment.doctor_id)
        .bind(appointment.date)
        .bind(appointment.status)
        .bind(appointment.created_at)
        .bind(appointment.updated_at)
        .execute(&self.pool)
        .await?;

        self.find_by_id(appointment.id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create appointment")))
    }

    async fn list(&self) -> Result<Vec<Appointment>> {
        let appointments = sqlx::query_as::<_, Appointment>(&format!(
            "SELECT {} FROM appointments ORDER BY date DESC",
            APPOINTMENT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(appointments)
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Appointment>> {
        let appointment = sqlx::query_as::<_, Appointment>(&format!(
            "SELECT {} FROM appointments WHERE id = ?",
            APPOINTMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(appointment)
    }

    async fn update(&self, appointment: &Appointment) -> Result<Appointment> {
        sqlx::query(
            r#"
            UPDATE appointments
            SET patient_id = ?, doctor_id = ?, date = ?, status = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(appointment.patient_id)
        .bind(appointment.doctor_id)
        .bind(appointment.date)
        .bind(appointment.status)
        .bind(appointment.updated_at)
        .bind(appointment.id)
        .execute(&self.pool)
        .await?;

        self.find_by_id(appointment.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Appointment not found".to_string()))
    }

    async fn delete(&self, id: StringUuid) -> Result<()> {
        sqlx::query("DELETE FROM appointments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
