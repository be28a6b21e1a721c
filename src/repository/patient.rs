//! Patient repository

use crate::domain::{Patient, StringUuid};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PatientRepository: Send + Sync {
    async fn create(&self, patient: &Patient) -> Result<Patient>;
    async fn list(&self) -> Result<Vec<Patient>>;
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Patient>>;
    async fn update(&self, patient: &Patient) -> Result<Patient>;
    async fn delete(&self, id: StringUuid) -> Result<()>;
}

pub struct PatientRepositoryImpl {
    pool: MySqlPool,
}

impl PatientRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

const PATIENT_COLUMNS: &str =
    "id, name, age, gender, contact, address, medical_history, assigned_doctor, created_at, updated_at";

#[async_trait]
impl PatientRepository for PatientRepositoryImpl {
    async fn create(&self, patient: &Patient) -> Result<Patient> {
        sqlx::query(
            r#"
            INSERT INTO patients (id, name, age, gender, contact, address, medical_history, assigned_doctor, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(patient.id)
        .bind(&patient.name)
        .bind(patient.age)
        .bind(patient.gender)
        .bind(&patient.contact)
        .bind(&patient.address)
        .bind(&patient.medical_history)
        .bind(patient.assigned_doctor)
        .bind(patient.created_at)
        .bind(patient.updated_at)
        .execute(&self.pool)
        .await?;

        self.find_by_id(patient.id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create patient")))
    }

    async fn list(&self) -> Result<Vec<Patient>> {
        let patients = sqlx::query_as::<_, Patient>(&format!(
            "SELECT {} FROM patients ORDER BY created_at DESC",
            PATIENT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(patients)
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Patient>> {
        let patient = sqlx::query_as::<_, Patient>(&format!(
            "SELECT {} FROM patients WHERE id = ?",
            PATIENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(patient)
    }

    async fn update(&self, patient: &Patient) -> Result<Patient> {
        sqlx::query(
            r#"
            UPDATE patients
            SET name = ?, age = ?, gender = ?, contact = ?, address = ?,
                medical_history = ?, assigned_doctor = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&patient.name)
        .bind(patient.age)
        .bind(patient.gender)
        .bind(&patient.contact)
        .bind(&patient.address)
        .bind(&patient.medical_history)
        .bind(patient.assigned_doctor)
        .bind(patient.updated_at)
        .bind(patient.id)
        .execute(&self.pool)
        .await?;

        self.find_by_id(patient.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Patient not found".to_string()))
    }

    async fn delete(&self, id: StringUuid) -> Result<()> {
        sqlx::query("DELETE FROM patients WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
