//! Patient business logic

use crate::domain::{CreatePatientInput, Gender, Patient, StringUuid, UpdatePatientInput};
use crate::error::{AppError, Result};
use crate::repository::PatientRepository;
use chrono::Utc;
use sqlx::types::Json;
use std::sync::Arc;
use validator::Validate;

pub struct PatientService<R: PatientRepository> {
    repo: Arc<R>,
}

impl<R: PatientRepository> PatientService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, input: CreatePatientInput) -> Result<Patient> {
        input.validate()?;

        let gender = Gender::parse(&input.gender).ok_or_else(|| {
            AppError::validation("gender", "Gender must be one of: Male, Female, Other")
        })?;
        let assigned_doctor = parse_doctor_ref(input.assigned_doctor.as_deref())?;

        let now = Utc::now();
        let patient = Patient {
            id: StringUuid::new_v4(),
            name: input.name,
            age: input.age,
            gender,
            contact: input.contact,
            address: input.address,
            medical_history: Json(input.medical_history.unwrap_or_default()),
            assigned_doctor,
            created_at: now,
            updated_at: now,
        };

        self.repo.create(&patient).await
    }

    pub async fn list(&self) -> Result<Vec<Patient>> {
        self.repo.list().await
    }

    pub async fn get(&self, id: StringUuid) -> Result<Patient> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Patient not found".to_string()))
    }

    pub async fn update(&self, id: StringUuid, input: UpdatePatientInput) -> Result<Patient> {
        input.validate()?;

        let mut patient = self.get(id).await?;

        if let Some(name) = input.name {
            patient.name = name;
        }
        if let Some(age) = input.age {
            patient.age = age;
        }
        if let Some(gender) = input.gender.as_deref() {
            patient.gender = Gender::parse(gender).ok_or_else(|| {
                AppError::validation("gender", "Gender must be one of: Male, Female, Other")
            })?;
        }
        if let Some(contact) = input.contact {
            patient.contact = contact;
        }
        if let Some(address) = input.address {
            patient.address = Some(address);
        }
        if let Some(history) = input.medical_history {
            patient.medical_history = Json(history);
        }
        if input.assigned_doctor.is_some() {
            patient.assigned_doctor = parse_doctor_ref(input.assigned_doctor.as_deref())?;
        }
        patient.updated_at = Utc::now();

        self.repo.update(&patient).await
    }

    pub async fn delete(&self, id: StringUuid) -> Result<()> {
        // Existence check first so a bogus id is a 404, not a silent no-op
        self.get(id).await?;
        self.repo.delete(id).await
    }
}

fn parse_doctor_ref(id: Option<&str>) -> Result<Option<StringUuid>> {
    match id {
        Some(s) => StringUuid::parse_str(s)
            .map(Some)
            .map_err(|_| AppError::validation("assigned_doctor", "Valid doctor ID is required")),
        None => Ok(None),
    }
}
