//! Patient domain model

use super::common::{is_entity_ref, StringUuid};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Male" => Some(Gender::Male),
            "Female" => Some(Gender::Female),
            "Other" => Some(Gender::Other),
            _ => None,
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Patient entity
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Patient {
    pub id: StringUuid,
    pub name: String,
    pub age: i32,
    pub gender: Gender,
    pub contact: String,
    pub address: Option<String>,
    pub medical_history: Json<Vec<String>>,
    pub assigned_doctor: Option<StringUuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Patient {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            name: String::new(),
            age: 0,
            gender: Gender::Other,
            contact: String::new(),
            address: None,
            medical_history: Json(Vec::new()),
            assigned_doctor: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for creating a patient
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePatientInput {
    #[validate(length(min = 1, message = "Patient name is required"))]
    pub name: String,
    #[validate(range(min = 0, max = 150, message = "Age must be a number between 0 and 150"))]
    pub age: i32,
    #[validate(custom(function = "validate_gender"))]
    pub gender: String,
    #[validate(length(min = 1, message = "Contact information is required"))]
    pub contact: String,
    pub address: Option<String>,
    pub medical_history: Option<Vec<String>>,
    #[validate(custom(function = "validate_doctor_ref"))]
    pub assigned_doctor: Option<String>,
}

/// Input for updating a patient; every field optional, same constraints
/// applied when present
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdatePatientInput {
    #[validate(length(min = 1, message = "Patient name is required"))]
    pub name: Option<String>,
    #[validate(range(min = 0, max = 150, message = "Age must be a number between 0 and 150"))]
    pub age: Option<i32>,
    #[validate(custom(function = "validate_gender"))]
    pub gender: Option<String>,
    #[validate(length(min = 1, message = "Contact information is required"))]
    pub contact: Option<String>,
    pub address: Option<String>,
    pub medical_history: Option<Vec<String>>,
    #[validate(custom(function = "validate_doctor_ref"))]
    pub assigned_doctor: Option<String>,
}

fn validate_gender(gender: &str) -> Result<(), ValidationError> {
    if Gender::parse(gender).is_some() {
        Ok(())
    } else {
        let mut err = ValidationError::new("gender");
        err.message = Some("Gender must be one of: Male, Female, Other".into());
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
