//! Invoice domain model (billing)

use super::common::{is_entity_ref, parse_timestamp, StringUuid};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum InvoiceStatus {
    Pending,
    Paid,
    Cancelled,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "Pending",
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Cancelled => "Cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(InvoiceStatus::Pending),
            "Paid" => Some(InvoiceStatus::Paid),
            "Cancelled" => Some(InvoiceStatus::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Line item on an invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub description: String,
    pub cost: f64,
}

/// Invoice entity
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Invoice {
    pub id: StringUuid,
    pub patient_id: StringUuid,
    pub appointment_id: Option<StringUuid>,
    pub amount: f64,
    pub status: InvoiceStatus,
    pub items: Json<Vec<InvoiceItem>>,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Invoice {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            patient_id: StringUuid::new_v4(),
            appointment_id: None,
            amount: 0.0,
            status: InvoiceStatus::Pending,
            items: Json(Vec::new()),
            date: now,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for creating an invoice
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateInvoiceInput {
    #[validate(custom(function = "validate_patient_ref"))]
    pub patient: String,
    #[validate(custom(function = "validate_appointment_ref"))]
    pub appointment: Option<String>,
    #[validate(range(min = 0.0, message = "Amount must be a positive number"))]
    pub amount: f64,
    #[validate(custom(function = "validate_status"))]
    pub status: Option<String>,
    pub items: Option<Vec<InvoiceItem>>,
    #[validate(custom(function = "validate_date"))]
    pub date: Option<String>,
}

/// Input for updating an invoice; every field optional
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateInvoiceInput {
    #[validate(range(min = 0.0, message = "Amount must be a positive number"))]
    pub amount: Option<f64>,
    #[validate(custom(function = "validate_status"))]
    pub status: Option<String>,
    pub items: Option<Vec<InvoiceItem>>,
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

fn validate_appointment_ref(id: &str) -> Result<(), ValidationError> {
    if is_entity_ref(id) {
        Ok(())
    } else {
        let mut err = ValidationError::new("entity_ref");
        err.message = Some("Valid appointment ID is required".into());
        Err(err)
    }
}

fn validate_status(status: &str) -> Result<(), ValidationError> {
    if InvoiceStatus::parse(status).is_some() {
        Ok(())
    } else {
        let mut err = ValidationError::new("status");
        err.message = Some("Status must be one of: Pending, Paid, Cancelled".into());
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

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> CreateInvoiceInput {
        CreateInvoiceInput {
            patient: "550e8400-e29b-41d4-a716-446655440000".to_string(),
            appointment: None,
            amount: 125.50,
            status: None,
            items: Some(vec![InvoiceItem {
                description: "Consultation".to_string(),
                cost: 125.50,
            }]),
            date: None,
        }
    }

    #[test]
    fn test_create_invoice_input_valid() {
        assert!(valid_input().validate().is_ok());
    }

    #[test]
    fn test_amount_must_be_non_negative() {
        let mut input = valid_input();
        input.amount = -0.01;
        let err = input.validate().unwrap_err();
        assert!(err.field_errors().contains_key("amount"));

        input.amount = 0.0;
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_patient_ref_is_checked() {
        let mut input = valid_input();
        input.patient = "patient-7".to_string();
        let err = input.validate().unwrap_err();
        assert!(err.field_errors().contains_key("patient"));
    }

    #[test]
    fn test_status_optional_but_constrained() {
        let mut input = valid_input();
        input.status = Some("Paid".to_string());
        assert!(input.validate().is_ok());

        input.status = Some("Settled".to_string());
        let err = input.validate().unwrap_err();
        assert!(err.field_errors().contains_key("status"));
    }

    #[test]
    fn test_invoice_item_serde() {
        let item = InvoiceItem {
            description: "X-ray".to_string(),
            cost: 80.0,
        };
        let json = serde_json::to_string(&item).unwrap();
        let parsed: InvoiceItem = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, item);
    }

    #[test]
    fn test_update_input_checks_present_fields() {
        let input = UpdateInvoiceInput {
            amount: Some(-10.0),
            status: Some("Settled".to_string()),
            items: None,
        };
        let err = input.validate().unwrap_err();
        assert!(err.field_errors().contains_key("amount"));
        assert!(err.field_errors().contains_key("status"));
    }
}
