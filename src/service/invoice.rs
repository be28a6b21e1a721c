//! Invoice (billing) business logic

use crate::domain::common::parse_timestamp;
use crate::domain::{CreateInvoiceInput, Invoice, InvoiceStatus, StringUuid, UpdateInvoiceInput};
use crate::error::{AppError, Result};
use crate::repository::InvoiceRepository;
use chrono::Utc;
use sqlx::types::Json;
use std::sync::Arc;
use validator::Validate;

pub struct InvoiceService<R: InvoiceRepository> {
    repo: Arc<R>,
}

impl<R: InvoiceRepository> InvoiceService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, input: CreateInvoiceInput) -> Result<Invoice> {
        input.validate()?;

        let patient_id = StringUuid::parse_str(&input.patient)
            .map_err(|_| AppError::validation("patient", "Valid patient ID is required"))?;
        let appointment_id = match input.appointment.as_deref() {
            Some(s) => Some(
                StringUuid::parse_str(s).map_err(|_| {
                    AppError::validation("appointment", "Valid appointment ID is required")
                })?,
            ),
            None => None,
        };
        let status = parse_status(input.status.as_deref())?.unwrap_or(InvoiceStatus::Pending);
        let date = match input.date.as_deref() {
            Some(s) => parse_timestamp(s).ok_or_else(|| {
                AppError::validation("date", "Valid date is required (ISO 8601 format)")
            })?,
            None => Utc::now(),
        };

        let now = Utc::now();
        let invoice = Invoice {
            id: StringUuid::new_v4(),
            patient_id,
            appointment_id,
            amount: input.amount,
            status,
            items: Json(input.items.unwrap_or_default()),
            date,
            created_at: now,
            updated_at: now,
        };

        self.repo.create(&invoice).await
    }

    pub async fn list(&self) -> Result<Vec<Invoice>> {
        self.repo.list().await
    }

    pub async fn get(&self, id: StringUuid) -> Result<Invoice> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Invoice not found".to_string()))
    }

    pub async fn update(&self, id: StringUuid, input: UpdateInvoiceInput) -> Result<Invoice> {
        input.validate()?;

        let mut invoice = self.get(id).await?;

        if let Some(amount) = input.amount {
            invoice.amount = amount;
        }
        if let Some(status) = parse_status(input.status.as_deref())? {
            invoice.status = status;
        }
        if let Some(items) = input.items {
            invoice.items = Json(items);
        }
        invoice.updated_at = Utc::now();

        self.repo.update(&invoice).await
    }

    pub async fn delete(&self, id: StringUuid) -> Result<()> {
        self.get(id).await?;
        self.repo.delete(id).await
    }
}

fn parse_status(status: Option<&str>) -> Result<Option<InvoiceStatus>> {
    match status {
        Some(s) => InvoiceStatus::parse(s).map(Some).ok_or_else(|| {
            AppError::validation("status", "Status must be one of: Pending, Paid, Cancelled")
        }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::InvoiceItem;
    use crate::repository::invoice::MockInvoiceRepository;
    use mockall::predicate::*;

    fn valid_input() -> CreateInvoiceInput {
        CreateInvoiceInput {
            patient: StringUuid::new_v4().to_string(),
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

    #[tokio::test]
    async fn test_create_defaults_to_pending() {
        let mut repo = MockInvoiceRepository::new();
        repo.expect_create()
            .withf(|i| i.status == InvoiceStatus::Pending && i.amount == 125.50)
            .returning(|i| Ok(i.clone()));

        let service = InvoiceService::new(Arc::new(repo));
        let invoice = service.create(valid_input()).await.unwrap();
        assert_eq!(invoice.status, InvoiceStatus::Pending);
        assert_eq!(invoice.items.0.len(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_negative_amount() {
        let repo = MockInvoiceRepository::new();
        let service = InvoiceService::new(Arc::new(repo));

        let mut input = valid_input();
        input.amount = -5.0;

        let err = service.create(input).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_marks_paid() {
        let existing = Invoice::default();
        let id = existing.id;

        let mut repo = MockInvoiceRepository::new();
        let found = existing.clone();
        repo.expect_find_by_id()
            .with(eq(id))
            .returning(move |_| Ok(Some(found.clone())));
        repo.expect_update()
            .withf(|i| i.status == InvoiceStatus::Paid)
            .returning(|i| Ok(i.clone()));

        let service = InvoiceService::new(Arc::new(repo));
        let updated = service
            .update(
                id,
                UpdateInvoiceInput {
                    amount: None,
                    status: Some("Paid".to_string()),
                    items: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.status, InvoiceStatus::Paid);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let mut repo = MockInvoiceRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let service = InvoiceService::new(Arc::new(repo));
        let err = service.get(StringUuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
