//! Invoice repository

use crate::domain::{Invoice, StringUuid};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    async fn create(&self, invoice: &Invoice) -> Result<Invoice>;
    async fn list(&self) -> Result<Vec<Invoice>>;
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Invoice>>;
    async fn update(&self, invoice: &Invoice) -> Result<Invoice>;
    async fn delete(&self, id: StringUuid) -> Result<()>;
}

pub struct InvoiceRepositoryImpl {
    pool: MySqlPool,
}

impl InvoiceRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

const INVOICE_COLUMNS: &str =
    "id, patient_id, appointment_id, amount, status, items, date, created_at, updated_at";

#[async_trait]
impl InvoiceRepository for InvoiceRepositoryImpl {
    async fn create(&self, invoice: &Invoice) -> Result<Invoice> {
        sqlx::query(
            r#"
            INSERT INTO invoices (id, patient_id, appointment_id, amount, status, items, date, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(invoice.id)
        .bind(invoice.patient_id)
        .bind(invoice.appointment_id)
        .bind(invoice.amount)
        .bind(invoice.status)
        .bind(&invoice.items)
        .bind(invoice.date)
        .bind(invoice.created_at)
        .bind(invoice.updated_at)
        .execute(&self.pool)
        .await?;

        self.find_by_id(invoice.id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create invoice")))
    }

    async fn list(&self) -> Result<Vec<Invoice>> {
        let invoices = sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {} FROM invoices ORDER BY date DESC",
            INVOICE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(invoices)
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Invoice>> {
        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {} FROM invoices WHERE id = ?",
            INVOICE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invoice)
    }

    async fn update(&self, invoice: &Invoice) -> Result<Invoice> {
        sqlx::query(
            r#"
            UPDATE invoices
            SET amount = ?, status = ?, items = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(invoice.amount)
        .bind(invoice.status)
        .bind(&invoice.items)
        .bind(invoice.updated_at)
        .bind(invoice.id)
        .execute(&self.pool)
        .await?;

        self.find_by_id(invoice.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Invoice not found".to_string()))
    }

    async fn delete(&self, id: StringUuid) -> Result<()> {
        sqlx::query("DELETE FROM invoices WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
